//! One file per subcommand; each handler owns its argument validation and error reporting.

mod boundary;
mod log;
mod stress;

pub use boundary::cmd_boundary;
pub use log::cmd_log;
pub use stress::cmd_stress;
