//! Record encoding: a parsed layout template and the encoder that fills it.

mod encoder;
mod format;

pub use encoder::{DEFAULT_TIMESTAMP_FORMAT, Encoder};
pub use format::{DEFAULT_TEMPLATE, FormatSegment, FormatTemplate, FormatValues, Placeholder};
