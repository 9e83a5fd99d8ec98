//! The one mutable slot in the crate: which logger is active right now.
//!
//! `configure` builds the replacement completely before touching the slot, swaps it in under
//! the write lock, and only then flushes and closes the previous logger. Snapshots handed out
//! by [`LoggerRegistry::current`] are never mutated; a snapshot taken before a swap keeps
//! pointing at the old logger, whose files are closed once the swap completes.
//!
//! Two configurations that target the same file path at the same time are not coordinated.

use crate::Error;
use crate::internal;
use crate::logger::{Logger, LoggerConfig};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug)]
pub struct LoggerRegistry {
    active: RwLock<Arc<Logger>>,
}

impl LoggerRegistry {
    /// # Errors
    /// The initial logger could not be built.
    pub fn new(config: &LoggerConfig) -> Result<Self, Error> {
        Ok(Self::with_logger(Logger::from_config(config)?))
    }

    /// Registry for `LOG_FILE_PATH`, `LOG_LEVEL_INFO` and `LOG_NOT_STDOUT`.
    ///
    /// # Errors
    /// The file named by the environment could not be opened.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(&LoggerConfig::from_env())
    }

    #[must_use]
    pub fn with_logger(logger: Logger) -> Self {
        Self {
            active: RwLock::new(Arc::new(logger)),
        }
    }

    /// Replaces the active logger.
    ///
    /// # Errors
    /// Building the new logger failed. The previous logger stays active.
    pub fn configure(&self, config: &LoggerConfig) -> Result<(), Error> {
        let next = match Logger::from_config(config) {
            Ok(logger) => Arc::new(logger),
            Err(e) => {
                internal::warn("REGISTRY", &format!("Keeping previous logger: {e}"));
                return Err(e);
            }
        };
        self.install(next)
    }

    /// Installs an already built logger, then retires the previous one.
    ///
    /// # Errors
    /// Flushing or closing the previous logger failed. The new one is active regardless.
    pub fn replace(&self, logger: Logger) -> Result<(), Error> {
        self.install(Arc::new(logger))
    }

    fn install(&self, next: Arc<Logger>) -> Result<(), Error> {
        let previous = {
            let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *active, next)
        };
        internal::debug("REGISTRY", "Installed new logger");
        previous.close()
    }

    /// Flushes the active logger. Never rotates or closes.
    ///
    /// # Errors
    /// [`Error::Sinks`] naming every sink that failed.
    pub fn flush(&self) -> Result<(), Error> {
        self.current().flush()
    }

    /// Snapshot of the active logger. Re-fetch after `configure` to see the replacement.
    #[must_use]
    pub fn current(&self) -> Arc<Logger> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Flushes and closes the active logger. It stays installed, so later writes to its
    /// files fail with [`Error::WriterClosed`] until the next `configure`.
    ///
    /// # Errors
    /// Flushing or closing failed.
    pub fn close(&self) -> Result<(), Error> {
        self.current().close()
    }
}
