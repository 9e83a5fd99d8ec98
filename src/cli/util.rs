//! Utility functions for the CLI.

use crate::Error;
use crate::config::Config;
use crate::logger::LoggerConfig;
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::Path;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Config file (explicit or default location), then environment overrides.
///
/// # Errors
/// Loading the file failed or one of its values is invalid.
pub fn load_logger_config(path: Option<&Path>) -> Result<LoggerConfig, Error> {
    let mut config = match path {
        Some(p) => Config::load_from(p)?,
        None => Config::load()?,
    };
    config.apply_env();
    config.to_logger_config()
}

/// ASCII letters, length uniform in `min_len..=max_len`. A `max_len` below `min_len` is
/// raised to it.
#[must_use]
pub fn random_word(min_len: usize, max_len: usize) -> String {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(min_len..=max_len.max(min_len));
    (0..len)
        .filter_map(|_| ALPHABET.choose(&mut rng).map(|&b| char::from(b)))
        .collect()
}
