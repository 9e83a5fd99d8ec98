//! High-throughput demo: many threads writing long random lines at once.
//!
//! Point `LOG_FILE_PATH` (or `[file] path`) at a file and read it while this runs; every
//! line lands whole even across rotations.

use crate::cli::util::random_word;
use crate::internal;
use crate::level::Level;
use crate::registry::LoggerRegistry;
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[must_use]
pub fn cmd_stress(
    registry: &LoggerRegistry,
    threads: usize,
    lines: usize,
    min_len: usize,
    max_len: usize,
) -> ExitCode {
    let logger = registry.current();

    logger.print("generating random data");
    let data: Vec<String> = (0..threads * lines)
        .map(|_| random_word(min_len, max_len))
        .collect();

    let failures = AtomicUsize::new(0);
    let begin = Instant::now();
    logger.print("begin writing log");

    std::thread::scope(|s| {
        for chunk in data.chunks(lines.max(1)) {
            let logger = &logger;
            let failures = &failures;
            s.spawn(move || {
                for (i, word) in chunk.iter().enumerate() {
                    if logger.log(Level::Info, &format!("i {i:9}: {word}")).is_err() {
                        failures.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    let elapsed = begin.elapsed();
    logger.print(&format!(
        "end writing log. duration: {:.3}s",
        elapsed.as_secs_f64()
    ));
    if let Err(e) = registry.flush() {
        internal::error("STRESS", &format!("{e}"));
        return ExitCode::FAILURE;
    }

    let failed = failures.into_inner();
    if failed > 0 {
        internal::error("STRESS", &format!("{failed} writes failed"));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
