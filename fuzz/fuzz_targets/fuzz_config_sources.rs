#![no_main]
use libfuzzer_sys::fuzz_target;
use rotalog::config::{Config, extract_sources};

fuzz_target!(|data: &str| {
    let (sources, _) = extract_sources(data);
    assert!(sources.iter().all(|s| !s.is_empty()));

    if let Ok(config) = Config::parse(data) {
        let _ = config.to_logger_config();
    }
});
