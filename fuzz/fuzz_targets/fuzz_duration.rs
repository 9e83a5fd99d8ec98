#![no_main]
use libfuzzer_sys::fuzz_target;
use rotalog::units::{format_duration, parse_duration};

fuzz_target!(|data: &str| {
    // Whatever parses must render to something that parses again.
    if let Some(delta) = parse_duration(data) {
        assert!(parse_duration(&format_duration(delta)).is_some());
    }
});
