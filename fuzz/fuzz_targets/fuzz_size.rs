#![no_main]
use libfuzzer_sys::fuzz_target;
use rotalog::units::{format_size, parse_size};

fuzz_target!(|data: &str| {
    if let Some(bytes) = parse_size(data) {
        let _ = format_size(bytes);
    }
});
