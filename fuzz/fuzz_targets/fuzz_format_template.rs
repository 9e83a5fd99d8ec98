#![no_main]
use libfuzzer_sys::fuzz_target;
use rotalog::fmt::{FormatTemplate, FormatValues};

fuzz_target!(|data: &str| {
    let template = FormatTemplate::parse(data);

    let values = FormatValues {
        timestamp: "2021-04-12T00:00:00.000+0000",
        level: "INFO",
        caller: "main.rs:1",
        msg: "test",
    };
    let _ = template.render(&values);
});
