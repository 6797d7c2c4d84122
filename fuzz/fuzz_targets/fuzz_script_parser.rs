#![no_main]

use fpanel_harness::parse_script;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Err(err) = parse_script(text) {
        assert!(err.line >= 1);
        assert!(err.line <= text.lines().count().max(1));
    }
});
