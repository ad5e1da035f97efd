#![no_main]
//! Fuzz target for the whole pipeline.
//!
//! Arbitrary input may be rejected at any stage, but no stage may panic.

use hjournal_parser::{parse_to_cooked_with, parse_to_cst_recovering, ErrorPolicy, Options};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let options = Options::new().with_default_year(2024);
        let _ = parse_to_cooked_with(input, &options);
        let _ = parse_to_cooked_with(input, &options.with_error_policy(ErrorPolicy::SkipItem));
        let _ = parse_to_cst_recovering(input);
    }
});
