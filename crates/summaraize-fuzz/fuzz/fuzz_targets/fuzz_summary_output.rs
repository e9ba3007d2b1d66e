#![no_main]

use libfuzzer_sys::fuzz_target;
use summaraize::services::{PLACEHOLDER, parse_summary_output};

fuzz_target!(|data: &[u8]| {
    let output = String::from_utf8_lossy(data);
    let parsed = parse_summary_output(&output);

    // A missing field always falls back to the placeholder
    for name in &parsed.missing {
        match *name {
            "summary" => assert_eq!(parsed.entry.summary, PLACEHOLDER),
            "keywords" => assert_eq!(parsed.entry.keywords, PLACEHOLDER),
            _ => unreachable!(),
        }
    }
});
