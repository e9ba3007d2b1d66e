#![no_main]

use libfuzzer_sys::fuzz_target;
use summaraize::client::parse_atom_feed;

fuzz_target!(|data: &[u8]| {
    // Feeds come from the network; parsing must return Ok or Err, never panic
    if let Ok(xml) = std::str::from_utf8(data) {
        let _ = parse_atom_feed(xml);
    }
});
