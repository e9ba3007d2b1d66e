#![no_main]

use libfuzzer_sys::fuzz_target;
use summaraize::models::Paper;
use summaraize::registry::{has_citation_gaps, next_citation_id};

fuzz_target!(|data: &[u8]| {
    // saved_papers.json may be hand-edited; loading and numbering must not panic
    if let Ok(papers) = serde_json::from_slice::<Vec<Paper>>(data) {
        let next = next_citation_id(&papers);
        assert!(next >= 1);
        assert!(papers.iter().all(|p| p.citation_id != Some(next)));
        let _ = has_citation_gaps(&papers);
    }
});
