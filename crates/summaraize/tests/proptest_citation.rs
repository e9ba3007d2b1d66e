//! Property-based tests for citation numbering and paper persistence.

mod common;

use std::collections::BTreeSet;

use proptest::prelude::*;
use summaraize::models::Paper;
use summaraize::registry::{AddOutcome, PaperRegistry, has_citation_gaps, next_citation_id};

use common::store_with_project;

fn papers_with_ids(ids: &BTreeSet<u32>) -> Vec<Paper> {
    ids.iter()
        .map(|id| Paper { id: format!("p{id}"), citation_id: Some(*id), ..Default::default() })
        .collect()
}

/// Generate arbitrary Paper structs with distinct IDs.
fn arb_papers() -> impl Strategy<Value = Vec<Paper>> {
    proptest::collection::btree_map(
        "[0-9]{4}\\.[0-9]{5}",
        (
            "[A-Za-z0-9 ]{0,60}",
            "[A-Za-z ,.]{0,80}",
            "[A-Za-z0-9 .,\n]{0,200}",
            "20[0-2][0-9]-[01][0-9]-[0-3][0-9]T00:00:00Z",
            proptest::option::of(1u32..10_000),
        ),
        0..12,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|(id, (title, authors, summary, published, citation_id))| Paper {
                link: format!("http://arxiv.org/abs/{id}v1"),
                id,
                title,
                authors,
                summary,
                published,
                citation_id,
            })
            .collect()
    })
}

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Delete(u8),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![(0u8..16).prop_map(Op::Add), (0u8..16).prop_map(Op::Delete)],
        0..40,
    )
}

proptest! {
    /// The next number is the smallest positive integer not in use.
    #[test]
    fn next_id_is_minimum_free(ids in proptest::collection::btree_set(1u32..64, 0..32)) {
        let expected = (1u32..).find(|n| !ids.contains(n)).unwrap();
        prop_assert_eq!(next_citation_id(&papers_with_ids(&ids)), expected);
    }

    /// Gaps are reported exactly when the sorted numbers differ from 1..=count.
    #[test]
    fn gaps_iff_not_dense(ids in proptest::collection::btree_set(1u32..64, 0..32)) {
        let dense: Vec<u32> = (1..=ids.len() as u32).collect();
        let sorted: Vec<u32> = ids.iter().copied().collect();
        prop_assert_eq!(has_citation_gaps(&papers_with_ids(&ids)), sorted != dense);
    }

    /// Saving then loading a paper list yields the same sequence.
    #[test]
    fn papers_round_trip(papers in arb_papers()) {
        let (_dir, store) = store_with_project("P");
        store.save_papers("P", &papers).unwrap();
        prop_assert_eq!(store.load_papers("P").unwrap(), papers);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Any add/delete sequence keeps paper IDs and citation numbers unique,
    /// and each add grows the registry by one with the minimum free number.
    #[test]
    fn registry_invariants_hold(ops in arb_ops()) {
        let (_dir, store) = store_with_project("P");
        let mut registry = PaperRegistry::open(store, "P").unwrap();

        for op in ops {
            match op {
                Op::Add(n) => {
                    let id = format!("p{n}");
                    let before = registry.papers().to_vec();
                    let outcome = registry.add(Paper { id: id.clone(), ..Default::default() }).unwrap();

                    if before.iter().any(|p| p.id == id) {
                        prop_assert_eq!(outcome, AddOutcome::Duplicate);
                        prop_assert_eq!(registry.papers(), before.as_slice());
                    } else {
                        let expected = next_citation_id(&before);
                        prop_assert_eq!(outcome, AddOutcome::Added { citation_id: expected });
                        prop_assert_eq!(registry.len(), before.len() + 1);
                    }
                }
                Op::Delete(n) => {
                    let id = format!("p{n}");
                    let before = registry.papers().to_vec();
                    registry.delete(&id).unwrap();

                    let expected: Vec<Paper> = before.into_iter().filter(|p| p.id != id).collect();
                    prop_assert_eq!(registry.papers(), expected.as_slice());
                }
            }

            let ids: BTreeSet<&str> = registry.papers().iter().map(|p| p.id.as_str()).collect();
            prop_assert_eq!(ids.len(), registry.len());

            let numbers: BTreeSet<u32> = registry.papers().iter().filter_map(|p| p.citation_id).collect();
            prop_assert_eq!(numbers.len(), registry.len());
        }
    }
}
