//! Property tests for arc construction and resonance over random snapshots.

mod common;

use std::collections::HashSet;

use proptest::prelude::*;

use common::builders::{snapshot_of, EventBuilder};
use common::fallback_context;
use mythos::models::{EventSnapshot, NarrativeArc};
use mythos::services::{compute_resonance, select_arc_members};

const VOCABULARY: &[&str] = &["light", "shadow", "river", "stone", "mirror", "spiral", "door"];

fn snapshot_strategy() -> impl Strategy<Value = EventSnapshot> {
    prop::collection::vec(
        (
            prop::collection::vec(prop::sample::select(VOCABULARY), 0..4),
            -600i64..600,
        ),
        1..12,
    )
    .prop_map(|specs| {
        let events = specs
            .into_iter()
            .enumerate()
            .map(|(i, (keywords, minute))| {
                let mut unique: Vec<&str> = Vec::new();
                for k in keywords {
                    if !unique.contains(&k) {
                        unique.push(k);
                    }
                }
                EventBuilder::new(format!("evt_{:02}", i))
                    .keywords(&unique)
                    .at_minute(minute)
                    .build()
            })
            .collect();
        snapshot_of(events)
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_fallback_arc_is_structurally_valid(
        snapshot in snapshot_strategy(),
        seed_pick in any::<prop::sample::Index>(),
        depth in 1usize..=10,
    ) {
        let seed = seed_pick.get(snapshot.events()).event_id.clone();
        let ctx = fallback_context();
        let arc = runtime()
            .block_on(ctx.arc_constructor.construct_arc(&seed, depth, &snapshot))
            .unwrap();

        prop_assert_eq!(arc.event_ids.first(), Some(&seed));
        prop_assert!(!arc.event_ids.is_empty() && arc.event_ids.len() <= depth);
        prop_assert_eq!(arc.event_ids.len(), depth.min(snapshot.len()));
        prop_assert!(arc.event_ids.iter().all(|id| snapshot.contains(id)));
        let unique: HashSet<_> = arc.event_ids.iter().collect();
        prop_assert_eq!(unique.len(), arc.event_ids.len());
    }

    #[test]
    fn prop_selection_is_deterministic(
        snapshot in snapshot_strategy(),
        seed_pick in any::<prop::sample::Index>(),
        depth in 1usize..=10,
    ) {
        let seed = seed_pick.get(snapshot.events());
        prop_assert_eq!(
            select_arc_members(seed, &snapshot, depth),
            select_arc_members(seed, &snapshot, depth)
        );
    }

    #[test]
    fn prop_resonance_motifs_bounded_and_unique(
        snapshot in snapshot_strategy(),
        take in 1usize..12,
    ) {
        let arc = NarrativeArc {
            arc_id: "arc_prop".into(),
            title: "t".into(),
            event_ids: snapshot.iter().take(take).map(|e| e.event_id.clone()).collect(),
            summary: String::new(),
        };
        let resonance = compute_resonance(&arc, &snapshot);

        prop_assert!(resonance.archetypal_motifs.len() <= 5);
        let unique: HashSet<_> = resonance.archetypal_motifs.iter().collect();
        prop_assert_eq!(unique.len(), resonance.archetypal_motifs.len());
        prop_assert_eq!(&resonance, &compute_resonance(&arc, &snapshot));
    }
}
