//! Integration tests for event ingestion.
//!
//! Tests verify:
//! - Keyword normalization when enrichment is unavailable
//! - Enrichment applied before the single store
//! - Validation of title and fragment
//! - Round-trip through get
//! - Monotonic timestamps and unique ids
//! - A request dropped mid-enrichment stores nothing

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use common::builders::{draft, EventBuilder};
use common::fallback_context;
use common::harness::{context_with, ScriptedEnrichment, StalledEnrichment, CANCEL_AFTER};
use mythos::enrichment::{EnrichmentResult, FALLBACK_SIGNIFICANCE};
use mythos::models::EventDraft;
use mythos::MythosError;

#[tokio::test]
async fn test_ingest_without_enrichment_keeps_draft_values() {
    let ctx = fallback_context();
    let fragment = "In the space between sleep and waking, a pattern recognizes itself...";

    let outcome = ctx
        .ingest_service
        .ingest(&EventDraft::new(
            "The First Awakening",
            "consciousness, emergence, threshold",
            fragment,
        ))
        .await
        .expect("ingest should succeed without enrichment");

    assert!(!outcome.enriched);
    assert_eq!(
        outcome.event.keywords,
        vec!["consciousness", "emergence", "threshold"]
    );
    assert_eq!(outcome.event.narrative_fragment, fragment);
    assert_eq!(outcome.enhancement.symbolic_significance, 5);
    assert!(outcome.enhancement.archetypal_motifs.is_empty());
}

#[tokio::test]
async fn test_ingest_round_trips_through_get() {
    let ctx = fallback_context();
    let stored = ctx
        .ingest_service
        .ingest(&draft("Mirror", &["glass", "self"], "The glass looks back."))
        .await
        .unwrap()
        .event;

    let fetched = ctx.events.get(&stored.event_id).await.unwrap();
    assert_eq!(fetched, stored);
    assert!(stored.event_id.starts_with("evt_"));
}

#[tokio::test]
async fn test_ingest_rejects_blank_title_and_fragment() {
    let ctx = fallback_context();

    for bad in [
        EventDraft::new("   ", "a", "fragment"),
        EventDraft::new("Title", "a", "\n\t "),
    ] {
        let err = ctx.ingest_service.ingest(&bad).await.unwrap_err();
        assert!(matches!(err, MythosError::Validation(_)), "got {:?}", err);
    }
    assert_eq!(ctx.events.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_ingest_applies_enrichment_before_store() {
    let port = Arc::new(ScriptedEnrichment::with_event(EnrichmentResult {
        enhanced_keywords: vec!["threshold".into(), "dawn".into(), "threshold".into(), "veil".into()],
        expanded_fragment: "The veil thins at dawn.".into(),
        symbolic_significance: 8,
        archetypal_motifs: vec!["rebirth".into()],
    }));
    let ctx = context_with(port.clone());

    let outcome = ctx
        .ingest_service
        .ingest(&draft("Dawn", &["morning"], "Light."))
        .await
        .unwrap();

    assert!(outcome.enriched);
    assert_eq!(outcome.event.keywords, vec!["threshold", "dawn", "veil"]);
    assert_eq!(outcome.event.narrative_fragment, "The veil thins at dawn.");
    assert_eq!(outcome.event.title, "Dawn");

    let stored = ctx.events.get(&outcome.event.event_id).await.unwrap();
    assert_eq!(stored, outcome.event);
}

#[tokio::test]
async fn test_stalled_enrichment_times_out_into_fallback() {
    let ctx = context_with(Arc::new(StalledEnrichment));

    let outcome = ctx
        .ingest_service
        .ingest(&draft("Waiting", &["patience"], "Nothing answers."))
        .await
        .unwrap();

    assert!(!outcome.enriched);
    assert_eq!(outcome.event.keywords, vec!["patience"]);
    assert_eq!(ctx.events.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_ingest_dropped_during_enrichment_stores_nothing() {
    let ctx = context_with(Arc::new(StalledEnrichment));
    let input = draft("Interrupted", &["silence"], "The answer never comes.");

    let result = tokio::time::timeout(CANCEL_AFTER, ctx.ingest_service.ingest(&input)).await;

    assert!(result.is_err(), "ingest finished before the outer deadline");
    assert_eq!(ctx.events.count().await.unwrap(), 0);
    assert!(ctx.events.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ids_unique_and_timestamps_non_decreasing() {
    let ctx = fallback_context();
    let mut events = Vec::new();
    for i in 0..20 {
        let outcome = ctx
            .ingest_service
            .ingest(&draft(&format!("Event {}", i), &["k"], "f"))
            .await
            .unwrap();
        events.push(outcome.event);
    }

    let ids: std::collections::HashSet<_> = events.iter().map(|e| &e.event_id).collect();
    assert_eq!(ids.len(), events.len());
    assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

    let listed = ctx.events.list().await.unwrap();
    assert_eq!(listed, events);
}

#[tokio::test]
async fn test_enhance_does_not_modify_stored_event() {
    let port = Arc::new(ScriptedEnrichment::with_event(EnrichmentResult {
        enhanced_keywords: vec!["a".into(), "b".into(), "c".into()],
        expanded_fragment: "expanded".into(),
        symbolic_significance: 9,
        archetypal_motifs: vec![],
    }));
    let ctx = context_with(port);

    let stored = ctx
        .ingest_service
        .ingest(&draft("Echo", &["x"], "original"))
        .await
        .unwrap()
        .event;
    let before = ctx.events.get(&stored.event_id).await.unwrap();

    let enhancement = ctx.ingest_service.enhance(&before).await;
    assert_eq!(enhancement.symbolic_significance, 9);

    let after = ctx.events.get(&stored.event_id).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_enhance_of_untitled_event_echoes_its_own_fields() {
    let port = Arc::new(ScriptedEnrichment::with_event(EnrichmentResult {
        enhanced_keywords: vec!["a".into(), "b".into(), "c".into()],
        expanded_fragment: "unused".into(),
        symbolic_significance: 9,
        archetypal_motifs: vec![],
    }));
    let ctx = context_with(port.clone());
    let untitled = EventBuilder::new("evt_blank")
        .title("  ")
        .keywords(&["ash"])
        .fragment("Smoke without a name.")
        .build();

    let enhancement = ctx.ingest_service.enhance(&untitled).await;

    assert_eq!(enhancement.symbolic_significance, FALLBACK_SIGNIFICANCE);
    assert_eq!(enhancement.enhanced_keywords, vec!["ash"]);
    assert_eq!(enhancement.expanded_fragment, "Smoke without a name.");
    assert!(enhancement.archetypal_motifs.is_empty());
    assert_eq!(port.event_calls(), 0);
}
