//! CLI handlers for arc construction, history and resonance.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::cli::handlers::truncate;
use crate::cli::output::{
    create_spinner, output_json, print_error, print_header, print_hint, print_kv, print_section,
    print_table, print_warning, OutputMode,
};
use crate::init::AppContext;
use crate::models::{EventSnapshot, MythicResonance, NarrativeArc};
use crate::services::{compute_resonance, ConstructionPath};
use crate::MythosError;

pub async fn handle_arc(ctx: &AppContext, seed: &str, depth: usize, mode: OutputMode) -> Result<()> {
    let snapshot = ctx.events.snapshot().await?;

    let spinner = create_spinner("Tracing narrative arc...");
    let result = ctx.arc_constructor.construct(seed, depth, &snapshot).await;
    spinner.finish_and_clear();

    let construction = match result {
        Ok(construction) => construction,
        Err(MythosError::NotFound { .. }) => {
            print_error(&format!("Seed event '{}' not found", seed));
            print_hint("Try: mythos list");
            return Ok(());
        }
        Err(MythosError::Validation(msg)) => anyhow::bail!("{}", msg),
        Err(e) => return Err(e.into()),
    };

    if mode == OutputMode::Json {
        output_json(&construction);
        return Ok(());
    }

    if construction.path == ConstructionPath::Fallback {
        print_warning("enrichment unavailable, arc built by keyword and time proximity");
    }
    print_arc(&construction.arc, &snapshot, mode);
    if !construction.archetypal_patterns.is_empty() {
        print_kv("Patterns", &construction.archetypal_patterns.join(", "));
    }
    if !construction.temporal_insights.is_empty() {
        print_section("Temporal insights", &construction.temporal_insights);
    }
    if !construction.mythic_resonance.is_empty() {
        print_section("Mythic resonance", &construction.mythic_resonance);
    }
    Ok(())
}

pub async fn handle_arcs(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let arcs = ctx.arcs.list_newest_first().await?;

    if mode == OutputMode::Json {
        output_json(&arcs);
        return Ok(());
    }

    let rows = arcs
        .iter()
        .map(|arc| {
            vec![
                arc.arc_id.clone(),
                truncate(&arc.title, 40),
                arc.seed_id().unwrap_or("-").to_string(),
                arc.len().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "Title", "Seed", "Events"], rows, mode);
    Ok(())
}

#[derive(Serialize)]
struct ResonanceView<'a> {
    arc: &'a NarrativeArc,
    resonance: MythicResonance,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved_event_ids: Vec<&'a str>,
}

pub async fn handle_resonance(ctx: &AppContext, arc_id: &str, mode: OutputMode) -> Result<()> {
    let arc = match ctx.arcs.get(arc_id).await {
        Ok(arc) => arc,
        Err(MythosError::NotFound { .. }) => {
            print_error(&format!("Arc '{}' not found", arc_id));
            print_hint("Try: mythos arcs");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let snapshot = ctx.events.snapshot().await?;
    let resonance = compute_resonance(&arc, &snapshot);
    let unresolved = snapshot.unresolved(&arc.event_ids);

    if mode == OutputMode::Json {
        output_json(&ResonanceView {
            arc: &arc,
            resonance,
            unresolved_event_ids: unresolved,
        });
        return Ok(());
    }

    if !unresolved.is_empty() {
        print_warning(&format!(
            "events not stored, left out of the motifs: {}",
            unresolved.join(", ")
        ));
    }
    print_header(&format!("Resonance: {}", arc.title));
    print_kv(
        "Motifs",
        &if resonance.archetypal_motifs.is_empty() {
            "-".to_string()
        } else {
            resonance.archetypal_motifs.join(", ")
        },
    );
    print_section("Summary", &resonance.resonance_summary);
    Ok(())
}

fn print_arc(arc: &NarrativeArc, snapshot: &EventSnapshot, mode: OutputMode) {
    print_header(&arc.title);
    print_kv("ID", &arc.arc_id);

    let rows = arc
        .event_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let title = snapshot
                .get(id)
                .map(|e| truncate(&e.title, 40))
                .unwrap_or_default();
            let marker = if i == 0 {
                "seed".cyan().to_string()
            } else {
                (i + 1).to_string()
            };
            vec![marker, id.clone(), title]
        })
        .collect();
    print_table(&["#", "Event", "Title"], rows, mode);
    print_section("Summary", &arc.summary);
}
