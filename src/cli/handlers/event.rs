//! Event handlers: ingest, get, list.

use anyhow::Result;
use colored::Colorize;

use crate::cli::handlers::truncate;
use crate::cli::output::{
    create_spinner, output_json, print_error, print_header, print_hint, print_kv, print_section,
    print_success, print_table, print_warning, OutputMode,
};
use crate::init::AppContext;
use crate::models::{EventDraft, SymbolicEvent};
use crate::MythosError;

pub async fn handle_ingest(
    ctx: &AppContext,
    title: &str,
    keywords: &str,
    fragment: &str,
    mode: OutputMode,
) -> Result<()> {
    let draft = EventDraft::new(title, keywords, fragment);

    let spinner = create_spinner("Enriching event...");
    let result = ctx.ingest_service.ingest(&draft).await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(MythosError::Validation(msg)) => anyhow::bail!("Invalid event: {}", msg),
        Err(e) => return Err(e.into()),
    };

    if mode == OutputMode::Json {
        output_json(&outcome);
        return Ok(());
    }

    print_success(&format!("Ingested {}", outcome.event.event_id.bold()));
    if !outcome.enriched {
        print_warning("enrichment unavailable, stored as written");
    }
    print_event(&outcome.event);
    if !outcome.enhancement.archetypal_motifs.is_empty() {
        print_kv("Motifs", &outcome.enhancement.archetypal_motifs.join(", "));
    }
    print_kv(
        "Significance",
        &format!("{}/10", outcome.enhancement.symbolic_significance),
    );
    Ok(())
}

pub async fn handle_get(ctx: &AppContext, event_id: &str, mode: OutputMode) -> Result<()> {
    let event = match ctx.events.get(event_id).await {
        Ok(event) => event,
        Err(MythosError::NotFound { .. }) => {
            print_error(&format!("Event '{}' not found", event_id));
            print_hint("Try: mythos list");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if mode == OutputMode::Json {
        output_json(&event);
    } else {
        print_header(&event.title);
        print_event(&event);
    }
    Ok(())
}

pub async fn handle_list(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let events = ctx.events.list().await?;

    if mode == OutputMode::Json {
        output_json(&events);
        return Ok(());
    }

    let rows = events
        .iter()
        .map(|e| {
            vec![
                e.event_id.clone(),
                truncate(&e.title, 40),
                e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                e.keywords.join(", "),
            ]
        })
        .collect();
    print_table(&["ID", "Title", "Timestamp", "Keywords"], rows, mode);

    if events.is_empty() {
        print_hint("Try: mythos world seed");
    }
    Ok(())
}

fn print_event(event: &SymbolicEvent) {
    print_kv("ID", &event.event_id);
    print_kv("Timestamp", &event.timestamp.to_rfc3339());
    print_kv("Keywords", &event.keywords.join(", "));
    print_section("Fragment", &event.narrative_fragment);
}
