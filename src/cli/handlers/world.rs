//! World management command handlers: status, seed, export, import.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{
    output_json, print_error, print_header, print_hint, print_kv, print_success, print_table,
    OutputMode,
};
use crate::init::AppContext;
use crate::repository::{seed_genesis, WorldState};

#[derive(Serialize)]
struct WorldStatus {
    data_path: Option<String>,
    events: usize,
    arcs: usize,
    enrichment_available: bool,
    enrichment_timeout_ms: u64,
}

pub async fn handle_status(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let status = WorldStatus {
        data_path: ctx.data_path.as_ref().map(|p| p.display().to_string()),
        events: ctx.events.count().await?,
        arcs: ctx.arcs.count().await?,
        enrichment_available: ctx.enrichment.is_available(),
        enrichment_timeout_ms: ctx.config.enrichment_timeout_ms,
    };

    if mode == OutputMode::Json {
        output_json(&status);
        return Ok(());
    }

    print_header("World Status");
    print_kv("Data path", status.data_path.as_deref().unwrap_or("(in memory)"));
    print_kv("Events", &status.events.to_string());
    print_kv("Arcs", &status.arcs.to_string());
    print_kv(
        "Enrichment",
        if status.enrichment_available {
            "available"
        } else {
            "disabled (fallback heuristics only)"
        },
    );
    print_kv("Timeout", &format!("{} ms", status.enrichment_timeout_ms));
    Ok(())
}

pub async fn handle_seed(ctx: &AppContext, mode: OutputMode) -> Result<()> {
    let report = seed_genesis(ctx.events.as_ref(), ctx.arcs.as_ref()).await?;

    if mode == OutputMode::Json {
        output_json(&report);
        return Ok(());
    }

    if report.added.is_empty() {
        print_hint("Genesis events already present.");
    } else {
        print_success(&format!("Seeded {}", report.added.join(", ")));
    }
    Ok(())
}

pub async fn handle_export(ctx: &AppContext, output: Option<&str>, mode: OutputMode) -> Result<()> {
    let state = WorldState::capture(ctx.events.as_ref(), ctx.arcs.as_ref()).await?;
    let json = serde_json::to_string_pretty(&state)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .map_err(|e| anyhow::anyhow!("Failed to write '{}': {}", path, e))?;
            if mode == OutputMode::Json {
                output_json(&serde_json::json!({
                    "path": path,
                    "events": state.events.len(),
                    "arcs": state.arcs.len(),
                }));
            } else {
                print_success(&format!(
                    "Exported {} events and {} arcs to {}",
                    state.events.len(),
                    state.arcs.len(),
                    path
                ));
            }
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub async fn handle_import(
    ctx: &AppContext,
    file: &str,
    dry_run: bool,
    mode: OutputMode,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", file, e))?;
    let state: WorldState = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse world JSON: {}", e))?;

    if dry_run {
        match mode {
            OutputMode::Json => output_json(&serde_json::json!({
                "dry_run": true,
                "events": state.events.len(),
                "arcs": state.arcs.len(),
            })),
            _ => {
                println!("Dry run: no changes will be made\n");
                print_table(
                    &["Kind", "Count"],
                    vec![
                        vec!["events".into(), state.events.len().to_string()],
                        vec!["arcs".into(), state.arcs.len().to_string()],
                    ],
                    mode,
                );
            }
        }
        return Ok(());
    }

    let report = state
        .merge_into(ctx.events.as_ref(), ctx.arcs.as_ref())
        .await
        .map_err(|e| anyhow::anyhow!("Import failed: {}", e))?;

    if mode == OutputMode::Json {
        output_json(&report);
        return Ok(());
    }

    print_success(&format!(
        "Imported {} events and {} arcs",
        report.events_imported, report.arcs_imported
    ));
    for reason in &report.skipped {
        print_error(&format!("skipped {}", reason));
    }
    Ok(())
}
