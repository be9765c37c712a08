//! Batch ingest handler: YAML from stdin or file.

use anyhow::Result;
use colored::Colorize;
use serde::Deserialize;

use crate::cli::output::{create_spinner, output_json, print_error, print_success, OutputMode};
use crate::init::AppContext;
use crate::models::EventDraft;

/// Keywords may be written as `"a, b"` or as a YAML list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeywordSpec {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct EventSpec {
    title: String,
    #[serde(default)]
    keywords: Option<KeywordSpec>,
    #[serde(alias = "fragment")]
    narrative_fragment: String,
}

impl EventSpec {
    fn into_draft(self) -> EventDraft {
        let keywords = match self.keywords {
            Some(KeywordSpec::Text(text)) => text,
            Some(KeywordSpec::List(list)) => list.join(","),
            None => String::new(),
        };
        EventDraft::new(self.title, keywords, self.narrative_fragment)
    }
}

fn parse_specs(yaml: &str) -> Result<Vec<EventSpec>> {
    serde_yaml_ng::from_str(yaml).map_err(|e| anyhow::anyhow!("Invalid YAML: {}", e))
}

pub async fn handle_batch(ctx: &AppContext, file: Option<&str>, mode: OutputMode) -> Result<()> {
    let yaml_content = if let Some(path) = file {
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", path, e))?
    } else {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        buf
    };

    let specs = parse_specs(&yaml_content)?;
    let total = specs.len();
    let spinner = create_spinner(&format!("Ingesting {} events...", total));

    let mut created = Vec::new();
    let mut errors = Vec::new();

    // Sequential so insertion order follows the file.
    for spec in specs {
        let draft = spec.into_draft();
        match ctx.ingest_service.ingest(&draft).await {
            Ok(outcome) => created.push((outcome.event.event_id, outcome.event.title)),
            Err(e) => errors.push(format!("'{}': {}", draft.title, e)),
        }
    }

    spinner.finish_and_clear();
    print_batch_summary(total, &created, &errors, mode);
    Ok(())
}

fn print_batch_summary(
    total: usize,
    created: &[(String, String)],
    errors: &[String],
    mode: OutputMode,
) {
    if mode == OutputMode::Json {
        let created_json: Vec<serde_json::Value> = created
            .iter()
            .map(|(id, title)| serde_json::json!({"event_id": id, "title": title}))
            .collect();
        output_json(&serde_json::json!({
            "total": total,
            "created": created.len(),
            "errors": errors,
            "events": created_json,
        }));
        return;
    }

    if !created.is_empty() {
        print_success(&format!("Ingested {}/{} events", created.len(), total));
        for (id, title) in created {
            println!("  {} {}", id.dimmed(), title);
        }
    }

    if !errors.is_empty() {
        println!();
        for err in errors {
            print_error(err);
        }
    }

    if created.is_empty() && errors.is_empty() {
        println!("No events to ingest (empty input).");
    }
}
