//! JSON action boundary from the command line.

use std::io::Read;
use std::sync::Arc;

use anyhow::Result;

use crate::api::{ActionHandler, ActionRequest};
use crate::init::AppContext;

/// Read one envelope from `file` (or stdin) and print the JSON response.
///
/// Failure responses are printed like successes; the exit status stays 0 so
/// callers always get a parseable body.
pub async fn handle_action(ctx: &Arc<AppContext>, file: Option<&str>) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read file '{}': {}", path, e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
            buf
        }
    };

    let handler = ActionHandler::new(ctx.clone());
    let response = handler.handle_json(&raw).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub fn handle_schema() -> Result<()> {
    let schema = schemars::schema_for!(ActionRequest);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
