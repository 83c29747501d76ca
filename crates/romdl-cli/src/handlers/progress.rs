//! Progress command handler.
//!
//! Runs reconciliation once, so a stale History entry whose file is on
//! disk is repaired as a side effect.

use crate::bootstrap::CliContext;
use crate::error::CliError;

pub async fn execute(ctx: &CliContext, url: &str) -> Result<(), CliError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(CliError::Arguments("url is required".into()));
    }
    let view = ctx.queries.progress(url).await?;
    let json = serde_json::to_string_pretty(&view).map_err(|e| CliError::Core(e.to_string()))?;
    println!("{json}");
    Ok(())
}
