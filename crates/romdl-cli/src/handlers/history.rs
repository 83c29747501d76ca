//! History command handler.

use romdl_core::{CanonicalStatus, HistoryRecord};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Print History records, optionally filtered and truncated.
pub async fn execute(ctx: &CliContext, status: Option<&str>, limit: usize) -> Result<(), CliError> {
    let filter = parse_status(status)?;
    let records = ctx.queries.history(filter, limit).await?;
    println!("{}", render(&records)?);
    Ok(())
}

fn parse_status(status: Option<&str>) -> Result<Option<CanonicalStatus>, CliError> {
    let Some(raw) = status.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match CanonicalStatus::parse_filter(raw) {
        CanonicalStatus::Unknown if !raw.eq_ignore_ascii_case("unknown") => Err(
            CliError::Arguments(format!("unrecognised status '{raw}'")),
        ),
        parsed => Ok(Some(parsed)),
    }
}

fn render(records: &[HistoryRecord]) -> Result<String, CliError> {
    serde_json::to_string_pretty(records).map_err(|e| CliError::Core(e.to_string()))
}
