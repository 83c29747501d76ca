//! Paths command handler.
//!
//! Displays all resolved paths in `key = value` format for diagnostics.

use anyhow::Result;

use romdl_core::ResolvedPaths;

pub fn execute(paths: &ResolvedPaths) -> Result<()> {
    println!("{paths}");
    Ok(())
}
