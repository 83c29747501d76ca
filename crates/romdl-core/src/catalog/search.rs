//! Global game search across the catalog.

use tracing::{debug, warn};

use super::PlatformGame;
use crate::ports::{CatalogError, CatalogPort};

/// Default cap on search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Search parameters. A `limit` of 0 means unlimited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub platform_id: Option<String>,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            platform_id: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    #[must_use]
    pub fn with_platform(mut self, platform_id: impl Into<String>) -> Self {
        self.platform_id = Some(platform_id.into()).filter(|p: &String| !p.is_empty());
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn is_full(&self, len: usize) -> bool {
        self.limit > 0 && len >= self.limit
    }
}

/// Search game names, falling back to platform matching.
///
/// Name matching is a case-insensitive substring test. When nothing matches
/// by name and no platform was given, the query is tried against each
/// platform's id, display name and folder; the first matching platforms
/// contribute their unfiltered game lists.
///
/// Across all platforms an unreadable game list is logged and skipped. With
/// an explicit `platform_id` the read error is returned.
pub async fn search_catalog(
    catalog: &dyn CatalogPort,
    query: &SearchQuery,
) -> Result<Vec<PlatformGame>, CatalogError> {
    let needle = query.query.trim().to_lowercase();
    let mut results = Vec::new();

    if let Some(ref pid) = query.platform_id {
        collect_platform(catalog, pid, &needle, query, &mut results, true).await?;
        return Ok(results);
    }

    let platforms = catalog.platforms().await?;
    for platform in &platforms {
        collect_platform(catalog, &platform.platform, &needle, query, &mut results, false).await?;
        if query.is_full(results.len()) {
            break;
        }
    }

    if results.is_empty() && !needle.is_empty() {
        for platform in platforms.iter().filter(|p| p.matches_query(&needle)) {
            debug!(
                target: "romdl.http",
                platform = %platform.platform,
                "search fell back to platform match"
            );
            collect_platform(catalog, &platform.platform, "", query, &mut results, false).await?;
            if query.is_full(results.len()) {
                break;
            }
        }
    }

    if query.limit > 0 {
        results.truncate(query.limit);
    }
    Ok(results)
}

async fn collect_platform(
    catalog: &dyn CatalogPort,
    platform_id: &str,
    needle: &str,
    query: &SearchQuery,
    out: &mut Vec<PlatformGame>,
    strict: bool,
) -> Result<(), CatalogError> {
    let games = match catalog.games(platform_id).await {
        Ok(games) => games,
        // A listed platform without a game file simply contributes nothing.
        Err(CatalogError::PlatformNotFound(_)) => return Ok(()),
        Err(e) if strict => return Err(e),
        Err(e) => {
            warn!(target: "romdl.http", platform = %platform_id, error = %e, "skipping unreadable game list");
            return Ok(());
        }
    };
    for game in games {
        if !needle.is_empty() && !game.name.to_lowercase().contains(needle) {
            continue;
        }
        out.push(PlatformGame::new(platform_id, game));
        if query.is_full(out.len()) {
            break;
        }
    }
    Ok(())
}
