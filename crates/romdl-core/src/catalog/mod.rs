//! Platform catalog domain types.
//!
//! The catalog is an external collaborator: a platform list with folder
//! mapping metadata, plus one game list per platform. Game list files come
//! in several historical shapes, all accepted by [`parse_game_list`].

pub mod naming;
pub mod search;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use naming::{normalize_platform_name, sanitize_filename};
pub use search::{DEFAULT_SEARCH_LIMIT, SearchQuery, search_catalog};

/// One entry of the platform list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    /// Platform identifier, also the game list file stem.
    #[serde(default)]
    pub platform: String,
    /// Display name.
    #[serde(default, alias = "nom", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Destination folder under the ROMs directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_image: Option<String>,
}

impl PlatformDescriptor {
    /// Folder for this platform, falling back to the normalized identifier.
    #[must_use]
    pub fn effective_folder(&self) -> String {
        self.folder
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map_or_else(|| normalize_platform_name(&self.platform), str::to_string)
    }

    /// Case-insensitive substring match against id, display name and folder.
    #[must_use]
    pub fn matches_query(&self, lowered_query: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(lowered_query);
        hit(&self.platform)
            || self.name.as_deref().is_some_and(hit)
            || self.folder.as_deref().is_some_and(hit)
    }
}

/// Size as written in the game list: bytes or a preformatted label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameSize {
    Bytes(u64),
    Label(String),
}

impl GameSize {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self::Bytes),
            Value::String(s) if !s.is_empty() => Some(Self::Label(s.clone())),
            _ => None,
        }
    }
}

/// One downloadable game from a platform's list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogGame {
    pub name: String,
    pub url: String,
    pub size: Option<GameSize>,
}

impl CatalogGame {
    /// Normalize a single entry.
    ///
    /// Accepts `[name, url, size?]` arrays and objects with
    /// `name`/`title`, `url`/`link`, `size`/`filesize`. Entries without a
    /// name or URL are dropped.
    #[must_use]
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let (name, url, size) = match entry {
            Value::Array(items) => (items.first(), items.get(1), items.get(2)),
            Value::Object(map) => (
                first_present(map, &["name", "title"]),
                first_present(map, &["url", "link"]),
                first_present(map, &["size", "filesize"]),
            ),
            _ => return None,
        };
        let name = name.and_then(Value::as_str).filter(|s| !s.is_empty())?;
        let url = url.and_then(Value::as_str).filter(|s| !s.is_empty())?;
        Some(Self {
            name: name.to_string(),
            url: url.to_string(),
            size: size.and_then(GameSize::from_value),
        })
    }
}

fn first_present<'a>(map: &'a serde_json::Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null() && v.as_str() != Some(""))
}

/// Normalize a whole game list document.
///
/// Top-level arrays are taken as-is; objects contribute their `games` or
/// `items` array, else their values.
#[must_use]
pub fn parse_game_list(document: &Value) -> Vec<CatalogGame> {
    let entries: Vec<&Value> = match document {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match (map.get("games"), map.get("items")) {
            (Some(Value::Array(games)), _) => games.iter().collect(),
            (_, Some(Value::Array(items))) => items.iter().collect(),
            _ => map.values().collect(),
        },
        _ => Vec::new(),
    };
    entries
        .into_iter()
        .filter_map(CatalogGame::from_entry)
        .collect()
}

/// Search hit and game listing row tagged with its platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformGame {
    pub platform: String,
    pub name: String,
    pub url: String,
    pub size: Option<GameSize>,
}

impl PlatformGame {
    pub fn new(platform: impl Into<String>, game: CatalogGame) -> Self {
        Self {
            platform: platform.into(),
            name: game.name,
            url: game.url,
            size: game.size,
        }
    }
}
