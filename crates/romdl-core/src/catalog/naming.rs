//! Deterministic on-disk naming.

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip characters that are invalid in file names on common filesystems.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FORBIDDEN.contains(c) && !c.is_control())
        .collect();
    cleaned.trim().trim_end_matches('.').trim_end().to_string()
}

/// Folder name for a platform absent from the catalog.
///
/// Lower-cases and collapses runs of non-alphanumeric characters into `_`.
#[must_use]
pub fn normalize_platform_name(platform: &str) -> String {
    let mut out = String::with_capacity(platform.len());
    let mut pending_sep = false;
    for c in platform.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}
