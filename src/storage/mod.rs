//! Image persistence.
//!
//! Writes downloaded listing images into the output directory as
//! `<keyword-prefix>_<rank>.<ext>`. Nothing else is persisted.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Longest keyword prefix used in file names.
const MAX_PREFIX_CHARS: usize = 40;

/// Extensions accepted from an image URL; anything else is saved as jpg.
const KNOWN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const DEFAULT_EXTENSION: &str = "jpg";

/// Turn a keyword into a file-name prefix: lowercase ASCII alphanumerics,
/// every other run of characters collapsed to a single `_`.
pub fn sanitize_keyword(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    let mut pending_sep = false;

    for c in keyword.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    out.truncate(MAX_PREFIX_CHARS);
    let out = out.trim_end_matches('_').to_string();
    if out.is_empty() {
        "item".to_string()
    } else {
        out
    }
}

/// File extension for an image URL, from the last path segment.
pub fn image_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let last = path.rsplit('/').next().unwrap_or_default();
    let Some((_, ext)) = last.rsplit_once('.') else {
        return DEFAULT_EXTENSION;
    };
    let ext = ext.to_ascii_lowercase();
    KNOWN_EXTENSIONS
        .iter()
        .find(|known| **known == ext)
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// `<prefix>_<rank>.<ext>` with a 1-based rank.
pub fn image_file_name(keyword: &str, rank: usize, url: &str) -> String {
    format!("{}_{rank}.{}", sanitize_keyword(keyword), image_extension(url))
}

/// Create the output directory if needed.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create image directory {}", dir.display()))
}

/// Write image bytes to `dir/file_name`, replacing any existing file.
pub fn save_image(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write image to {}", path.display()))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Image saved");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
