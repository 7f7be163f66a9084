//! Front-matter title resolution for markdown sources.
//!
//! Only the delimiter convention and a `title:` key are recognized. This is
//! deliberately not a YAML parser; the line-oriented rules below are the
//! whole contract.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extract a display title from markdown content.
///
/// A front-matter block exists only if the first line trims to `---`.
/// Scanning stops at the closing `---` or at end of content; a title found
/// inside an unclosed block still counts. The first `title:` line decides
/// the outcome, even when its value turns out empty.
pub fn parse_front_matter_title(content: &str) -> Option<String> {
    let mut lines = content.lines();
    if lines.next()?.trim() != "---" {
        return None;
    }

    for line in lines {
        if line.trim() == "---" {
            break;
        }
        if line.to_lowercase().starts_with("title:") {
            let value = line.splitn(2, ':').nth(1).unwrap_or("").trim();
            let value = strip_quote_pair(value);
            return if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
    }

    None
}

/// Strip one matching pair of surrounding quote characters
fn strip_quote_pair(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Resolve the title for one markdown file.
///
/// Any read failure (missing file, invalid UTF-8) is recoverable: the
/// document simply has no title.
pub fn title_from_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_front_matter_title(&content),
        Err(e) => {
            tracing::debug!("no title for {}: {e}", path.display());
            None
        }
    }
}

/// Build the stem -> title mapping for a set of markdown files.
///
/// Only documents whose front matter yields a title get an entry; display
/// fallback to the stem happens at render time.
pub fn collect_titles(files: &[PathBuf]) -> HashMap<String, String> {
    let mut titles = HashMap::new();
    for path in files {
        let Some(stem) = path.file_stem() else {
            continue;
        };
        if let Some(title) = title_from_file(path) {
            titles.insert(stem.to_string_lossy().into_owned(), title);
        }
    }
    titles
}
