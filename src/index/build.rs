//! Build the document listing: enumerate markdown sources and probe artifacts.
//!
//! One listing row per markdown document, sorted case-insensitively by
//! filename. Every recognized format appears in every row, present or not.

use std::fs;
use std::path::{Path, PathBuf};

use crate::IndexError;
use crate::core::schema::{BOOK_FORMATS, DocumentRow, FormatSlot};

use super::frontmatter::collect_titles;

/// List markdown files in a directory, sorted case-insensitively by filename.
///
/// Names that differ only in case are tie-broken by the raw name so the
/// order is total. An unreadable directory is fatal.
pub fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>, IndexError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        IndexError::Message(format!(
            "failed to read markdown directory {}: {e}",
            dir.display()
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            IndexError::Message(format!(
                "failed to read markdown directory {}: {e}",
                dir.display()
            ))
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("md") && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| {
        let a_name = file_name_string(a);
        let b_name = file_name_string(b);
        a_name
            .to_lowercase()
            .cmp(&b_name.to_lowercase())
            .then_with(|| a_name.cmp(&b_name))
    });

    Ok(files)
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Probe the artifact directory for every recognized format of one stem.
///
/// A slot is present only for a regular file at `<dist>/<stem>.<ext>`;
/// directories or dangling symlinks at that path stay missing.
pub fn match_formats(dist_dir: &Path, stem: &str) -> Vec<FormatSlot> {
    BOOK_FORMATS
        .iter()
        .map(|format| {
            let file_name = format!("{stem}.{format}");
            let size_bytes = fs::metadata(dist_dir.join(&file_name))
                .ok()
                .filter(|m| m.is_file())
                .map(|m| m.len());
            FormatSlot {
                format: format.to_string(),
                file_name,
                size_bytes,
            }
        })
        .collect()
}

/// Human-readable size: whole bytes under 1 KiB, one-decimal KB under
/// 1 MiB, two-decimal MB above that. No GB tier.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let kib = bytes as f64 / 1024.0;
    if kib < 1024.0 {
        return format!("{kib:.1} KB");
    }
    format!("{:.2} MB", kib / 1024.0)
}

/// Build the full listing for the page.
///
/// Enumerates markdown sources, resolves titles once, then probes artifacts
/// per document. Artifacts with no markdown counterpart are ignored.
pub fn build_listing(markdown_dir: &Path, dist_dir: &Path) -> Result<Vec<DocumentRow>, IndexError> {
    let files = list_markdown_files(markdown_dir)?;
    let titles = collect_titles(&files);

    let rows: Vec<DocumentRow> = files
        .iter()
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .map(|stem| {
            let formats = match_formats(dist_dir, &stem);
            let title = titles.get(&stem).cloned();
            DocumentRow {
                stem,
                title,
                formats,
            }
        })
        .collect();

    tracing::debug!(
        "listing built: {} document(s), {} with front-matter titles",
        rows.len(),
        rows.iter().filter(|r| r.title.is_some()).count()
    );

    Ok(rows)
}
