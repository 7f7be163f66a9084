//! CLI command handler for the index build.
//!
//! Scans markdown sources, probes per-format artifacts, and writes the
//! download index page into the artifact directory.

use std::path::PathBuf;

use crate::core::build_env::BuildMetadata;
use crate::index::{build_listing, write_index_html};
use crate::{IndexError, IndexResult};

/// Run the index build.
///
/// Enumerates markdown sources, resolves front-matter titles, probes the
/// artifact directory for every recognized format, and renders the page.
///
/// # Arguments
/// * `markdown_dir` - Directory of markdown sources
/// * `dist_dir` - Artifact directory; receives the page unless `out` overrides it
/// * `out` - Optional output path override
/// * `meta` - Build metadata captured from the environment
pub fn run(
    markdown_dir: PathBuf,
    dist_dir: PathBuf,
    out: Option<PathBuf>,
    meta: BuildMetadata,
) -> IndexResult<()> {
    // Validate input exists
    if !markdown_dir.exists() {
        return Err(IndexError::Message(format!(
            "markdown directory not found: {}",
            markdown_dir.display()
        )));
    }

    // Ensure the artifact directory exists before probing and writing
    if !dist_dir.exists() {
        std::fs::create_dir_all(&dist_dir).map_err(|e| {
            IndexError::Message(format!("failed to create artifact directory: {e}"))
        })?;
    }

    eprintln!("Scanning markdown sources in: {}", markdown_dir.display());
    let rows = build_listing(&markdown_dir, &dist_dir)?;
    let available = rows
        .iter()
        .flat_map(|row| row.formats.iter())
        .filter(|slot| slot.is_present())
        .count();
    eprintln!(
        "Found {} document(s), {} artifact(s) available",
        rows.len(),
        available
    );

    let out_path = out.unwrap_or_else(|| dist_dir.join("index.html"));
    write_index_html(&out_path, &rows, &meta)?;
    eprintln!("Wrote download index to: {}", out_path.display());

    Ok(())
}
