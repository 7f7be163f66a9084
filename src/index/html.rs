//! Download index page generator.
//!
//! Renders the static index as a complete HTML document: one list item per
//! document with per-format download links, a build-metadata section, and an
//! inert `application/json` manifest block. NO JavaScript runs on the page.
//! All user-controlled strings are HTML-escaped for XSS safety.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::core::build_env::BuildMetadata;
use crate::core::schema::{DocumentRow, FormatSlot};

use super::build::format_size;

/// HTML-escape a string for safe insertion into HTML content.
///
/// Escapes: & < > " '
/// This prevents XSS when inserting user-controlled strings into HTML.
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape JSON for safe embedding inside an HTML `<script type="application/json">` tag.
///
/// Replaces `<` with `\u003c` so sequences like `</script>` or `<!--` inside
/// string values cannot terminate the script element. The output remains
/// valid JSON.
fn escape_json_for_html_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}

/// Render one format fragment: a download link with size, or the explicit
/// missing marker.
fn render_format_fragment(slot: &FormatSlot) -> String {
    let label = html_escape(&slot.format);
    match slot.size_bytes {
        Some(bytes) => format!(
            r#"<span class="format">{label}</span>: <a href="{file}" download>{file}</a> <span class="size">({size})</span>"#,
            file = html_escape(&slot.file_name),
            size = format_size(bytes),
        ),
        None => format!(r#"<span class="format">{label}</span>: <span class="missing">(missing)</span>"#),
    }
}

/// Render one listing row: display name plus every recognized format.
fn render_row(row: &DocumentRow) -> String {
    let name = html_escape(row.display_name());
    if row.formats.is_empty() {
        return format!("<li><strong>{name}</strong></li>");
    }
    let fragments: Vec<String> = row.formats.iter().map(render_format_fragment).collect();
    format!(
        "<li><strong>{name}</strong> &middot; {fragments}</li>",
        fragments = fragments.join(" &middot; "),
    )
}

/// Render the Actions run reference: a hyperlink only when both a run id and
/// a resolvable run URL exist.
fn render_run_link(meta: &BuildMetadata) -> String {
    match (meta.run_url(), &meta.run_id) {
        (Some(url), Some(run_id)) => format!(
            r#"<a href="{url}">{run_id}</a>"#,
            url = html_escape(&url),
            run_id = html_escape(run_id),
        ),
        _ => "Unavailable".to_string(),
    }
}

/// Machine-readable listing embedded in the page
#[derive(Serialize)]
struct DownloadManifest<'a> {
    generated_at: &'a str,
    commit: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_url: Option<String>,
    documents: &'a [DocumentRow],
}

fn render_manifest_json(rows: &[DocumentRow], meta: &BuildMetadata) -> String {
    let manifest = DownloadManifest {
        generated_at: &meta.timestamp,
        commit: &meta.commit,
        run_id: meta.run_id.as_deref(),
        run_url: meta.run_url(),
        documents: rows,
    };
    let json = serde_json::to_string_pretty(&manifest).unwrap_or_else(|_| "{}".to_string());
    escape_json_for_html_script(&json)
}

/// Render the download index as a complete HTML document.
///
/// Rows keep their given order. An empty listing renders a single
/// placeholder item. Rendering is deterministic: identical rows and metadata
/// produce identical bytes.
pub fn render_index_html(rows: &[DocumentRow], meta: &BuildMetadata) -> String {
    let file_items = if rows.is_empty() {
        "<li>No e-book files were generated in this build.</li>".to_string()
    } else {
        rows.iter().map(render_row).collect::<Vec<_>>().join("\n")
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>E-Book Downloads</title>
<style>
* {{ box-sizing: border-box; margin: 0; padding: 0; }}
body {{
  font-family: system-ui, -apple-system, sans-serif;
  background: #1a1a2e;
  color: #e8e8e8;
  padding: 24px;
  max-width: 900px;
  margin: 0 auto;
}}
a {{ color: #4ecdc4; text-decoration: none; }}
a:hover {{ text-decoration: underline; }}
h1 {{ font-size: 1.5rem; margin-bottom: 8px; }}
h2 {{ font-size: 1.125rem; margin: 24px 0 12px 0; color: #9a9a9a; }}
.lead {{ color: #9a9a9a; margin-bottom: 16px; }}
ul {{ list-style: none; }}
li {{ padding: 10px 12px; background: #16213e; border-bottom: 1px solid #2d3a5c; }}
li:first-child {{ border-radius: 4px 4px 0 0; }}
li:last-child {{ border-radius: 0 0 4px 4px; border-bottom: none; }}
code {{ background: #16213e; padding: 2px 6px; border-radius: 3px; font-family: monospace; }}
.format {{ color: #9a9a9a; font-size: 0.75rem; text-transform: uppercase; }}
.size {{ color: #9a9a9a; font-family: monospace; font-size: 0.8125rem; }}
.missing {{ color: #ffd93d; font-style: italic; }}
.metadata li {{ background: transparent; border-bottom: none; padding: 4px 0; color: #9a9a9a; }}
</style>
</head>
<body>
<h1>E-Book Downloads</h1>
<p class="lead">Download the latest e-book files directly below.</p>

<h2>Files</h2>
<ul>
{file_items}
</ul>

<h2>Build Metadata</h2>
<ul class="metadata">
<li>Build timestamp (UTC): {timestamp}</li>
<li>Commit SHA: <code>{commit}</code></li>
<li>Actions run: {run_link}</li>
</ul>

<script type="application/json" id="download-manifest">
{manifest_json}
</script>
</body>
</html>
"##,
        file_items = file_items,
        timestamp = html_escape(&meta.timestamp),
        commit = html_escape(&meta.commit),
        run_link = render_run_link(meta),
        manifest_json = render_manifest_json(rows, meta),
    )
}

/// Write the index page to a file, creating parent directories as needed.
pub fn write_index_html(
    output_path: &Path,
    rows: &[DocumentRow],
    meta: &BuildMetadata,
) -> anyhow::Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }

    let html = render_index_html(rows, meta);
    fs::write(output_path, html)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_basic() {
        assert_eq!(html_escape("hello"), "hello");
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(html_escape("it's"), "it&#x27;s");
    }

    #[test]
    fn test_html_escape_xss_vectors() {
        // Common XSS attack vectors
        assert_eq!(
            html_escape("<script>alert('xss')</script>"),
            "&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;"
        );
        assert_eq!(
            html_escape("<img src=x onerror=alert(1)>"),
            "&lt;img src=x onerror=alert(1)&gt;"
        );
    }

    #[test]
    fn test_html_escape_unicode() {
        // Unicode should pass through unchanged
        assert_eq!(html_escape("日本語"), "日本語");
        assert_eq!(html_escape("émoji 🎉"), "émoji 🎉");
    }

    fn sample_meta() -> BuildMetadata {
        BuildMetadata {
            timestamp: "2024-06-01 12:00:00 UTC".to_string(),
            commit: "deadbeef".to_string(),
            run_id: Some("123456".to_string()),
            repository: Some("acme/books".to_string()),
            server_url: "https://github.com".to_string(),
            run_url_override: None,
        }
    }

    fn present_slot(format: &str, stem: &str, bytes: u64) -> FormatSlot {
        FormatSlot {
            format: format.to_string(),
            file_name: format!("{stem}.{format}"),
            size_bytes: Some(bytes),
        }
    }

    fn missing_slot(format: &str, stem: &str) -> FormatSlot {
        FormatSlot {
            format: format.to_string(),
            file_name: format!("{stem}.{format}"),
            size_bytes: None,
        }
    }

    fn sample_rows() -> Vec<DocumentRow> {
        vec![
            DocumentRow {
                stem: "guide".to_string(),
                title: Some("Field Guide".to_string()),
                formats: vec![
                    present_slot("epub", "guide", 2048),
                    missing_slot("mobi", "guide"),
                    missing_slot("azw", "guide"),
                ],
            },
            DocumentRow {
                stem: "notes".to_string(),
                title: None,
                formats: vec![
                    missing_slot("epub", "notes"),
                    missing_slot("mobi", "notes"),
                    missing_slot("azw", "notes"),
                ],
            },
        ]
    }

    #[test]
    fn test_render_structure() {
        let html = render_index_html(&sample_rows(), &sample_meta());

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<title>E-Book Downloads</title>"));
        assert!(html.contains("<h2>Files</h2>"));
        assert!(html.contains("<h2>Build Metadata</h2>"));
        assert!(html.contains("Build timestamp (UTC): 2024-06-01 12:00:00 UTC"));
        assert!(html.contains("<code>deadbeef</code>"));
    }

    #[test]
    fn test_render_deterministic() {
        let rows = sample_rows();
        let meta = sample_meta();
        let html1 = render_index_html(&rows, &meta);
        let html2 = render_index_html(&rows, &meta);
        assert_eq!(html1, html2, "index rendering must be deterministic");
    }

    #[test]
    fn test_row_link_and_missing_markers() {
        let rows = sample_rows();
        let row_html = render_row(&rows[0]);

        assert!(row_html.contains("<strong>Field Guide</strong>"));
        assert!(row_html.contains(r#"<a href="guide.epub" download>guide.epub</a>"#));
        assert!(row_html.contains("(2.0 KB)"));
        assert_eq!(row_html.matches("(missing)").count(), 2);

        // Fragments follow the declared format order
        let epub = row_html.find("guide.epub").unwrap();
        let mobi = row_html.find(">mobi</span>").unwrap();
        let azw = row_html.find(">azw</span>").unwrap();
        assert!(epub < mobi && mobi < azw);
    }

    #[test]
    fn test_row_without_title_uses_stem() {
        let rows = sample_rows();
        let row_html = render_row(&rows[1]);
        assert!(row_html.contains("<strong>notes</strong>"));
        assert_eq!(row_html.matches("(missing)").count(), 3);
        assert!(!row_html.contains("<a href"));
    }

    #[test]
    fn test_row_escapes_title() {
        let row = DocumentRow {
            stem: "evil".to_string(),
            title: Some("<script>alert('x')</script>".to_string()),
            formats: vec![missing_slot("epub", "evil")],
        };
        let row_html = render_row(&row);
        assert!(!row_html.contains("<script>alert"));
        assert!(row_html.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
    }

    #[test]
    fn test_row_escapes_filename() {
        let row = DocumentRow {
            stem: "a&b".to_string(),
            title: None,
            formats: vec![present_slot("epub", "a&b", 10)],
        };
        let row_html = render_row(&row);
        assert!(!row_html.contains("a&b.epub"));
        assert!(row_html.contains(r#"href="a&amp;b.epub""#));
        assert!(row_html.contains("a&amp;b.epub</a>"));
    }

    #[test]
    fn test_empty_listing_placeholder() {
        let html = render_index_html(&[], &sample_meta());
        assert!(html.contains("<li>No e-book files were generated in this build.</li>"));
        assert!(!html.contains("download>"));
        // Metadata and manifest sections still render
        assert!(html.contains("<h2>Build Metadata</h2>"));
        assert!(html.contains(r#""documents": []"#));
    }

    #[test]
    fn test_run_link_rendered_when_resolvable() {
        let html = render_index_html(&[], &sample_meta());
        assert!(html.contains(
            r#"<a href="https://github.com/acme/books/actions/runs/123456">123456</a>"#
        ));
        assert!(!html.contains("Unavailable"));
    }

    #[test]
    fn test_run_link_unavailable_without_id() {
        let mut meta = sample_meta();
        meta.run_id = None;
        meta.run_url_override = Some("https://ci.example.com/runs/9".to_string());

        let html = render_index_html(&[], &meta);
        // A URL alone is not enough; the id must exist too
        assert!(html.contains("Actions run: Unavailable"));
        assert!(!html.contains(r#"<a href="https://ci.example.com"#));
    }

    #[test]
    fn test_run_link_unavailable_without_repository() {
        let mut meta = sample_meta();
        meta.repository = None;

        let html = render_index_html(&[], &meta);
        assert!(html.contains("Actions run: Unavailable"));
    }

    #[test]
    fn test_exactly_one_script_block() {
        let html = render_index_html(&sample_rows(), &sample_meta());
        assert_eq!(html.matches("<script").count(), 1);
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r#"<script type="application/json" id="download-manifest">"#));
    }

    #[test]
    fn test_manifest_parses_and_lists_documents() {
        let html = render_index_html(&sample_rows(), &sample_meta());

        let start = html
            .find(r#"id="download-manifest">"#)
            .map(|i| i + r#"id="download-manifest">"#.len())
            .unwrap();
        let end = html[start..].find("</script>").map(|i| start + i).unwrap();
        let manifest: serde_json::Value = serde_json::from_str(html[start..end].trim())
            .expect("embedded manifest must be valid JSON");

        assert_eq!(manifest["commit"], "deadbeef");
        assert_eq!(manifest["run_id"], "123456");
        assert_eq!(
            manifest["run_url"],
            "https://github.com/acme/books/actions/runs/123456"
        );

        let documents = manifest["documents"].as_array().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0]["stem"], "guide");
        assert_eq!(documents[0]["title"], "Field Guide");
        assert_eq!(documents[0]["formats"][0]["format"], "epub");
        assert_eq!(documents[0]["formats"][0]["size_bytes"], 2048);
        // Missing artifacts carry no size field
        assert!(documents[0]["formats"][1].get("size_bytes").is_none());
        // Untitled documents carry no title field
        assert!(documents[1].get("title").is_none());
    }

    #[test]
    fn test_manifest_cannot_break_out_of_script() {
        let row = DocumentRow {
            stem: "evil".to_string(),
            title: Some("</script><img src=x onerror=alert(1)>".to_string()),
            formats: vec![missing_slot("epub", "evil")],
        };
        let html = render_index_html(&[row], &sample_meta());

        // The only </script> on the page is the manifest's own closing tag
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains("\\u003c/script>"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist").join("nested").join("index.html");

        write_index_html(&out, &sample_rows(), &sample_meta()).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("<!DOCTYPE html>"));
        assert!(written.contains("Field Guide"));
    }

    #[test]
    fn test_write_reports_failure_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let out = blocker.join("index.html");
        let result = write_index_html(&out, &[], &sample_meta());
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(
            message.contains("failed to"),
            "unexpected message: {message}"
        );
    }
}
