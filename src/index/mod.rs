//! Download index for generated e-book artifacts.
//!
//! This module turns a directory of markdown sources plus a directory of
//! build artifacts into one static HTML page: titles come from front matter,
//! artifacts are probed per recognized format, and the page embeds a small
//! machine-readable manifest.

pub mod build;
pub mod frontmatter;
pub mod html;

pub use build::{build_listing, format_size, list_markdown_files, match_formats};
pub use frontmatter::{collect_titles, parse_front_matter_title, title_from_file};
pub use html::{html_escape, render_index_html, write_index_html};
