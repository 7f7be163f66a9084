//! Listing schema - one row per markdown source, one slot per recognized format.

use serde::{Deserialize, Serialize};

/// Recognized e-book output formats, in display priority order
pub const BOOK_FORMATS: &[&str] = &["epub", "mobi", "azw"];

/// One recognized output format probed for a document stem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSlot {
    /// Format extension, lowercase (`epub`, `mobi`, `azw`)
    pub format: String,

    /// Expected artifact filename, `<stem>.<format>`
    pub file_name: String,

    /// Size in bytes when the artifact exists; `None` means missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl FormatSlot {
    pub fn is_present(&self) -> bool {
        self.size_bytes.is_some()
    }
}

/// One listing row: a markdown source and its probed artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRow {
    /// Markdown filename without extension
    pub stem: String,

    /// Title resolved from front matter, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// One slot per recognized format, in `BOOK_FORMATS` order
    pub formats: Vec<FormatSlot>,
}

impl DocumentRow {
    /// Display name for the page: the resolved title, else the stem
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.stem)
    }
}
