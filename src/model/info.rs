//! Document information.

use serde::{Deserialize, Serialize};

/// Summary information about a document.
///
/// Used for CLI display and to give error reports document context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// PDF version (e.g., "1.7").
    pub version: String,

    /// Total number of pages.
    pub page_count: u32,

    /// Whether the document carries an encryption dictionary.
    pub encrypted: bool,
}

impl DocumentInfo {
    /// Create document info with the given version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }
}
