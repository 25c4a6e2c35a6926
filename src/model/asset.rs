//! Image asset types.

use serde::{Deserialize, Serialize};

/// Stable identifier for an image within a document.
///
/// Combines the 1-indexed page number, the intra-page sequence number,
/// and the PDF resource name, so failures can be reported precisely and
/// per-image costs can be correlated back to the source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId {
    /// Page number (1-indexed).
    pub page: u32,

    /// Sequence number of the image within its page (0-indexed).
    pub index: u32,

    /// Resource name from the page's XObject dictionary (e.g., "Im1").
    pub name: String,
}

impl ImageId {
    /// Create a new image identifier.
    pub fn new(page: u32, index: u32, name: impl Into<String>) -> Self {
        Self {
            page,
            index,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page{}_{}_{}", self.page, self.index, self.name)
    }
}

/// A raw image extracted from a page.
///
/// Transient: exists only while one image is being processed. The byte
/// buffer is dropped as soon as the image's token cost is computed, so
/// peak memory stays bounded by one page of images rather than the
/// whole document.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    /// Identifier of this image.
    pub id: ImageId,

    /// Raw encoded image bytes as stored in the PDF stream.
    pub data: Vec<u8>,
}

impl ImageAsset {
    /// Create a new image asset.
    pub fn new(id: ImageId, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    /// Size of the raw data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}
