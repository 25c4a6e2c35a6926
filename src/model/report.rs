//! The token cost report.

use super::ImageId;
use serde::{Deserialize, Serialize};

/// Token cost of a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCost {
    /// Identifier of the image.
    pub id: ImageId,

    /// Billed token count for this image.
    pub tokens: u64,
}

impl ImageCost {
    /// Create a new per-image cost entry.
    pub fn new(id: ImageId, tokens: u64) -> Self {
        Self { id, tokens }
    }
}

/// An image omitted from the report under the skip policy.
///
/// Skipped images are always surfaced here, never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedImage {
    /// Identifier of the omitted image.
    pub id: ImageId,

    /// Why the image could not be costed.
    pub reason: String,
}

impl SkippedImage {
    /// Create a new skipped-image record.
    pub fn new(id: ImageId, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
        }
    }
}

/// The final cost report for one document.
///
/// Created once per successfully processed document and immutable after
/// construction. Invariant: `total_tokens()` always equals
/// `text_tokens() + sum of per-image costs`; the constructor computes
/// the total and no mutating access is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCostReport {
    text_tokens: u64,
    images: Vec<ImageCost>,
    skipped: Vec<SkippedImage>,
    total_tokens: u64,
}

impl TokenCostReport {
    /// Build a report from the text token count and per-image costs.
    ///
    /// The total is derived here; skipped images are excluded from it.
    pub fn new(text_tokens: u64, images: Vec<ImageCost>, skipped: Vec<SkippedImage>) -> Self {
        let image_tokens: u64 = images.iter().map(|c| c.tokens).sum();
        Self {
            text_tokens,
            images,
            skipped,
            total_tokens: text_tokens + image_tokens,
        }
    }

    /// Token count of the document's concatenated text.
    pub fn text_tokens(&self) -> u64 {
        self.text_tokens
    }

    /// Per-image token costs, in document order.
    pub fn images(&self) -> &[ImageCost] {
        &self.images
    }

    /// Images omitted under the skip policy, in document order.
    pub fn skipped(&self) -> &[SkippedImage] {
        &self.skipped
    }

    /// Combined token count of text and all costed images.
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    /// Sum of the per-image token costs.
    pub fn image_tokens(&self) -> u64 {
        self.total_tokens - self.text_tokens
    }

    /// Number of images that were costed.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// True if any image was omitted from the total.
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}
