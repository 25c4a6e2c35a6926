//! Document access abstraction.
//!
//! Provides a trait-based interface for the PDF operations the engine
//! needs -- encryption inspection, decryption, page text and raw image
//! extraction -- isolating the concrete PDF library (lopdf) from the
//! gate, orchestrator, and aggregator logic.

mod pdf;

pub use pdf::PdfSource;

use crate::error::Result;
use crate::model::DocumentInfo;

/// A named raw image extracted from a page, in resource order.
#[derive(Debug, Clone)]
pub struct NamedImage {
    /// Resource name from the page's XObject dictionary.
    pub name: String,

    /// Raw encoded bytes of the image stream.
    pub data: Vec<u8>,
}

/// Outcome of a decryption attempt against the underlying document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptOutcome {
    /// The passphrase was correct; the document is now readable.
    Success,

    /// The passphrase was rejected; another attempt is allowed.
    IncorrectPassphrase,

    /// The encryption metadata itself could not be processed. No
    /// passphrase can ever succeed.
    Malformed(String),
}

/// Abstract interface for document access.
///
/// Pages are 1-indexed, matching PDF page numbering. Implementations
/// must return page images in their stable resource order so identifiers
/// stay reproducible across runs.
pub trait DocumentSource {
    /// Summary information about the document.
    fn info(&self) -> DocumentInfo;

    /// Whether the document carries an encryption dictionary.
    fn is_encrypted(&self) -> bool;

    /// Attempt to decrypt with the given passphrase.
    fn decrypt(&mut self, passphrase: &str) -> DecryptOutcome;

    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Extract the text fragment of a page. Empty output is valid.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Extract the raw images of a page, in resource order. A page with
    /// no images yields an empty vector.
    fn page_images(&self, page: u32) -> Result<Vec<NamedImage>>;
}
