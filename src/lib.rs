//! # pdftally
//!
//! Token cost estimation for PDF documents.
//!
//! This library estimates what a large-language-model API would charge
//! for processing a PDF's content: text is priced through a byte-pair
//! encoding tokenizer, and embedded images through the 512-pixel tile
//! model (a fixed base charge plus a per-tile charge after shrink-only
//! clamping of the dimensions).
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftally::estimate_file;
//!
//! fn main() -> pdftally::Result<()> {
//!     let report = estimate_file("document.pdf")?;
//!     println!(
//!         "{} text + {} image = {} tokens",
//!         report.text_tokens(),
//!         report.image_tokens(),
//!         report.total_tokens()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Encrypted documents
//!
//! Access to an encrypted document goes through [`DecryptionGate`], a
//! state machine driven by discrete passphrase submissions. For
//! non-interactive use, set a password on the options and the pipeline
//! drives the gate for you:
//!
//! ```no_run
//! use pdftally::Pdftally;
//!
//! let report = Pdftally::new()
//!     .with_password("secret")
//!     .estimate("locked.pdf")?;
//! # Ok::<(), pdftally::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Exact tile pricing**: integer-truncation semantics matching the
//!   published billing model
//! - **Passphrase retry**: unlimited retries, no lockout, terminal
//!   failure only on malformed encryption metadata
//! - **Order preservation**: page and intra-page image order is never
//!   disturbed, with stable per-image identifiers
//! - **Bounded memory**: image buffers are dropped as soon as each
//!   image is costed
//! - **Optional parallelism**: per-image decoding can fan out with
//!   Rayon, recombined in document order

pub mod cost;
pub mod decode;
pub mod detect;
pub mod error;
pub mod estimate;
pub mod extract;
pub mod gate;
pub mod model;
pub mod source;
pub mod tokenizer;

// Re-export commonly used types
pub use cost::{tile_cost, CostAggregator, UndecodablePolicy};
pub use decode::{ImageDecoder, PixelDecoder};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use estimate::{EstimateOptions, Estimator};
pub use extract::Extractor;
pub use gate::{DecryptionGate, GateState, GateStatus};
pub use model::{
    DocumentInfo, ImageAsset, ImageCost, ImageId, SkippedImage, TokenCostReport,
};
pub use source::{DecryptOutcome, DocumentSource, NamedImage, PdfSource};
pub use tokenizer::{BpeTokenizer, Tokenizer};

use std::path::Path;
use std::sync::Arc;

/// Estimate the token cost of a PDF file with default settings.
///
/// # Example
///
/// ```no_run
/// use pdftally::estimate_file;
///
/// let report = estimate_file("document.pdf").unwrap();
/// println!("Total: {} tokens", report.total_tokens());
/// ```
pub fn estimate_file<P: AsRef<Path>>(path: P) -> Result<TokenCostReport> {
    Estimator::with_defaults()?.estimate_file(path)
}

/// Estimate the token cost of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdftally::{estimate_file_with_options, EstimateOptions};
///
/// let options = EstimateOptions::new().skip_undecodable();
/// let report = estimate_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn estimate_file_with_options<P: AsRef<Path>>(
    path: P,
    options: EstimateOptions,
) -> Result<TokenCostReport> {
    Estimator::with_defaults()?
        .with_options(options)
        .estimate_file(path)
}

/// Estimate the token cost of a password-protected PDF file.
pub fn estimate_file_with_password<P: AsRef<Path>>(
    path: P,
    password: &str,
) -> Result<TokenCostReport> {
    estimate_file_with_options(path, EstimateOptions::new().with_password(password))
}

/// Estimate the token cost of a PDF held in memory.
pub fn estimate_bytes(data: &[u8]) -> Result<TokenCostReport> {
    Estimator::with_defaults()?.estimate_bytes(data)
}

/// Estimate the token cost of a PDF held in memory, with custom options.
pub fn estimate_bytes_with_options(
    data: &[u8],
    options: EstimateOptions,
) -> Result<TokenCostReport> {
    Estimator::with_defaults()?
        .with_options(options)
        .estimate_bytes(data)
}

/// Extract the concatenated page text of an unencrypted PDF file.
///
/// This is the exact string the tokenizer is fed during estimation:
/// page fragments in page order, each followed by a newline.
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let source = PdfSource::open(path)?;
    let gate = DecryptionGate::new(source);
    let extractor = Extractor::new(gate.into_inner()?);
    extractor.concatenated_text()
}

/// Builder for configuring and running estimations.
///
/// # Example
///
/// ```no_run
/// use pdftally::Pdftally;
///
/// let report = Pdftally::new()
///     .skip_undecodable()
///     .parallel()
///     .estimate("document.pdf")?;
/// # Ok::<(), pdftally::Error>(())
/// ```
pub struct Pdftally {
    options: EstimateOptions,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    decoder: Option<Arc<dyn ImageDecoder>>,
}

impl Pdftally {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: EstimateOptions::default(),
            tokenizer: None,
            decoder: None,
        }
    }

    /// Set the document passphrase.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.options = self.options.with_password(password);
        self
    }

    /// Skip undecodable images instead of aborting; skipped images are
    /// listed on the report.
    pub fn skip_undecodable(mut self) -> Self {
        self.options = self.options.skip_undecodable();
        self
    }

    /// Fan per-image decoding out across threads.
    pub fn parallel(mut self) -> Self {
        self.options = self.options.with_parallel(true);
        self
    }

    /// Use a custom tokenizer instead of the default `cl100k_base`.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Use a custom image decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Build the estimator.
    pub fn build(self) -> Result<Estimator> {
        let tokenizer = match self.tokenizer {
            Some(t) => t,
            None => BpeTokenizer::cl100k()?.shared(),
        };
        let decoder = self
            .decoder
            .unwrap_or_else(|| PixelDecoder::new().shared());
        let aggregator = CostAggregator::new(tokenizer, decoder);
        Ok(Estimator::new(aggregator, self.options))
    }

    /// Estimate a PDF file.
    pub fn estimate<P: AsRef<Path>>(self, path: P) -> Result<TokenCostReport> {
        self.build()?.estimate_file(path)
    }

    /// Estimate a PDF held in memory.
    pub fn estimate_bytes(self, data: &[u8]) -> Result<TokenCostReport> {
        self.build()?.estimate_bytes(data)
    }
}

impl Default for Pdftally {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_options() {
        let builder = Pdftally::new()
            .with_password("secret")
            .skip_undecodable()
            .parallel();

        assert_eq!(builder.options.password, Some("secret".to_string()));
        assert_eq!(builder.options.undecodable, UndecodablePolicy::Skip);
        assert!(builder.options.parallel);
    }

    #[test]
    fn test_builder_default() {
        let builder = Pdftally::default();
        assert!(builder.options.password.is_none());
        assert_eq!(builder.options.undecodable, UndecodablePolicy::Abort);
    }

    #[test]
    fn test_estimate_bytes_empty_data() {
        let result = estimate_bytes(&[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_estimate_bytes_unknown_magic() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let result = estimate_bytes(&data);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_format_reexports() {
        let data = b"%PDF-1.7\n%test";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.version, "1.7");
        assert!(!detect::is_pdf_bytes(b"<!DOCTYPE html>"));
    }
}
