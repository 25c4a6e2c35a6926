//! Error types for the pdftally library.

use crate::model::ImageId;
use std::io;
use thiserror::Error;

/// Result type alias for pdftally operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during cost estimation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The document is encrypted and a passphrase is required before
    /// any extraction can run.
    #[error("Document is encrypted; passphrase required")]
    Encrypted,

    /// The supplied passphrase was rejected. Retrying with a different
    /// passphrase is allowed.
    #[error("Incorrect passphrase")]
    IncorrectPassphrase,

    /// The encryption metadata could not be processed at all. Terminal
    /// for this document; no retry path.
    #[error("Malformed encryption metadata: {0}")]
    MalformedEncryption(String),

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error extracting raw image bytes from a page.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Raw image bytes could not be decoded into pixel dimensions.
    #[error("Image decoding error: {0}")]
    ImageDecode(String),

    /// Pixel dimensions could not be resolved for an image, so its tile
    /// cost cannot be computed.
    #[error("Undecodable image {id}: {reason}")]
    UndecodableImage {
        /// Identifier of the failing image (page + sequence + name).
        id: ImageId,
        /// Underlying decode failure.
        reason: String,
    },

    /// An image decoded to a zero-sized dimension.
    #[error("Invalid dimensions {width}x{height} for image {id}")]
    InvalidDimensions {
        /// Identifier of the failing image.
        id: ImageId,
        /// Decoded width in pixels.
        width: u32,
        /// Decoded height in pixels.
        height: u32,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Tokenizer construction or encoding failure.
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(
            err.to_string(),
            "Document is encrypted; passphrase required"
        );

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_undecodable_image_context() {
        let err = Error::UndecodableImage {
            id: ImageId::new(3, 0, "Im1"),
            reason: "truncated header".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("page3"));
        assert!(msg.contains("Im1"));
        assert!(msg.contains("truncated header"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
