//! PDF document source backed by lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::Document as LopdfDocument;

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::DocumentInfo;

use super::{DecryptOutcome, DocumentSource, NamedImage};

/// Concrete [`DocumentSource`] backed by `lopdf::Document`.
pub struct PdfSource {
    doc: LopdfDocument,
}

impl PdfSource {
    /// Open a PDF file.
    ///
    /// The file header is validated before lopdf parses the body, so a
    /// non-PDF file fails with [`Error::UnknownFormat`] rather than a
    /// parse error deep inside the library.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;

        let doc = LopdfDocument::load(path).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Ok(Self { doc })
    }

    /// Open a PDF from an in-memory byte buffer.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;

        Ok(Self { doc })
    }

    /// Open a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Extract the raw bytes of one image XObject.
    ///
    /// DCTDecode and JPXDecode streams are stored as complete JPEG /
    /// JPEG 2000 payloads and are returned as-is; other filters are
    /// decompressed to the raw stream content.
    fn extract_image_stream(&self, obj_ref: lopdf::ObjectId) -> Result<Vec<u8>> {
        let object = self
            .doc
            .get_object(obj_ref)
            .map_err(|e| Error::ImageExtract(e.to_string()))?;

        let lopdf::Object::Stream(stream) = object else {
            return Err(Error::ImageExtract("Invalid XObject".to_string()));
        };

        if let Ok(subtype) = stream.dict.get(b"Subtype") {
            match subtype.as_name() {
                Ok(b"Image") => {}
                _ => return Err(Error::ImageExtract("Not an image XObject".to_string())),
            }
        }

        let filter = stream
            .dict
            .get(b"Filter")
            .ok()
            .and_then(|f| f.as_name().ok())
            .unwrap_or(b"");

        let data = match filter {
            b"DCTDecode" | b"JPXDecode" => stream.content.clone(),
            _ => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
        };

        Ok(data)
    }
}

impl DocumentSource for PdfSource {
    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            version: self.doc.version.to_string(),
            page_count: self.page_count(),
            encrypted: self.is_encrypted(),
        }
    }

    fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn decrypt(&mut self, passphrase: &str) -> DecryptOutcome {
        use lopdf::encryption::DecryptionError;

        match self.doc.decrypt(passphrase) {
            Ok(()) => DecryptOutcome::Success,
            Err(lopdf::Error::Decryption(DecryptionError::IncorrectPassword)) => {
                DecryptOutcome::IncorrectPassphrase
            }
            Err(e) => DecryptOutcome::Malformed(e.to_string()),
        }
    }

    fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        self.doc
            .extract_text(&[page])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page, e)))
    }

    fn page_images(&self, page: u32) -> Result<Vec<NamedImage>> {
        let pages = self.doc.get_pages();
        let page_id = *pages
            .get(&page)
            .ok_or(Error::PageOutOfRange(page, pages.len() as u32))?;

        let mut images = Vec::new();

        let Ok(page_dict) = self.doc.get_dictionary(page_id) else {
            return Ok(images);
        };
        let Ok(res) = page_dict.get(b"Resources") else {
            return Ok(images);
        };

        let res_dict = match res {
            lopdf::Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            lopdf::Object::Dictionary(d) => Some(d),
            _ => None,
        };
        let Some(res_dict) = res_dict else {
            return Ok(images);
        };

        let Ok(xobjects) = res_dict.get(b"XObject") else {
            return Ok(images);
        };
        let xobj_dict = match xobjects {
            lopdf::Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            lopdf::Object::Dictionary(d) => Some(d),
            _ => None,
        };
        let Some(xobj_dict) = xobj_dict else {
            return Ok(images);
        };

        for (name, obj) in xobj_dict.iter() {
            let Ok(obj_ref) = obj.as_reference() else {
                continue;
            };
            match self.extract_image_stream(obj_ref) {
                Ok(data) => images.push(NamedImage {
                    name: String::from_utf8_lossy(name).to_string(),
                    data,
                }),
                // Non-image XObjects (forms) share the dictionary; skip them.
                Err(e) => log::debug!("Skipping XObject {:?} on page {}: {}", name, page, e),
            }
        }

        Ok(images)
    }
}
