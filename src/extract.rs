//! Page-order extraction of text and image assets.
//!
//! The extractor's job is strictly sequencing and concatenation: all
//! byte-level work is delegated to the [`DocumentSource`]. Pages are
//! visited in order, images within a page keep their resource order,
//! and nothing is ever reordered.

use std::collections::VecDeque;

use crate::error::Result;
use crate::model::{ImageAsset, ImageId};
use crate::source::DocumentSource;

/// Walks a document's pages and produces text and image assets in
/// document order.
pub struct Extractor<S: DocumentSource> {
    source: S,
}

impl<S: DocumentSource> Extractor<S> {
    /// Create an extractor over an unlocked source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Borrow the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consume the extractor and return the source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Concatenate all page text fragments in page order.
    ///
    /// Each fragment is followed by a line separator, including empty
    /// fragments: a page that yields no text contributes only the
    /// separator, keeping page ordering intact. A page whose extraction
    /// fails is logged and treated as empty rather than aborting the
    /// whole document.
    pub fn concatenated_text(&self) -> Result<String> {
        let mut text = String::new();

        for page in 1..=self.source.page_count() {
            match self.source.page_text(page) {
                Ok(fragment) => text.push_str(&fragment),
                Err(e) => {
                    log::warn!("Failed to extract text from page {}: {}", page, e);
                }
            }
            text.push('\n');
        }

        Ok(text)
    }

    /// Iterate over all image assets across all pages, in (page,
    /// intra-page) order.
    ///
    /// The iterator pulls one page's images at a time, so peak memory is
    /// bounded by a single page rather than the whole document. Pages
    /// with zero images are passed over without disturbing the order.
    pub fn images(&self) -> ImageAssets<'_, S> {
        ImageAssets {
            source: &self.source,
            page_count: self.source.page_count(),
            next_page: 1,
            buffered: VecDeque::new(),
            done: false,
        }
    }

    /// Collect every image asset into memory at once.
    ///
    /// Convenience for callers that parallelize per-image work and can
    /// afford to hold all buffers simultaneously.
    pub fn collect_images(&self) -> Result<Vec<ImageAsset>> {
        self.images().collect()
    }
}

/// Lazy iterator over a document's image assets.
pub struct ImageAssets<'a, S: DocumentSource> {
    source: &'a S,
    page_count: u32,
    next_page: u32,
    buffered: VecDeque<ImageAsset>,
    done: bool,
}

impl<S: DocumentSource> Iterator for ImageAssets<'_, S> {
    type Item = Result<ImageAsset>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some(asset) = self.buffered.pop_front() {
                return Some(Ok(asset));
            }

            if self.next_page > self.page_count {
                self.done = true;
                return None;
            }

            let page = self.next_page;
            self.next_page += 1;

            match self.source.page_images(page) {
                Ok(images) => {
                    self.buffered.extend(images.into_iter().enumerate().map(
                        |(index, image)| {
                            ImageAsset::new(
                                ImageId::new(page, index as u32, image.name),
                                image.data,
                            )
                        },
                    ));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
