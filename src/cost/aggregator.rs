//! Aggregation of text and image token costs into a report.

use std::sync::Arc;

use rayon::prelude::*;

use crate::decode::ImageDecoder;
use crate::error::{Error, Result};
use crate::model::{ImageAsset, ImageCost, SkippedImage, TokenCostReport};
use crate::tokenizer::Tokenizer;

use super::tile::tile_cost;

/// What to do when an image's dimensions cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndecodablePolicy {
    /// Abort the whole report. No partial totals are ever returned
    /// without the caller opting in.
    #[default]
    Abort,

    /// Omit the image from the total and record it in the report's
    /// skipped list, so the omission is surfaced rather than silent.
    Skip,
}

/// Combines tokenizer output and per-image tile costs into a
/// [`TokenCostReport`].
///
/// Holds explicitly constructed tokenizer and decoder instances; both
/// are reusable across documents and shareable across threads.
pub struct CostAggregator {
    tokenizer: Arc<dyn Tokenizer>,
    decoder: Arc<dyn ImageDecoder>,
}

impl CostAggregator {
    /// Create an aggregator from collaborator instances.
    pub fn new(tokenizer: Arc<dyn Tokenizer>, decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { tokenizer, decoder }
    }

    /// Vocabulary name of the underlying tokenizer.
    pub fn tokenizer_name(&self) -> &str {
        self.tokenizer.name()
    }

    /// Aggregate sequentially, releasing each image buffer before the
    /// next one is costed.
    ///
    /// `assets` is consumed in order; extraction failures always
    /// propagate, decode failures follow `policy`.
    pub fn aggregate<I>(
        &self,
        text: &str,
        assets: I,
        policy: UndecodablePolicy,
    ) -> Result<TokenCostReport>
    where
        I: IntoIterator<Item = Result<ImageAsset>>,
    {
        let text_tokens = self.tokenizer.count(text)?;

        let mut images = Vec::new();
        let mut skipped = Vec::new();

        for asset in assets {
            let asset = asset?;
            match self.asset_cost(&asset) {
                Ok(tokens) => images.push(ImageCost::new(asset.id, tokens)),
                Err(e) => self.apply_policy(policy, asset, e, &mut skipped)?,
            }
        }

        Ok(TokenCostReport::new(text_tokens, images, skipped))
    }

    /// Aggregate with per-image decoding fanned out across threads.
    ///
    /// The tile cost is a pure function, so parallel execution has no
    /// observable effect beyond timing: results are recombined in the
    /// original document order before the report is assembled. Unlike
    /// [`aggregate`](Self::aggregate), all image buffers are held in
    /// memory at once.
    pub fn aggregate_parallel(
        &self,
        text: &str,
        assets: Vec<ImageAsset>,
        policy: UndecodablePolicy,
    ) -> Result<TokenCostReport> {
        let text_tokens = self.tokenizer.count(text)?;

        // Order-preserving collect; costing happens out of order.
        let costed: Vec<(ImageAsset, Result<u64>)> = assets
            .into_par_iter()
            .map(|asset| {
                let cost = self.asset_cost(&asset);
                (asset, cost)
            })
            .collect();

        let mut images = Vec::new();
        let mut skipped = Vec::new();

        for (asset, cost) in costed {
            match cost {
                Ok(tokens) => images.push(ImageCost::new(asset.id, tokens)),
                Err(e) => self.apply_policy(policy, asset, e, &mut skipped)?,
            }
        }

        Ok(TokenCostReport::new(text_tokens, images, skipped))
    }

    /// Resolve one image's dimensions and compute its tile cost.
    fn asset_cost(&self, asset: &ImageAsset) -> Result<u64> {
        let (width, height) =
            self.decoder
                .dimensions(&asset.data)
                .map_err(|e| Error::UndecodableImage {
                    id: asset.id.clone(),
                    reason: e.to_string(),
                })?;

        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                id: asset.id.clone(),
                width,
                height,
            });
        }

        Ok(tile_cost(width, height))
    }

    fn apply_policy(
        &self,
        policy: UndecodablePolicy,
        asset: ImageAsset,
        error: Error,
        skipped: &mut Vec<SkippedImage>,
    ) -> Result<()> {
        match policy {
            UndecodablePolicy::Abort => Err(error),
            UndecodablePolicy::Skip => {
                let reason = match &error {
                    Error::UndecodableImage { reason, .. } => reason.clone(),
                    Error::InvalidDimensions { width, height, .. } => {
                        format!("invalid dimensions {}x{}", width, height)
                    }
                    other => other.to_string(),
                };
                log::warn!("Skipping image {}: {}", asset.id, reason);
                skipped.push(SkippedImage::new(asset.id, reason));
                Ok(())
            }
        }
    }
}
