//! Data model for token cost estimation.
//!
//! This module defines the types that flow through the estimation
//! pipeline: transient image assets tagged with stable identifiers,
//! document information, and the final immutable cost report.

mod asset;
mod info;
mod report;

pub use asset::{ImageAsset, ImageId};
pub use info::DocumentInfo;
pub use report::{ImageCost, SkippedImage, TokenCostReport};
