//! Non-interactive estimation pipeline.
//!
//! Ties the gate, extractor, and aggregator together for callers that
//! supply any passphrase up front. Interactive callers (a UI or CLI
//! prompt loop) drive [`DecryptionGate`] directly and hand the unlocked
//! source to [`Extractor`] themselves.

use crate::cost::{CostAggregator, UndecodablePolicy};
use crate::decode::PixelDecoder;
use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::gate::{DecryptionGate, GateStatus};
use crate::model::TokenCostReport;
use crate::source::{DocumentSource, PdfSource};
use crate::tokenizer::BpeTokenizer;
use std::path::Path;

/// Options for a single estimation run.
#[derive(Debug, Clone, Default)]
pub struct EstimateOptions {
    /// Passphrase for encrypted documents.
    pub password: Option<String>,

    /// Fan image decoding out across threads. Off by default: the
    /// sequential path holds at most one page of image buffers at a
    /// time, while the parallel path loads all of them.
    pub parallel: bool,

    /// Policy for images whose dimensions cannot be resolved.
    pub undecodable: UndecodablePolicy,
}

impl EstimateOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document passphrase.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Enable parallel per-image decoding.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Skip undecodable images instead of aborting the report.
    pub fn skip_undecodable(mut self) -> Self {
        self.undecodable = UndecodablePolicy::Skip;
        self
    }

    /// Set the undecodable-image policy.
    pub fn with_undecodable_policy(mut self, policy: UndecodablePolicy) -> Self {
        self.undecodable = policy;
        self
    }
}

/// Reusable estimation pipeline.
///
/// Construction is the expensive part (the BPE vocabulary is loaded
/// once); estimating a document is cheap by comparison, so one
/// `Estimator` should serve a whole process or request scope.
pub struct Estimator {
    aggregator: CostAggregator,
    options: EstimateOptions,
}

impl Estimator {
    /// Create an estimator from an aggregator and options.
    pub fn new(aggregator: CostAggregator, options: EstimateOptions) -> Self {
        Self {
            aggregator,
            options,
        }
    }

    /// Create an estimator with the default collaborators
    /// (`cl100k_base` tokenizer, header-only image decoder).
    pub fn with_defaults() -> Result<Self> {
        let aggregator = CostAggregator::new(
            BpeTokenizer::cl100k()?.shared(),
            PixelDecoder::new().shared(),
        );
        Ok(Self::new(aggregator, EstimateOptions::default()))
    }

    /// Replace the options.
    pub fn with_options(mut self, options: EstimateOptions) -> Self {
        self.options = options;
        self
    }

    /// Estimate the token cost of a PDF file.
    pub fn estimate_file<P: AsRef<Path>>(&self, path: P) -> Result<TokenCostReport> {
        self.estimate_source(PdfSource::open(path)?)
    }

    /// Estimate the token cost of an in-memory PDF.
    pub fn estimate_bytes(&self, data: &[u8]) -> Result<TokenCostReport> {
        self.estimate_source(PdfSource::from_bytes(data)?)
    }

    /// Run the pipeline over an already-opened source.
    ///
    /// An encrypted document with no configured password fails with
    /// [`Error::Encrypted`]; a wrong password with
    /// [`Error::IncorrectPassphrase`].
    pub fn estimate_source<S: DocumentSource>(&self, source: S) -> Result<TokenCostReport> {
        let mut gate = DecryptionGate::new(source);

        if gate.is_locked() {
            let password = self.options.password.as_deref().unwrap_or("");
            match gate.submit_passphrase(password) {
                GateStatus::Open => {}
                GateStatus::IncorrectPassphrase => return Err(Error::IncorrectPassphrase),
                // into_inner reports the precise terminal error below.
                GateStatus::AwaitingPassphrase | GateStatus::Failed => {}
            }
        }

        let source = gate.into_inner()?;
        let extractor = Extractor::new(source);
        let text = extractor.concatenated_text()?;

        if self.options.parallel {
            let assets = extractor.collect_images()?;
            self.aggregator
                .aggregate_parallel(&text, assets, self.options.undecodable)
        } else {
            self.aggregator
                .aggregate(&text, extractor.images(), self.options.undecodable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = EstimateOptions::new()
            .with_password("secret")
            .with_parallel(true)
            .skip_undecodable();

        assert_eq!(options.password, Some("secret".to_string()));
        assert!(options.parallel);
        assert_eq!(options.undecodable, UndecodablePolicy::Skip);
    }

    #[test]
    fn test_default_options() {
        let options = EstimateOptions::default();
        assert!(options.password.is_none());
        assert!(!options.parallel);
        assert_eq!(options.undecodable, UndecodablePolicy::Abort);
    }
}
