//! Text tokenization seam.
//!
//! The engine only consumes the length of the token-id sequence, but the
//! full sequence is exposed so a presentation layer can display it. The
//! tokenizer is an explicitly constructed, reusable instance passed into
//! the aggregator -- never process-global state.

use crate::error::{Error, Result};
use std::sync::Arc;

/// A byte-pair-encoding tokenizer over a fixed, versioned vocabulary.
pub trait Tokenizer: Send + Sync {
    /// Encode text into its token-id sequence.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Vocabulary name (e.g., "cl100k_base").
    fn name(&self) -> &str;

    /// Number of tokens the text encodes to.
    fn count(&self, text: &str) -> Result<u64> {
        Ok(self.encode(text)?.len() as u64)
    }
}

/// Tokenizer backed by tiktoken's BPE vocabularies.
pub struct BpeTokenizer {
    bpe: tiktoken_rs::CoreBPE,
    name: &'static str,
}

impl BpeTokenizer {
    /// Build a tokenizer over the `cl100k_base` vocabulary (GPT-4 /
    /// GPT-3.5-turbo).
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| Error::Tokenizer(e.to_string()))?;
        Ok(Self {
            bpe,
            name: "cl100k_base",
        })
    }

    /// Build a tokenizer over the `o200k_base` vocabulary (GPT-4o).
    pub fn o200k() -> Result<Self> {
        let bpe = tiktoken_rs::o200k_base().map_err(|e| Error::Tokenizer(e.to_string()))?;
        Ok(Self {
            bpe,
            name: "o200k_base",
        })
    }

    /// Wrap the tokenizer for sharing across aggregators.
    pub fn shared(self) -> Arc<dyn Tokenizer> {
        Arc::new(self)
    }
}

impl Tokenizer for BpeTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(self.bpe.encode_ordinary(text))
    }

    fn name(&self) -> &str {
        self.name
    }
}
