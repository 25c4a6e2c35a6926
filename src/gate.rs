//! Passphrase gate for encrypted documents.
//!
//! Access to a protected document is modeled as an explicit state
//! machine driven by discrete "submit passphrase" events, so the same
//! retry loop can be driven from a UI, a CLI prompt, or a batch
//! credential source. No extraction or aggregation can reach the
//! document while the gate is locked or failed: the only way to get the
//! source back out is [`DecryptionGate::into_inner`], which refuses in
//! those states.

use crate::error::{Error, Result};
use crate::source::{DecryptOutcome, DocumentSource};

/// State of the gate.
///
/// Construction performs the first inspection of the document and lands
/// on `NotEncrypted` or `Locked`. `Locked` transitions to `Unlocked` on
/// a correct passphrase, stays `Locked` on empty or incorrect input,
/// and transitions to `Failed` when the encryption metadata itself
/// cannot be processed. `NotEncrypted`, `Unlocked`, and `Failed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No encryption flag was set; the document is usable immediately.
    NotEncrypted,

    /// The document is encrypted and awaiting a correct passphrase.
    Locked,

    /// A correct passphrase was supplied; the document is usable.
    Unlocked,

    /// The encryption metadata is malformed; no passphrase can succeed.
    Failed,
}

/// Result of one submit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateStatus {
    /// The document is readable (never encrypted, or now unlocked).
    Open,

    /// Empty passphrase: still locked, awaiting real input. This is a
    /// suspended state, not an error.
    AwaitingPassphrase,

    /// The passphrase was wrong: still locked, retry allowed.
    IncorrectPassphrase,

    /// Decryption can never succeed for this document.
    Failed,
}

/// State machine guarding access to a possibly-encrypted document.
pub struct DecryptionGate<S: DocumentSource> {
    source: S,
    state: GateState,
    failure: Option<String>,
}

impl<S: DocumentSource> DecryptionGate<S> {
    /// Inspect a document and construct the gate in its initial state.
    pub fn new(source: S) -> Self {
        let state = if source.is_encrypted() {
            GateState::Locked
        } else {
            GateState::NotEncrypted
        };
        Self {
            source,
            state,
            failure: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Whether the document can be read.
    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::NotEncrypted | GateState::Unlocked)
    }

    /// Whether the gate is still awaiting a correct passphrase.
    pub fn is_locked(&self) -> bool {
        self.state == GateState::Locked
    }

    /// Submit a candidate passphrase.
    ///
    /// An empty passphrase leaves the gate locked and signals
    /// [`GateStatus::AwaitingPassphrase`]. A wrong passphrase leaves
    /// the gate locked with unlimited retries. Submitting to an
    /// already-open or failed gate changes nothing and reports the
    /// terminal status.
    pub fn submit_passphrase(&mut self, passphrase: &str) -> GateStatus {
        match self.state {
            GateState::NotEncrypted | GateState::Unlocked => GateStatus::Open,
            GateState::Failed => GateStatus::Failed,
            GateState::Locked => {
                if passphrase.is_empty() {
                    return GateStatus::AwaitingPassphrase;
                }
                match self.source.decrypt(passphrase) {
                    DecryptOutcome::Success => {
                        self.state = GateState::Unlocked;
                        GateStatus::Open
                    }
                    DecryptOutcome::IncorrectPassphrase => {
                        log::debug!("Passphrase rejected; gate remains locked");
                        GateStatus::IncorrectPassphrase
                    }
                    DecryptOutcome::Malformed(reason) => {
                        log::warn!("Encryption metadata unusable: {}", reason);
                        self.state = GateState::Failed;
                        self.failure = Some(reason);
                        GateStatus::Failed
                    }
                }
            }
        }
    }

    /// Borrow the underlying source without consuming the gate.
    ///
    /// Fails while the gate is locked or failed.
    pub fn source(&self) -> Result<&S> {
        match self.state {
            GateState::NotEncrypted | GateState::Unlocked => Ok(&self.source),
            GateState::Locked => Err(Error::Encrypted),
            GateState::Failed => Err(self.failure_error()),
        }
    }

    /// Release the document for extraction.
    ///
    /// Only succeeds once the gate is open; a locked gate yields
    /// [`Error::Encrypted`] and a failed gate
    /// [`Error::MalformedEncryption`].
    pub fn into_inner(self) -> Result<S> {
        match self.state {
            GateState::NotEncrypted | GateState::Unlocked => Ok(self.source),
            GateState::Locked => Err(Error::Encrypted),
            GateState::Failed => Err(self.failure_error()),
        }
    }

    fn failure_error(&self) -> Error {
        Error::MalformedEncryption(
            self.failure
                .clone()
                .unwrap_or_else(|| "unknown failure".to_string()),
        )
    }
}
