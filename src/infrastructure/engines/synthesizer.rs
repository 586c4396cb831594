use crate::domain::speech::{SpeechError, SpeechRequest, SynthesisOutcome};
use async_trait::async_trait;

/// A single TTS backend normalized to a common synthesis contract.
/// Abstracts the underlying provider (Azure, Google Cloud, espeak-ng,
/// the translate endpoint, the Kurdish service, or the platform fallback).
///
/// Implementations are responsible for:
/// - Reading and validating their own configuration section before any
///   provider call, surfacing blank or malformed required fields as
///   `SpeechError::Configuration`
/// - Mapping provider and network failures to `SpeechError::Provider`
/// - Declaring the output encoding of the clip they produce
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Engine identifier used for logging and cache entries
    fn name(&self) -> &str;

    /// Synthesize the request into audio
    ///
    /// # Errors
    /// Returns `Configuration` for user-fixable settings problems,
    /// `Provider` for service failures (not retried), and
    /// `UnsupportedEngine` when the engine cannot run on this platform.
    async fn synthesize(&self, request: &SpeechRequest)
        -> Result<SynthesisOutcome, SpeechError>;
}
