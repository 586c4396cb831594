//! TTS dispatch with a persistent audio cache.
//!
//! [`domain::speech::SpeechService::speak`] selects a synthesis engine from
//! the persisted settings, synthesizes the given text, plays it, and
//! optionally caches the clip keyed by the exact input text.

pub mod domain;
pub mod error;
pub mod infrastructure;
