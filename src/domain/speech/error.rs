/// Errors raised by the speech dispatch path.
///
/// `Configuration` is user-fixable and surfaced verbatim; `Provider` is a
/// network or service failure and is never retried; `UnsupportedEngine`
/// means the engine is recognized but cannot run on this platform.
/// Cache reads never error (a broken entry is a miss), cache writes do.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),

    #[error("cache write failed: {0}")]
    CacheWrite(#[source] std::io::Error),
}

impl SpeechError {
    /// Missing or blank required settings key
    pub fn missing_setting(key: &str) -> Self {
        SpeechError::Configuration(format!("required setting '{key}' is empty"))
    }
}
