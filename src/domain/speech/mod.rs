pub mod error;
pub mod service;

pub use error::SpeechError;
pub use service::{SpeechService, SpeechServiceApi};

use serde::{Deserialize, Serialize};

/// A single synthesis request handed to [`SpeechService::speak`].
///
/// Style parameters are only honored by the Azure engine; every other
/// engine ignores them.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub style: Option<String>,
    pub style_degree: Option<f32>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
            style_degree: None,
        }
    }
}

/// Encoding of a synthesized audio clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Encoded audio produced by a synthesis engine
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

/// What a synthesis engine produced.
///
/// Most engines return a reusable byte clip. The generic fallback drives
/// the platform speech facility directly, playing as it synthesizes, so
/// there is nothing left over to play or cache.
#[derive(Debug)]
pub enum SynthesisOutcome {
    Clip(AudioClip),
    PlayedDirectly,
}

/// The TTS backend selected by the `TTS.engine` setting.
///
/// Unrecognized values route to the generic platform fallback rather than
/// failing; the settings form may reference engines this build does not
/// know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineKind {
    Azure,
    Google,
    PlatformVoice,
    GoogleTranslate,
    Kurdish,
    Fallback(String),
}

impl EngineKind {
    pub fn from_setting(value: &str) -> Self {
        match value {
            "azureTTS" => EngineKind::Azure,
            "gTTS" => EngineKind::Google,
            "sapi5" => EngineKind::PlatformVoice,
            "gspeak" => EngineKind::GoogleTranslate,
            "kurdishTTS" => EngineKind::Kurdish,
            other => EngineKind::Fallback(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_engine_kind_recognizes_known_engines() {
        assert_eq!(EngineKind::from_setting("azureTTS"), EngineKind::Azure);
        assert_eq!(EngineKind::from_setting("gTTS"), EngineKind::Google);
        assert_eq!(EngineKind::from_setting("sapi5"), EngineKind::PlatformVoice);
        assert_eq!(EngineKind::from_setting("gspeak"), EngineKind::GoogleTranslate);
        assert_eq!(EngineKind::from_setting("kurdishTTS"), EngineKind::Kurdish);
    }

    #[test]
    fn test_engine_kind_routes_unknown_values_to_fallback() {
        assert_eq!(
            EngineKind::from_setting("espeak"),
            EngineKind::Fallback("espeak".to_string())
        );
        assert_eq!(
            EngineKind::from_setting(""),
            EngineKind::Fallback(String::new())
        );
    }

    #[test]
    fn test_audio_format_extension() {
        assert_eq!(AudioFormat::Wav.extension(), "wav");
        assert_eq!(AudioFormat::Mp3.extension(), "mp3");
    }
}
