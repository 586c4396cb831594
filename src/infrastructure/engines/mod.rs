pub mod azure;
pub mod espeak;
pub mod fallback;
pub mod google;
pub mod gspeak;
pub mod kurdish;
pub mod synthesizer;

pub use azure::AzureSynthesizer;
pub use espeak::PlatformVoiceSynthesizer;
pub use fallback::PlatformFallbackSynthesizer;
pub use google::GoogleSynthesizer;
pub use gspeak::GoogleTranslateSynthesizer;
pub use kurdish::KurdishSynthesizer;
pub use synthesizer::SpeechSynthesizer;

use crate::domain::speech::{EngineKind, SpeechError};
use crate::error::{AppError, AppResult};
use crate::infrastructure::config::Settings;
use std::time::Duration;

/// Bound on every provider call so a dead network surfaces as a provider
/// error instead of blocking indefinitely.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the synthesizer matching the configured engine.
///
/// Creation never fails: each engine validates its own configuration when
/// it is asked to synthesize, so a misconfigured engine surfaces its error
/// at speak time, not at wiring time.
pub trait EngineFactory: Send + Sync {
    fn create(&self, settings: &Settings) -> Box<dyn SpeechSynthesizer>;
}

pub struct DefaultEngineFactory {
    http: reqwest::Client,
}

impl DefaultEngineFactory {
    pub fn new() -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

impl EngineFactory for DefaultEngineFactory {
    fn create(&self, settings: &Settings) -> Box<dyn SpeechSynthesizer> {
        match EngineKind::from_setting(&settings.tts.engine) {
            EngineKind::Azure => Box::new(AzureSynthesizer::new(
                self.http.clone(),
                settings.azure_tts.clone(),
            )),
            EngineKind::Google => Box::new(GoogleSynthesizer::new(
                self.http.clone(),
                settings.google_tts.clone(),
            )),
            EngineKind::PlatformVoice => Box::new(PlatformVoiceSynthesizer::new(
                settings.sapi5_tts.voiceid.clone(),
                settings.tts.rate,
                settings.tts.volume,
            )),
            EngineKind::GoogleTranslate => Box::new(GoogleTranslateSynthesizer::new(
                self.http.clone(),
                settings.translate.end_lang.clone(),
            )),
            EngineKind::Kurdish => Box::new(KurdishSynthesizer::new(
                self.http.clone(),
                settings.kurdish_tts.clone(),
            )),
            EngineKind::Fallback(name) => Box::new(PlatformFallbackSynthesizer::new(
                name,
                settings.tts.voiceid.clone(),
                settings.tts.rate,
                settings.tts.volume,
            )),
        }
    }
}

/// Derive the language tag from a structured voice id such as
/// `en-US-JennyNeural`: the first two hyphen-delimited segments.
pub(crate) fn voice_language_tag(voiceid: &str, key: &str) -> Result<String, SpeechError> {
    let mut parts = voiceid.splitn(3, '-');
    match (parts.next(), parts.next()) {
        (Some(language), Some(region)) if !language.is_empty() && !region.is_empty() => {
            Ok(format!("{language}-{region}"))
        }
        _ => Err(SpeechError::Configuration(format!(
            "setting '{key}' must look like '<language>-<region>-<voice>', got '{voiceid}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings_with_engine(engine: &str) -> Settings {
        let mut settings = Settings::default();
        settings.tts.engine = engine.to_string();
        settings
    }

    #[test]
    fn test_factory_routes_known_engines() {
        let factory = DefaultEngineFactory::new().unwrap();
        assert_eq!(
            factory.create(&settings_with_engine("azureTTS")).name(),
            "azureTTS"
        );
        assert_eq!(factory.create(&settings_with_engine("gTTS")).name(), "gTTS");
        assert_eq!(
            factory.create(&settings_with_engine("sapi5")).name(),
            "sapi5"
        );
        assert_eq!(
            factory.create(&settings_with_engine("gspeak")).name(),
            "gspeak"
        );
        assert_eq!(
            factory.create(&settings_with_engine("kurdishTTS")).name(),
            "kurdishTTS"
        );
    }

    #[test]
    fn test_factory_routes_unknown_engine_to_fallback() {
        let factory = DefaultEngineFactory::new().unwrap();
        let synthesizer = factory.create(&settings_with_engine("definitely-not-real"));
        assert_eq!(synthesizer.name(), "definitely-not-real");
    }

    #[test]
    fn test_voice_language_tag_parses_structured_ids() {
        assert_eq!(
            voice_language_tag("en-US-JennyNeural", "azureTTS.voiceid").unwrap(),
            "en-US"
        );
        assert_eq!(
            voice_language_tag("fr-FR-DeniseNeural", "azureTTS.voiceid").unwrap(),
            "fr-FR"
        );
        // Voice names may themselves contain hyphens
        assert_eq!(
            voice_language_tag("en-GB-Ryan-Apollo", "azureTTS.voiceid").unwrap(),
            "en-GB"
        );
    }

    #[test]
    fn test_voice_language_tag_rejects_unstructured_ids() {
        assert!(voice_language_tag("JennyNeural", "azureTTS.voiceid").is_err());
        assert!(voice_language_tag("", "azureTTS.voiceid").is_err());
        assert!(voice_language_tag("en-", "azureTTS.voiceid").is_err());
    }
}
