use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Read-only settings snapshot for the dispatch core.
///
/// The settings form owns the file; this side only ever reads it. Section
/// and key names mirror the persisted file so a hand-edited config keeps
/// working.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "TTS")]
    pub tts: TtsSection,
    #[serde(rename = "azureTTS")]
    pub azure_tts: AzureTtsSection,
    #[serde(rename = "googleTTS")]
    pub google_tts: GoogleTtsSection,
    #[serde(rename = "sapi5TTS")]
    pub sapi5_tts: Sapi5TtsSection,
    #[serde(rename = "kurdishTTS")]
    pub kurdish_tts: KurdishTtsSection,
    pub translate: TranslateSection,
    pub cache: CacheSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TtsSection {
    /// One of `azureTTS`, `gTTS`, `sapi5`, `gspeak`, `kurdishTTS`; anything
    /// else routes to the generic platform fallback.
    pub engine: String,
    pub voiceid: String,
    /// Speaking rate in words per minute
    pub rate: i32,
    /// Volume, 0-100
    pub volume: i32,
    pub save_audio_file: bool,
}

impl Default for TtsSection {
    fn default() -> Self {
        Self {
            engine: "gspeak".to_string(),
            voiceid: String::new(),
            rate: 175,
            volume: 100,
            save_audio_file: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AzureTtsSection {
    pub key: String,
    pub location: String,
    pub voiceid: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GoogleTtsSection {
    pub creds_file: String,
    pub voiceid: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Sapi5TtsSection {
    pub voiceid: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct KurdishTtsSection {
    pub latin: bool,
    pub punctuation: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TranslateSection {
    /// Target language of the translation step. The gspeak engine speaks in
    /// this language, not in an independent TTS setting.
    #[serde(rename = "endLang")]
    pub end_lang: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CacheSection {
    /// Overrides the platform cache directory
    pub dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from a TOML file, then apply env-var overrides for
    /// secrets. A missing file yields defaults: the settings form may not
    /// have been run yet on this machine.
    pub fn load(path: &Path) -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let mut settings = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            toml::from_str::<Settings>(&raw).map_err(|e| {
                AppError::Settings(format!("{}: {}", path.display(), e))
            })?
        } else {
            tracing::warn!(
                path = %path.display(),
                "settings file not found, using defaults"
            );
            Settings::default()
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("AZURE_TTS_KEY") {
            self.azure_tts.key = key;
        }
        if let Ok(location) = env::var("AZURE_TTS_LOCATION") {
            self.azure_tts.location = location;
        }
        if let Ok(creds) = env::var("GOOGLE_CREDS_FILE") {
            self.google_tts.creds_file = creds;
        }
    }

    /// Directory holding cached audio clips
    pub fn cache_dir(&self) -> PathBuf {
        if let Some(dir) = &self.cache.dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "voxroute")
            .map(|dirs| dirs.cache_dir().join("audio"))
            .unwrap_or_else(|| env::temp_dir().join("voxroute-audio"))
    }
}

/// Default location of the settings file written by the settings form
pub fn default_settings_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "voxroute")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from("settings.toml"))
}
