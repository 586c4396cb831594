use super::synthesizer::SpeechSynthesizer;
use super::voice_language_tag;
use crate::domain::speech::{AudioClip, AudioFormat, SpeechError, SpeechRequest, SynthesisOutcome};
use crate::infrastructure::config::GoogleTtsSection;
use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;

const SYNTHESIZE_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Google Cloud Text-to-Speech
///
/// Credentials are read from the file named by `googleTTS.creds_file`,
/// which holds the API key for the Text-to-Speech API.
pub struct GoogleSynthesizer {
    http: reqwest::Client,
    config: GoogleTtsSection,
}

#[derive(Debug, Deserialize)]
struct SynthesizeResponse {
    #[serde(rename = "audioContent")]
    audio_content: String,
}

impl GoogleSynthesizer {
    pub fn new(http: reqwest::Client, config: GoogleTtsSection) -> Self {
        Self { http, config }
    }

    fn read_api_key(&self) -> Result<String, SpeechError> {
        if self.config.creds_file.trim().is_empty() {
            return Err(SpeechError::missing_setting("googleTTS.creds_file"));
        }
        let contents = std::fs::read_to_string(&self.config.creds_file).map_err(|e| {
            SpeechError::Configuration(format!(
                "cannot read googleTTS.creds_file '{}': {e}",
                self.config.creds_file
            ))
        })?;
        let key = contents.trim().to_string();
        if key.is_empty() {
            return Err(SpeechError::Configuration(format!(
                "googleTTS.creds_file '{}' is empty",
                self.config.creds_file
            )));
        }
        Ok(key)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSynthesizer {
    fn name(&self) -> &str {
        "gTTS"
    }

    async fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> Result<SynthesisOutcome, SpeechError> {
        let key = self.read_api_key()?;
        if self.config.voiceid.trim().is_empty() {
            return Err(SpeechError::missing_setting("googleTTS.voiceid"));
        }
        let lang = voice_language_tag(&self.config.voiceid, "googleTTS.voiceid")?;

        let body = serde_json::json!({
            "input": { "text": request.text },
            "voice": { "languageCode": lang, "name": self.config.voiceid },
            "audioConfig": { "audioEncoding": "LINEAR16" },
        });

        tracing::debug!(
            voice = %self.config.voiceid,
            lang = %lang,
            text_length = request.text.len(),
            "calling Google Cloud speech synthesis"
        );

        let response = self
            .http
            .post(SYNTHESIZE_URL)
            .query(&[("key", key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Provider(format!("Google request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Provider(format!(
                "Google returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::Provider(format!("malformed Google response: {e}")))?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.audio_content)
            .map_err(|e| SpeechError::Provider(format!("invalid base64 audio content: {e}")))?;

        // LINEAR16 responses carry a WAV header
        Ok(SynthesisOutcome::Clip(AudioClip {
            bytes,
            format: AudioFormat::Wav,
        }))
    }
}
