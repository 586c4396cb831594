use super::synthesizer::SpeechSynthesizer;
use crate::domain::speech::{AudioClip, AudioFormat, SpeechError, SpeechRequest, SynthesisOutcome};
use crate::infrastructure::config::KurdishTtsSection;
use async_trait::async_trait;

const KURDISH_TTS_URL: &str = "https://tts.kurdishtts.com/api/tts";

/// Kurdish speech synthesis service.
///
/// The two flags are passed through untouched: `latin` requests
/// Latin-script transliteration, `punctuation` keeps punctuation cues in
/// the synthesis. Output is always mp3, unlike most other engines.
pub struct KurdishSynthesizer {
    http: reqwest::Client,
    config: KurdishTtsSection,
}

impl KurdishSynthesizer {
    pub fn new(http: reqwest::Client, config: KurdishTtsSection) -> Self {
        Self { http, config }
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "text": text,
            "latin": self.config.latin,
            "punctuation": self.config.punctuation,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for KurdishSynthesizer {
    fn name(&self) -> &str {
        "kurdishTTS"
    }

    async fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> Result<SynthesisOutcome, SpeechError> {
        tracing::debug!(
            latin = self.config.latin,
            punctuation = self.config.punctuation,
            text_length = request.text.len(),
            "calling Kurdish speech synthesis"
        );

        let response = self
            .http
            .post(KURDISH_TTS_URL)
            .json(&self.request_body(&request.text))
            .send()
            .await
            .map_err(|e| SpeechError::Provider(format!("Kurdish TTS request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Provider(format!(
                "Kurdish TTS returned {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Provider(format!("failed to read Kurdish TTS audio: {e}")))?;

        Ok(SynthesisOutcome::Clip(AudioClip {
            bytes: bytes.to_vec(),
            format: AudioFormat::Mp3,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body_carries_flags_through() {
        let synthesizer = KurdishSynthesizer::new(
            reqwest::Client::new(),
            KurdishTtsSection {
                latin: true,
                punctuation: false,
            },
        );
        let body = synthesizer.request_body("silav");
        assert_eq!(body["text"], "silav");
        assert_eq!(body["latin"], true);
        assert_eq!(body["punctuation"], false);
    }
}
