use super::synthesizer::SpeechSynthesizer;
use super::voice_language_tag;
use crate::domain::speech::{AudioClip, AudioFormat, SpeechError, SpeechRequest, SynthesisOutcome};
use crate::infrastructure::config::AzureTtsSection;
use async_trait::async_trait;

/// Named speaking styles accepted by the Azure voice service. A style
/// outside this list degrades to plain text instead of erroring, so a
/// stale style name in a saved configuration never blocks speech.
const VALID_STYLES: &[&str] = &[
    "advertisement_upbeat",
    "affectionate",
    "angry",
    "assistant",
    "calm",
    "chat",
    "cheerful",
    "customerservice",
    "depressed",
    "disgruntled",
    "documentary-narration",
    "embarrassed",
    "empathetic",
    "envious",
    "excited",
    "fearful",
    "friendly",
    "gentle",
    "hopeful",
    "lyrical",
    "narration-professional",
    "narration-relaxed",
    "newscast",
    "newscast-casual",
    "newscast-formal",
    "poetry-reading",
    "sad",
    "serious",
    "shouting",
    "sports_commentary",
    "sports_commentary_excited",
    "whispering",
    "terrified",
    "unfriendly",
];

/// Azure Cognitive Services speech synthesis
pub struct AzureSynthesizer {
    http: reqwest::Client,
    config: AzureTtsSection,
}

impl AzureSynthesizer {
    pub fn new(http: reqwest::Client, config: AzureTtsSection) -> Self {
        Self { http, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.config.location
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSynthesizer {
    fn name(&self) -> &str {
        "azureTTS"
    }

    async fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> Result<SynthesisOutcome, SpeechError> {
        if self.config.key.trim().is_empty() {
            return Err(SpeechError::missing_setting("azureTTS.key"));
        }
        if self.config.location.trim().is_empty() {
            return Err(SpeechError::missing_setting("azureTTS.location"));
        }
        if self.config.voiceid.trim().is_empty() {
            return Err(SpeechError::missing_setting("azureTTS.voiceid"));
        }
        let lang = voice_language_tag(&self.config.voiceid, "azureTTS.voiceid")?;

        let ssml = build_ssml(&lang, &self.config.voiceid, request);
        tracing::debug!(
            voice = %self.config.voiceid,
            lang = %lang,
            ssml_length = ssml.len(),
            "calling Azure speech synthesis"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("Ocp-Apim-Subscription-Key", &self.config.key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", "riff-24khz-16bit-mono-pcm")
            .header("User-Agent", "voxroute")
            .body(ssml)
            .send()
            .await
            .map_err(|e| SpeechError::Provider(format!("Azure request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Provider(format!(
                "Azure returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Provider(format!("failed to read Azure audio: {e}")))?;

        Ok(SynthesisOutcome::Clip(AudioClip {
            bytes: bytes.to_vec(),
            format: AudioFormat::Wav,
        }))
    }
}

fn build_ssml(lang: &str, voice: &str, request: &SpeechRequest) -> String {
    let text = xml_escape(&request.text);

    let inner = match request.style.as_deref() {
        Some(style) if VALID_STYLES.contains(&style) => match request.style_degree {
            Some(degree) => format!(
                r#"<mstts:express-as style="{style}" styledegree="{degree}">{text}</mstts:express-as>"#
            ),
            None => format!(r#"<mstts:express-as style="{style}">{text}</mstts:express-as>"#),
        },
        // Unrecognized style: speak plainly rather than failing
        _ => text,
    };

    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' \
         xmlns:mstts='https://www.w3.org/2001/mstts' xml:lang='{lang}'>\
         <voice name='{voice}'>{inner}</voice></speak>"
    )
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request_with_style(style: Option<&str>, degree: Option<f32>) -> SpeechRequest {
        SpeechRequest {
            text: "Hello world".to_string(),
            style: style.map(str::to_string),
            style_degree: degree,
        }
    }

    fn azure(config: AzureTtsSection) -> AzureSynthesizer {
        AzureSynthesizer::new(reqwest::Client::new(), config)
    }

    #[test]
    fn test_build_ssml_without_style() {
        let ssml = build_ssml("en-US", "en-US-JennyNeural", &request_with_style(None, None));
        assert!(ssml.contains("<voice name='en-US-JennyNeural'>Hello world</voice>"));
        assert!(ssml.contains("xml:lang='en-US'"));
        assert!(!ssml.contains("express-as"));
    }

    #[test]
    fn test_build_ssml_with_valid_style() {
        let ssml = build_ssml(
            "en-US",
            "en-US-JennyNeural",
            &request_with_style(Some("cheerful"), None),
        );
        assert!(ssml.contains(r#"<mstts:express-as style="cheerful">Hello world</mstts:express-as>"#));
    }

    #[test]
    fn test_build_ssml_with_style_degree() {
        let ssml = build_ssml(
            "en-US",
            "en-US-JennyNeural",
            &request_with_style(Some("cheerful"), Some(1.5)),
        );
        assert!(ssml.contains(r#"style="cheerful" styledegree="1.5""#));
    }

    #[test]
    fn test_build_ssml_degrades_unknown_style_to_plain_text() {
        let ssml = build_ssml(
            "en-US",
            "en-US-JennyNeural",
            &request_with_style(Some("not-a-real-style"), Some(2.0)),
        );
        assert!(!ssml.contains("express-as"));
        assert!(ssml.contains(">Hello world</voice>"));
    }

    #[test]
    fn test_build_ssml_escapes_markup_in_text() {
        let request = SpeechRequest::new("a < b & b > c");
        let ssml = build_ssml("en-US", "en-US-JennyNeural", &request);
        assert!(ssml.contains("a &lt; b &amp; b &gt; c"));
    }

    #[tokio::test]
    async fn test_synthesize_rejects_blank_key() {
        let synthesizer = azure(AzureTtsSection {
            key: String::new(),
            location: "westeurope".to_string(),
            voiceid: "en-US-JennyNeural".to_string(),
        });
        let err = synthesizer
            .synthesize(&SpeechRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::Configuration(_)));
        assert!(err.to_string().contains("azureTTS.key"));
    }

    #[tokio::test]
    async fn test_synthesize_rejects_voice_without_language_segments() {
        let synthesizer = azure(AzureTtsSection {
            key: "key".to_string(),
            location: "westeurope".to_string(),
            voiceid: "JennyNeural".to_string(),
        });
        let err = synthesizer
            .synthesize(&SpeechRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::Configuration(_)));
    }

    #[test]
    fn test_valid_styles_include_documented_set() {
        assert!(VALID_STYLES.contains(&"cheerful"));
        assert!(VALID_STYLES.contains(&"whispering"));
        assert!(!VALID_STYLES.contains(&"sarcastic"));
        assert_eq!(VALID_STYLES.len(), 34);
    }
}
