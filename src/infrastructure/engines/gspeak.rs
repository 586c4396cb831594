use super::synthesizer::SpeechSynthesizer;
use crate::domain::speech::{AudioClip, AudioFormat, SpeechError, SpeechRequest, SynthesisOutcome};
use async_trait::async_trait;

/// The translate endpoint rejects requests beyond ~200 characters
const MAX_CHUNK_SIZE: usize = 200;

const TRANSLATE_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Network synthesis through the Google Translate speech endpoint.
///
/// The target language follows `translate.endLang`: speech is produced in
/// the language the text was translated into, not an independent TTS
/// setting.
pub struct GoogleTranslateSynthesizer {
    http: reqwest::Client,
    lang: String,
}

impl GoogleTranslateSynthesizer {
    pub fn new(http: reqwest::Client, lang: String) -> Self {
        Self { http, lang }
    }

    fn chunk_url(&self, chunk: &str) -> String {
        format!(
            "{TRANSLATE_TTS_URL}?ie=UTF-8&client=tw-ob&tl={}&q={}",
            self.lang,
            urlencoding::encode(chunk)
        )
    }

    async fn fetch_chunk(&self, chunk: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self
            .http
            .get(self.chunk_url(chunk))
            .send()
            .await
            .map_err(|e| SpeechError::Provider(format!("translate endpoint request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Provider(format!(
                "translate endpoint returned {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpeechError::Provider(format!("failed to read translate audio: {e}")))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateSynthesizer {
    fn name(&self) -> &str {
        "gspeak"
    }

    async fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> Result<SynthesisOutcome, SpeechError> {
        if self.lang.trim().is_empty() {
            return Err(SpeechError::Configuration(
                "translate.endLang must be set for the gspeak engine".to_string(),
            ));
        }

        let chunks = split_into_chunks(&request.text, MAX_CHUNK_SIZE);
        tracing::debug!(
            lang = %self.lang,
            chunk_count = chunks.len(),
            text_length = request.text.len(),
            "synthesizing through translate endpoint"
        );

        let mut merged = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let audio = self.fetch_chunk(chunk).await?;
            merged.extend(audio);
            tracing::debug!(
                chunk_index = index,
                total_audio_size = merged.len(),
                "chunk synthesized and merged"
            );
        }

        Ok(SynthesisOutcome::Clip(AudioClip {
            bytes: merged,
            format: AudioFormat::Mp3,
        }))
    }
}

/// Split text into chunks that respect sentence boundaries, each at most
/// `max_size` characters; sentence-free stretches are cut mid-word.
fn split_into_chunks(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    let sentence_pattern = regex::Regex::new(r"([.!?]+\s+)").unwrap();
    let mut last_end = 0;

    for mat in sentence_pattern.find_iter(text) {
        let sentence = &text[last_end..mat.end()];
        if !current.is_empty() && current.len() + sentence.len() > max_size {
            chunks.push(current.trim().to_string());
            current = String::new();
        }
        current.push_str(sentence);
        last_end = mat.end();
    }

    if last_end < text.len() {
        let remaining = &text[last_end..];
        if !current.is_empty() && current.len() + remaining.len() > max_size {
            chunks.push(current.trim().to_string());
            current = String::new();
        }
        if remaining.len() > max_size {
            let chars: Vec<char> = remaining.chars().collect();
            for piece in chars.chunks(max_size) {
                chunks.push(piece.iter().collect());
            }
        } else {
            current.push_str(remaining);
        }
    }

    if !current.is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}
