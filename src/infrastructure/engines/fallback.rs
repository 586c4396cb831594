use super::synthesizer::SpeechSynthesizer;
use crate::domain::speech::{SpeechError, SpeechRequest, SynthesisOutcome};
use async_trait::async_trait;
use std::time::Duration;
use tts::Tts;

/// Generic fallback for engine names no dedicated adapter recognizes.
///
/// Drives the platform speech facility (Speech Dispatcher, SAPI,
/// AVFoundation) through the `tts` crate. Synthesis and playback happen
/// as one blocking step on the facility's side, so this engine never
/// yields a reusable clip and never participates in the cache.
pub struct PlatformFallbackSynthesizer {
    engine_name: String,
    voice: String,
    rate: i32,
    volume: i32,
}

impl PlatformFallbackSynthesizer {
    pub fn new(engine_name: String, voice: String, rate: i32, volume: i32) -> Self {
        Self {
            engine_name,
            voice,
            rate,
            volume,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for PlatformFallbackSynthesizer {
    fn name(&self) -> &str {
        &self.engine_name
    }

    async fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> Result<SynthesisOutcome, SpeechError> {
        let engine_name = self.engine_name.clone();
        let voice = self.voice.clone();
        let rate = self.rate;
        let volume = self.volume;
        let text = request.text.clone();

        tracing::debug!(
            engine = %engine_name,
            voice = %voice,
            "speaking through platform fallback"
        );

        tokio::task::spawn_blocking(move || -> Result<(), SpeechError> {
            let mut tts = Tts::default().map_err(|e| {
                SpeechError::UnsupportedEngine(format!(
                    "{engine_name}: no platform speech facility available ({e})"
                ))
            })?;

            if !voice.is_empty() {
                select_voice(&mut tts, &voice);
            }
            apply_rate(&mut tts, rate);
            apply_volume(&mut tts, volume);

            tts.speak(&text, true)
                .map_err(|e| SpeechError::Provider(format!("platform speech failed: {e}")))?;

            // speak() queues on some platforms; wait until the utterance
            // has actually finished so the call is one blocking step
            while tts.is_speaking().unwrap_or(false) {
                std::thread::sleep(Duration::from_millis(100));
            }
            Ok(())
        })
        .await
        .map_err(|e| SpeechError::Provider(format!("synthesis task failed: {e}")))??;

        Ok(SynthesisOutcome::PlayedDirectly)
    }
}

fn select_voice(tts: &mut Tts, requested: &str) {
    let target = requested.to_lowercase();
    match tts.voices() {
        Ok(voices) => {
            if let Some(voice) = voices
                .iter()
                .find(|v| v.name().to_lowercase().contains(&target))
            {
                if let Err(e) = tts.set_voice(voice) {
                    tracing::warn!(voice = %requested, error = ?e, "failed to set platform voice");
                }
            } else {
                tracing::warn!(voice = %requested, "no matching platform voice, using default");
            }
        }
        Err(e) => tracing::warn!(error = ?e, "failed to enumerate platform voices"),
    }
}

/// Map a words-per-minute setting onto the backend's advertised rate
/// range, treating 175 wpm as the backend's normal rate.
fn apply_rate(tts: &mut Tts, rate: i32) {
    let scaled = tts.normal_rate() * (rate as f32 / 175.0);
    let clamped = scaled.clamp(tts.min_rate(), tts.max_rate());
    if let Err(e) = tts.set_rate(clamped) {
        tracing::warn!(rate, error = ?e, "failed to set platform speech rate");
    }
}

/// Volume 0-100 maps onto the backend's volume range
fn apply_volume(tts: &mut Tts, volume: i32) {
    let fraction = (volume as f32 / 100.0).clamp(0.0, 1.0);
    let scaled = tts.min_volume() + (tts.max_volume() - tts.min_volume()) * fraction;
    if let Err(e) = tts.set_volume(scaled) {
        tracing::warn!(volume, error = ?e, "failed to set platform speech volume");
    }
}
