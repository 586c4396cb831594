use super::{EngineKind, SpeechError, SpeechRequest, SynthesisOutcome};
use crate::infrastructure::audio::{AudioCache, Playback};
use crate::infrastructure::config::Settings;
use crate::infrastructure::engines::EngineFactory;
use async_trait::async_trait;
use std::sync::Arc;

/// Top-level dispatch entry point.
///
/// Stateless across calls: configuration lives in [`Settings`] and all
/// persisted state lives in the [`AudioCache`].
pub struct SpeechService {
    settings: Arc<Settings>,
    cache: Arc<AudioCache>,
    player: Arc<dyn Playback>,
    engines: Arc<dyn EngineFactory>,
}

impl SpeechService {
    pub fn new(
        settings: Arc<Settings>,
        cache: Arc<AudioCache>,
        player: Arc<dyn Playback>,
        engines: Arc<dyn EngineFactory>,
    ) -> Self {
        Self {
            settings,
            cache,
            player,
            engines,
        }
    }
}

#[async_trait]
pub trait SpeechServiceApi: Send + Sync {
    /// Synthesize and play speech for the given request
    ///
    /// This operation:
    /// - Serves a previously cached clip when one exists for the exact text
    /// - Otherwise selects the engine named by `TTS.engine`, synthesizes,
    ///   plays the result, and caches it when `TTS.save_audio_file` is set
    ///
    /// Configuration, provider, and unsupported-engine errors propagate to
    /// the caller; no retry and no fallback-engine substitution happens here.
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError>;
}

#[async_trait]
impl SpeechServiceApi for SpeechService {
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        // Cache first. A stale index entry (file deleted behind our back)
        // comes back as a miss and falls through to fresh synthesis.
        if let Some(path) = self.cache.lookup(&request.text) {
            tracing::info!(
                text = %request.text,
                path = %path.display(),
                "speech synthesized from cache"
            );
            self.player.play_file(&path);
            return Ok(());
        }

        let engine_setting = self.settings.tts.engine.clone();
        let engine_kind = EngineKind::from_setting(&engine_setting);

        // Only the Azure engine understands speaking styles
        if request.style.is_some() && engine_kind != EngineKind::Azure {
            tracing::debug!(
                engine = %engine_setting,
                "style parameters ignored by this engine"
            );
        }

        let synthesizer = self.engines.create(&self.settings);
        let engine_name = synthesizer.name().to_string();

        let outcome = match synthesizer.synthesize(&request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    engine = %engine_name,
                    text = %request.text,
                    "speech synthesis failed"
                );
                return Err(err);
            }
        };

        match outcome {
            SynthesisOutcome::Clip(clip) => {
                self.player.play_clip(&clip);
                tracing::info!(
                    engine = %engine_name,
                    text = %request.text,
                    audio_size = clip.bytes.len(),
                    format = %clip.format,
                    "speech synthesized"
                );

                if self.settings.tts.save_audio_file {
                    let path = self
                        .cache
                        .store(&request.text, &clip.bytes, &engine_name, clip.format)
                        .map_err(|err| {
                            tracing::error!(
                                error = %err,
                                engine = %engine_name,
                                text = %request.text,
                                "failed to cache synthesized audio"
                            );
                            err
                        })?;
                    tracing::debug!(path = %path.display(), "audio clip cached");
                }
            }
            SynthesisOutcome::PlayedDirectly => {
                // The engine already played the utterance and produced no
                // reusable bytes, so there is nothing to cache.
                tracing::info!(
                    engine = %engine_name,
                    text = %request.text,
                    "speech synthesized and played by engine"
                );
            }
        }

        Ok(())
    }
}
