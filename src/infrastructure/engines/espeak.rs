use super::synthesizer::SpeechSynthesizer;
use crate::domain::speech::{AudioClip, AudioFormat, SpeechError, SpeechRequest, SynthesisOutcome};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Command;
use uuid::Uuid;

/// Platform voice synthesis through espeak-ng.
///
/// Fills the role of the OS voice API: rate and volume from the `TTS`
/// section are applied to the engine invocation, the voice comes from
/// `sapi5TTS.voiceid` (empty means the platform default), and output is
/// always wav.
pub struct PlatformVoiceSynthesizer {
    voice: String,
    rate: i32,
    volume: i32,
}

impl PlatformVoiceSynthesizer {
    pub fn new(voice: String, rate: i32, volume: i32) -> Self {
        Self { voice, rate, volume }
    }
}

#[async_trait]
impl SpeechSynthesizer for PlatformVoiceSynthesizer {
    fn name(&self) -> &str {
        "sapi5"
    }

    async fn synthesize(
        &self,
        request: &SpeechRequest,
    ) -> Result<SynthesisOutcome, SpeechError> {
        let espeak = resolve_binary().ok_or_else(|| {
            SpeechError::UnsupportedEngine(
                "sapi5: no platform voice engine found (espeak-ng is not installed)".to_string(),
            )
        })?;

        let out_path = std::env::temp_dir().join(format!("voxroute-{}.wav", Uuid::new_v4()));
        let wpm = words_per_minute(self.rate);
        let amplitude = amplitude(self.volume);
        let voice = self.voice.clone();
        let text = request.text.clone();

        tracing::debug!(
            bin = %espeak.display(),
            voice = %voice,
            wpm,
            amplitude,
            "synthesizing with platform voice engine"
        );

        let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, SpeechError> {
            let mut cmd = Command::new(&espeak);
            if !voice.is_empty() {
                cmd.arg("-v").arg(&voice);
            }
            cmd.arg("-s").arg(wpm.to_string());
            cmd.arg("-a").arg(amplitude.to_string());
            cmd.arg("-w").arg(&out_path);
            cmd.arg(&text);

            let output = cmd.output().map_err(|e| {
                SpeechError::Provider(format!("failed to run platform voice engine: {e}"))
            })?;
            if !output.status.success() {
                return Err(SpeechError::Provider(format!(
                    "platform voice engine failed: {}",
                    String::from_utf8_lossy(&output.stderr)
                )));
            }

            let bytes = std::fs::read(&out_path).map_err(|e| {
                SpeechError::Provider(format!("platform voice engine produced no audio: {e}"))
            })?;
            let _ = std::fs::remove_file(&out_path);
            Ok(bytes)
        })
        .await
        .map_err(|e| SpeechError::Provider(format!("synthesis task failed: {e}")))??;

        Ok(SynthesisOutcome::Clip(AudioClip {
            bytes,
            format: AudioFormat::Wav,
        }))
    }
}

fn words_per_minute(rate: i32) -> i32 {
    rate.clamp(80, 450)
}

/// Volume 0-100 maps onto espeak amplitude 0-200
fn amplitude(volume: i32) -> i32 {
    (volume * 2).clamp(0, 200)
}

fn resolve_binary() -> Option<PathBuf> {
    if let Ok(bin) = std::env::var("ESPEAK_BIN") {
        let path = PathBuf::from(bin);
        if path.exists() {
            return Some(path);
        }
    }
    find_in_path("espeak-ng").or_else(|| find_in_path("espeak"))
}

fn find_in_path(bin: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(bin))
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rate_clamps_to_engine_range() {
        assert_eq!(words_per_minute(175), 175);
        assert_eq!(words_per_minute(10), 80);
        assert_eq!(words_per_minute(9000), 450);
    }

    #[test]
    fn test_volume_maps_to_amplitude() {
        assert_eq!(amplitude(100), 200);
        assert_eq!(amplitude(50), 100);
        assert_eq!(amplitude(0), 0);
        assert_eq!(amplitude(150), 200);
        assert_eq!(amplitude(-5), 0);
    }
}
