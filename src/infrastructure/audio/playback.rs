use crate::domain::speech::AudioClip;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

/// Playback collaborator for the dispatcher.
///
/// Fire-and-forget: playback failures are logged and never propagated, a
/// missing sound card must not turn a successful synthesis into an error.
pub trait Playback: Send + Sync {
    fn play_clip(&self, clip: &AudioClip);
    fn play_file(&self, path: &Path);
}

/// Plays clips on the default output device. Blocks the calling thread
/// until the clip has finished.
pub struct RodioPlayer;

impl Playback for RodioPlayer {
    fn play_clip(&self, clip: &AudioClip) {
        if let Err(e) = play_cursor(Cursor::new(clip.bytes.clone())) {
            tracing::warn!(error = %e, format = %clip.format, "audio playback failed");
        }
    }

    fn play_file(&self, path: &Path) {
        let result = File::open(path)
            .map_err(anyhow::Error::from)
            .and_then(|file| play_cursor(BufReader::new(file)));
        if let Err(e) = result {
            tracing::warn!(error = %e, path = %path.display(), "audio playback failed");
        }
    }
}

fn play_cursor<R>(reader: R) -> anyhow::Result<()>
where
    R: std::io::Read + std::io::Seek + Send + Sync + 'static,
{
    let stream = rodio::OutputStreamBuilder::open_default_stream()?;
    let sink = rodio::Sink::connect_new(stream.mixer());
    let source = rodio::Decoder::new(reader)?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
