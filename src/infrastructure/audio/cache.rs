use crate::domain::speech::{AudioFormat, SpeechError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;

const INDEX_FILE: &str = "index.json";

/// File-backed store of previously synthesized audio.
///
/// Entries are keyed by a fingerprint of the exact input text; no case or
/// whitespace normalization is applied, so "Hello" and "hello" are
/// distinct entries. Lookups never fail: a broken index or a deleted
/// backing file is just a miss. Writes fail loudly, since silently losing
/// a save-to-disk guarantee would be worse than an error.
pub struct AudioCache {
    dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file: String,
    pub engine: String,
    pub format: AudioFormat,
}

impl AudioCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn fingerprint(text: &str) -> String {
        hex::encode(Sha256::digest(text.as_bytes()))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn load_index(&self) -> HashMap<String, CacheEntry> {
        let raw = match std::fs::read_to_string(self.index_path()) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(index) => index,
            Err(e) => {
                tracing::debug!(error = %e, "cache index unreadable, treating as empty");
                HashMap::new()
            }
        }
    }

    fn write_index(&self, index: &HashMap<String, CacheEntry>) -> Result<(), SpeechError> {
        let raw = serde_json::to_string_pretty(index)
            .map_err(|e| SpeechError::CacheWrite(std::io::Error::other(e)))?;
        // Write-then-rename so a concurrent reader never sees a torn index
        let tmp = self.dir.join(format!("{INDEX_FILE}.tmp"));
        std::fs::write(&tmp, raw).map_err(SpeechError::CacheWrite)?;
        std::fs::rename(&tmp, self.index_path()).map_err(SpeechError::CacheWrite)?;
        Ok(())
    }

    /// Look up a previously stored clip for exactly this text.
    ///
    /// Returns `None` when there is no entry or when the index points at a
    /// file that no longer exists; the stale entry is left for the next
    /// store to overwrite.
    pub fn lookup(&self, text: &str) -> Option<PathBuf> {
        let index = self.load_index();
        let entry = index.get(&Self::fingerprint(text))?;
        let path = self.dir.join(&entry.file);
        if path.is_file() {
            Some(path)
        } else {
            tracing::debug!(
                file = %entry.file,
                "cache index entry is stale, re-synthesizing"
            );
            None
        }
    }

    /// Store a synthesized clip under the text's fingerprint.
    ///
    /// The file name embeds engine and format so clips from different
    /// engines never overwrite each other on disk.
    pub fn store(
        &self,
        text: &str,
        bytes: &[u8],
        engine: &str,
        format: AudioFormat,
    ) -> Result<PathBuf, SpeechError> {
        std::fs::create_dir_all(&self.dir).map_err(SpeechError::CacheWrite)?;

        let fingerprint = Self::fingerprint(text);
        let file = format!("{fingerprint}-{engine}.{}", format.extension());
        let path = self.dir.join(&file);
        std::fs::write(&path, bytes).map_err(SpeechError::CacheWrite)?;

        let mut index = self.load_index();
        index.insert(
            fingerprint,
            CacheEntry {
                file,
                engine: engine.to_string(),
                format,
            },
        );
        self.write_index(&index)?;

        Ok(path)
    }

    /// Remove every cached clip and the index. Returns how many clips
    /// were removed.
    pub fn clear(&self) -> Result<usize, SpeechError> {
        let index = self.load_index();
        let mut removed = 0;
        for entry in index.values() {
            let path = self.dir.join(&entry.file);
            if std::fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        let _ = std::fs::remove_file(self.index_path());
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cache_in_tempdir() -> (tempfile::TempDir, AudioCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = AudioCache::new(dir.path().to_path_buf());
        (dir, cache)
    }

    #[test]
    fn test_store_then_lookup_roundtrip() {
        let (_dir, cache) = cache_in_tempdir();
        let path = cache
            .store("Hello world", b"audio-bytes", "azureTTS", AudioFormat::Wav)
            .unwrap();
        assert!(path.is_file());

        let found = cache.lookup("Hello world").unwrap();
        assert_eq!(found, path);
        assert_eq!(std::fs::read(&found).unwrap(), b"audio-bytes");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let (_dir, cache) = cache_in_tempdir();
        cache
            .store("Hello", b"audio", "gspeak", AudioFormat::Mp3)
            .unwrap();
        assert!(cache.lookup("Hello").is_some());
        assert!(cache.lookup("hello").is_none());
    }

    #[test]
    fn test_lookup_misses_on_unknown_text() {
        let (_dir, cache) = cache_in_tempdir();
        assert!(cache.lookup("never stored").is_none());
    }

    #[test]
    fn test_stale_index_entry_is_a_miss() {
        let (_dir, cache) = cache_in_tempdir();
        let path = cache
            .store("stale", b"audio", "gspeak", AudioFormat::Mp3)
            .unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(cache.lookup("stale").is_none());
    }

    #[test]
    fn test_file_names_do_not_collide_across_engines() {
        let (_dir, cache) = cache_in_tempdir();
        let first = cache
            .store("same text", b"wav-audio", "azureTTS", AudioFormat::Wav)
            .unwrap();
        let second = cache
            .store("same text", b"mp3-audio", "kurdishTTS", AudioFormat::Mp3)
            .unwrap();
        assert_ne!(first, second);
        // Both artifacts stay on disk; the index serves the latest store
        assert!(first.is_file());
        assert_eq!(cache.lookup("same text").unwrap(), second);
    }

    #[test]
    fn test_store_fails_loudly_when_dir_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let file_in_the_way = dir.path().join("blocked");
        std::fs::write(&file_in_the_way, b"not a directory").unwrap();

        let cache = AudioCache::new(file_in_the_way);
        let err = cache
            .store("text", b"audio", "gspeak", AudioFormat::Mp3)
            .unwrap_err();
        assert!(matches!(err, SpeechError::CacheWrite(_)));
    }

    #[test]
    fn test_clear_removes_clips_and_index() {
        let (_dir, cache) = cache_in_tempdir();
        cache
            .store("one", b"audio", "gspeak", AudioFormat::Mp3)
            .unwrap();
        cache
            .store("two", b"audio", "gspeak", AudioFormat::Mp3)
            .unwrap();

        let removed = cache.clear().unwrap();
        assert_eq!(removed, 2);
        assert!(cache.lookup("one").is_none());
        assert!(cache.lookup("two").is_none());
    }

    #[test]
    fn test_corrupt_index_is_treated_as_empty() {
        let (_dir, cache) = cache_in_tempdir();
        std::fs::create_dir_all(cache.dir()).unwrap();
        std::fs::write(cache.dir().join(INDEX_FILE), b"{ not json").unwrap();
        assert!(cache.lookup("anything").is_none());
        // And a store still succeeds, rebuilding the index
        cache
            .store("anything", b"audio", "gspeak", AudioFormat::Mp3)
            .unwrap();
        assert!(cache.lookup("anything").is_some());
    }
}
