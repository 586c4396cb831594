pub mod cache;
pub mod playback;

pub use cache::{AudioCache, CacheEntry};
pub use playback::{Playback, RodioPlayer};
