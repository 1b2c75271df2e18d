//! Audio decoding for the source recording.

pub mod wav;

pub use wav::SourceAudio;
