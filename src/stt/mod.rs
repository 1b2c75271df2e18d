//! Speech-to-text: what was said, per window.

pub mod transcriber;
pub mod whisper;

pub use transcriber::{MockTranscriber, Transcriber, TranscriptSpan};
pub use whisper::{WhisperConfig, WhisperTranscriber};
