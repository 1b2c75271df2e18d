//! diascribe - Speaker-attributed transcription for long recordings
//!
//! Splits a recording into fixed-length windows, runs speaker diarization
//! and speech-to-text once per window, aligns the two result streams into
//! speaker-labeled text, and writes a transcript beside the source file.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod align;
pub mod audio;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diarize;
pub mod error;
pub mod pipeline;
pub mod segment;
pub mod speakers;
pub mod stt;
pub mod transcript;

// Capability traits (window → model output) and their mocks
pub use diarize::{Diarizer, MockDiarizer, SpeakerTurn};
pub use stt::{MockTranscriber, Transcriber, TranscriptSpan};

// Pipeline
pub use pipeline::{RunOptions, run_pipeline};
pub use segment::{AudioWindow, SegmentDir};

// Alignment and labeling
pub use align::{UnifiedRecord, WindowResults, align};
pub use speakers::{LabeledRecord, SpeakerRegistry};

// Error handling
pub use error::{DiascribeError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
