//! Default configuration constants for diascribe.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// Default window length in seconds.
///
/// 30 seconds keeps each diarization/transcription call small enough to bound
/// model memory use while leaving enough context for coherent speaker turns.
pub const WINDOW_SECONDS: u32 = 30;

/// Default language code for transcription.
///
/// Transcription runs with a fixed language per run; there is no
/// auto-detection across windows.
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Default beam width for transcription decoding.
pub const DEFAULT_BEAM_SIZE: u32 = 5;

/// Default Whisper model path.
pub const DEFAULT_MODEL: &str = "models/ggml-base.bin";

/// Default diarization helper command.
pub const DEFAULT_DIARIZE_COMMAND: &str = "diarize-turns";

/// Default diarization model identity.
pub const DEFAULT_DIARIZE_MODEL: &str = "speaker-diarization-3.1";

/// Name of the per-run working directory holding window files.
///
/// Created beside the source recording, removed when the run finishes.
pub const SEGMENTS_DIR_NAME: &str = "segments";

/// Name of the transcript artifact, written beside the source recording.
pub const TRANSCRIPT_FILE_NAME: &str = "transcriptions.txt";

/// Sample rate expected by Whisper inference, in Hz.
///
/// Window files keep the source's native rate; audio is resampled to this
/// rate just before inference.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Reserved speaker tag for spans in windows where diarization found no turns.
///
/// Passed through to the transcript unchanged, never numbered.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// Report the GPU backend compiled into this build.
///
/// Returns a human-readable name based on the compile-time feature flags.
/// Only one GPU backend can be active at a time; if none is enabled, returns "CPU".
pub fn gpu_backend() -> &'static str {
    if cfg!(feature = "cuda") {
        "CUDA"
    } else if cfg!(feature = "vulkan") {
        "Vulkan"
    } else if cfg!(feature = "hipblas") {
        "HipBLAS (AMD)"
    } else if cfg!(feature = "openblas") {
        "OpenBLAS"
    } else {
        "CPU"
    }
}
