use crate::error::{DiascribeError, Result};
use crate::segment::AudioWindow;
use std::collections::HashMap;

/// One diarization claim: a single speaker was active over a time interval.
///
/// Times are in seconds relative to the window's start. The tag is the
/// model's opaque speaker identifier and is only meaningful within the
/// window it came from; the same tag in two different windows may refer to
/// two different people.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerTurn {
    pub start: f64,
    pub end: f64,
    pub tag: String,
}

impl SpeakerTurn {
    pub fn new(start: f64, end: f64, tag: &str) -> Self {
        Self {
            start,
            end,
            tag: tag.to_string(),
        }
    }
}

/// Trait for speaker diarization over one window.
///
/// This trait allows swapping implementations (real model vs mock).
pub trait Diarizer: Send + Sync {
    /// Produce the speaker turns for one window, in the model's emission order.
    ///
    /// Invoked exactly once per window, in window order. Timestamps are
    /// window-relative and pass through unscaled.
    fn diarize(&self, window: &AudioWindow) -> Result<Vec<SpeakerTurn>>;

    /// Get the name of the configured diarization model
    fn model_name(&self) -> &str;
}

/// Mock diarizer for testing
#[derive(Debug, Clone, Default)]
pub struct MockDiarizer {
    turns: HashMap<usize, Vec<SpeakerTurn>>,
    should_fail: bool,
}

impl MockDiarizer {
    /// Create a new mock diarizer that returns no turns for any window
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the turns returned for a specific window index
    pub fn with_turns(mut self, window: usize, turns: Vec<SpeakerTurn>) -> Self {
        self.turns.insert(window, turns);
        self
    }

    /// Configure the mock to fail on diarize
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Diarizer for MockDiarizer {
    fn diarize(&self, window: &AudioWindow) -> Result<Vec<SpeakerTurn>> {
        if self.should_fail {
            return Err(DiascribeError::ModelInvocation {
                stage: "diarization".to_string(),
                window: window.index,
                message: "mock diarization failure".to_string(),
            });
        }
        Ok(self.turns.get(&window.index).cloned().unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        "mock-diarizer"
    }
}
