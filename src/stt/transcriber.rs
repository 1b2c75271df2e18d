use crate::error::{DiascribeError, Result};
use crate::segment::AudioWindow;
use std::collections::HashMap;

/// One transcription claim: certain text was spoken over a time interval.
///
/// Times are in seconds relative to the window's start.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSpan {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TranscriptSpan {
    pub fn new(start: f64, end: f64, text: &str) -> Self {
        Self {
            start,
            end,
            text: text.to_string(),
        }
    }
}

/// Trait for speech-to-text transcription over one window.
///
/// This trait allows swapping implementations (real Whisper vs mock).
pub trait Transcriber: Send + Sync {
    /// Produce the timed text spans for one window, in the model's emission order.
    ///
    /// Invoked exactly once per window, in window order. Timestamps are
    /// window-relative and pass through unscaled.
    fn transcribe(&self, window: &AudioWindow) -> Result<Vec<TranscriptSpan>>;

    /// Get the name of the loaded model
    fn model_name(&self) -> &str;
}

/// Mock transcriber for testing
#[derive(Debug, Clone, Default)]
pub struct MockTranscriber {
    spans: HashMap<usize, Vec<TranscriptSpan>>,
    should_fail: bool,
}

impl MockTranscriber {
    /// Create a new mock transcriber that returns no spans for any window
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the spans returned for a specific window index
    pub fn with_spans(mut self, window: usize, spans: Vec<TranscriptSpan>) -> Self {
        self.spans.insert(window, spans);
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&self, window: &AudioWindow) -> Result<Vec<TranscriptSpan>> {
        if self.should_fail {
            return Err(DiascribeError::ModelInvocation {
                stage: "transcription".to_string(),
                window: window.index,
                message: "mock transcription failure".to_string(),
            });
        }
        Ok(self.spans.get(&window.index).cloned().unwrap_or_default())
    }

    fn model_name(&self) -> &str {
        "mock-transcriber"
    }
}
