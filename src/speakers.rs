//! Stable speaker labels for a single run.
//!
//! Maps opaque diarization tags ("SPEAKER_00", "spk-3", ...) to
//! human-friendly labels ("Speaker 1", "Speaker 2", ...) in
//! first-seen-first-numbered order. The mapping lives in a registry owned by
//! one pipeline run and is never shared across recordings.
//!
//! Caveat: diarization tags are only trustworthy within a single window, but
//! the registry keys on the raw tag string for the whole run. A speaker can
//! therefore pick up different labels in different windows of a long
//! recording; re-identifying voices across windows is out of scope.

use crate::align::UnifiedRecord;
use crate::defaults;
use std::collections::HashMap;

/// A record ready for the transcript: speaker label substituted for the raw tag.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRecord {
    pub window: usize,
    pub start: f64,
    pub end: f64,
    pub label: String,
    pub text: String,
}

/// Run-scoped mapping from raw speaker tags to numbered labels.
#[derive(Debug)]
pub struct SpeakerRegistry {
    labels: HashMap<String, String>,
    next: usize,
}

impl Default for SpeakerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeakerRegistry {
    pub fn new() -> Self {
        Self {
            labels: HashMap::new(),
            next: 1,
        }
    }

    /// Resolve a raw tag to its label, assigning the next number on first sight.
    ///
    /// The `Unknown` sentinel passes through unchanged and is never numbered.
    pub fn label(&mut self, tag: &str) -> String {
        if tag == defaults::UNKNOWN_SPEAKER {
            return defaults::UNKNOWN_SPEAKER.to_string();
        }
        if let Some(existing) = self.labels.get(tag) {
            return existing.clone();
        }
        let label = format!("Speaker {}", self.next);
        self.next += 1;
        self.labels.insert(tag.to_string(), label.clone());
        label
    }

    /// Substitute labels into a record sequence, preserving order.
    ///
    /// Label assignment is a pure function of first-occurrence order in the
    /// input: running this twice over the same ordered records (with fresh
    /// registries) yields identical labels.
    pub fn normalize(&mut self, records: &[UnifiedRecord]) -> Vec<LabeledRecord> {
        records
            .iter()
            .map(|record| LabeledRecord {
                window: record.window,
                start: record.start,
                end: record.end,
                label: self.label(&record.tag),
                text: record.text.clone(),
            })
            .collect()
    }

    /// Number of distinct speakers labeled so far.
    pub fn speaker_count(&self) -> usize {
        self.labels.len()
    }
}
