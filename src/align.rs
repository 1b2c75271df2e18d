//! Time alignment of transcription spans with diarization turns.
//!
//! For every transcribed span, decides which same-window speaker turn owns
//! it. Candidate turns never cross a window boundary: speaker tags are only
//! meaningful within the window whose diarization pass produced them.

use crate::defaults;
use crate::diarize::SpeakerTurn;
use crate::stt::TranscriptSpan;
use std::cmp::Ordering;

/// A transcribed span paired with the speaker turn judged responsible for it.
///
/// `tag` always originates from a turn in the same window as the span, or is
/// the reserved `Unknown` sentinel when the window has no turns at all.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRecord {
    pub window: usize,
    pub start: f64,
    pub end: f64,
    pub tag: String,
    pub text: String,
}

/// Per-window model outputs, in window order.
#[derive(Debug, Clone, Default)]
pub struct WindowResults {
    pub window: usize,
    pub turns: Vec<SpeakerTurn>,
    pub spans: Vec<TranscriptSpan>,
}

/// Pair every span with its owning turn, preserving emission order.
///
/// Records come out in window order, then within-window span order, exactly
/// as the transcription adapter produced them. No span is ever dropped: a
/// span without any overlapping turn falls back to the nearest turn by
/// start-time distance, and a window without turns yields the `Unknown`
/// sentinel tag.
pub fn align(results: &[WindowResults]) -> Vec<UnifiedRecord> {
    let mut records = Vec::new();

    for result in results {
        for span in &result.spans {
            let tag = match owning_turn(&result.turns, span) {
                Some(turn) => turn.tag.clone(),
                None => defaults::UNKNOWN_SPEAKER.to_string(),
            };
            records.push(UnifiedRecord {
                window: result.window,
                start: span.start,
                end: span.end,
                tag,
                text: span.text.clone(),
            });
        }
    }

    records
}

/// Overlap in seconds between a turn's interval and a span's interval.
fn overlap(turn: &SpeakerTurn, span: &TranscriptSpan) -> f64 {
    let start = turn.start.max(span.start);
    let end = turn.end.min(span.end);
    (end - start).max(0.0)
}

/// Select the turn owning a span among same-window candidates.
///
/// Greatest temporal overlap wins; equal overlap breaks to the earlier turn
/// start, then the earlier end, so the choice is independent of candidate
/// ordering. When nothing overlaps, the nearest turn by start-time distance
/// wins (same tie-breaks). Returns `None` only for an empty candidate list.
fn owning_turn<'a>(turns: &'a [SpeakerTurn], span: &TranscriptSpan) -> Option<&'a SpeakerTurn> {
    let best_overlapping = turns
        .iter()
        .map(|turn| (turn, overlap(turn, span)))
        .filter(|(_, o)| *o > 0.0)
        .min_by(|a, b| {
            // Largest overlap first, then earliest start, then earliest end
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| cmp_f64(a.0.start, b.0.start))
                .then_with(|| cmp_f64(a.0.end, b.0.end))
        })
        .map(|(turn, _)| turn);

    best_overlapping.or_else(|| {
        turns
            .iter()
            .min_by(|a, b| {
                cmp_f64((a.start - span.start).abs(), (b.start - span.start).abs())
                    .then_with(|| cmp_f64(a.start, b.start))
                    .then_with(|| cmp_f64(a.end, b.end))
            })
    })
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
