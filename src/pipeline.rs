//! Speaker-attributed transcription pipeline.
//!
//! Orchestrates the complete flow:
//! segment → diarize → transcribe → align → label → write
//!
//! Stages run sequentially, one window at a time, so only one model works at
//! once and peak memory stays bounded. A model failure on any window aborts
//! the whole run: skipping a window would silently drop a time range from
//! the transcript.

use crate::align::{WindowResults, align};
use crate::audio::SourceAudio;
use crate::defaults;
use crate::diarize::Diarizer;
use crate::error::{DiascribeError, Result};
use crate::segment::{AudioWindow, SegmentDir, segment};
use crate::speakers::SpeakerRegistry;
use crate::stt::Transcriber;
use crate::transcript::write_transcript;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Options controlling a single pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Window length in seconds (must be positive)
    pub window_seconds: u32,
    /// Transcript destination; defaults to `transcriptions.txt` beside the source
    pub output: Option<PathBuf>,
    /// Leave window files on disk after the run
    pub keep_segments: bool,
    /// Suppress status messages and progress bars
    pub quiet: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            window_seconds: defaults::WINDOW_SECONDS,
            output: None,
            keep_segments: false,
            quiet: false,
        }
    }
}

/// Run the full pipeline over one recording.
///
/// The segment directory is created beside the source and removed when the
/// run finishes, on success, on error, and on cancellation alike (unless
/// `keep_segments` is set). The cancel flag is checked between model
/// invocations; a cancelled run aborts with `Cancelled` after cleanup.
///
/// # Returns
/// The path of the written transcript
pub fn run_pipeline(
    source: &Path,
    diarizer: &dyn Diarizer,
    transcriber: &dyn Transcriber,
    options: &RunOptions,
    cancel: &AtomicBool,
) -> Result<PathBuf> {
    // Reject a missing source before any side effect
    if !source.exists() {
        return Err(DiascribeError::SourceMissing {
            path: source.display().to_string(),
        });
    }

    let audio = SourceAudio::load(source)?;
    if !options.quiet {
        eprintln!(
            "Total audio duration: {:.2} seconds.",
            audio.duration_seconds()
        );
    }

    let parent = source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut segment_dir = SegmentDir::create(parent.join(defaults::SEGMENTS_DIR_NAME))?;

    let windows = segment(&audio, source, options.window_seconds, &segment_dir)?;
    if !options.quiet {
        eprintln!(
            "Audio split into {} windows under '{}'.",
            windows.len(),
            segment_dir.path().display()
        );
    }

    let turns = run_stage("Diarizing", &windows, options.quiet, cancel, |w| {
        diarizer.diarize(w)
    })?;
    let spans = run_stage("Transcribing", &windows, options.quiet, cancel, |w| {
        transcriber.transcribe(w)
    })?;

    let results: Vec<WindowResults> = windows
        .iter()
        .zip(turns)
        .zip(spans)
        .map(|((window, turns), spans)| WindowResults {
            window: window.index,
            turns,
            spans,
        })
        .collect();

    let records = align(&results);
    let labeled = SpeakerRegistry::new().normalize(&records);

    let destination = options
        .output
        .clone()
        .unwrap_or_else(|| parent.join(defaults::TRANSCRIPT_FILE_NAME));
    write_transcript(&labeled, &destination)?;

    if !options.quiet {
        eprintln!("Transcript saved to {}", destination.display());
    }
    if options.keep_segments {
        segment_dir.keep();
    } else if !options.quiet {
        eprintln!("Cleaning up window files...");
    }

    Ok(destination)
}

/// Invoke one model capability per window, in window order.
fn run_stage<T>(
    label: &str,
    windows: &[AudioWindow],
    quiet: bool,
    cancel: &AtomicBool,
    mut invoke: impl FnMut(&AudioWindow) -> Result<Vec<T>>,
) -> Result<Vec<Vec<T>>> {
    let bar = if quiet || windows.is_empty() {
        None
    } else {
        let pb = ProgressBar::new(windows.len() as u64);
        pb.set_style(
            // SAFETY: hardcoded template string — always valid
            #[allow(clippy::expect_used)]
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
                .expect("hardcoded progress bar template")
                .progress_chars("#>-"),
        );
        pb.set_message(label.to_string());
        Some(pb)
    };

    let mut outputs = Vec::with_capacity(windows.len());
    for window in windows {
        if cancel.load(Ordering::SeqCst) {
            return Err(DiascribeError::Cancelled);
        }
        outputs.push(invoke(window)?);
        if let Some(pb) = &bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diarize::{MockDiarizer, SpeakerTurn};
    use crate::stt::{MockTranscriber, TranscriptSpan};
    use std::fs;

    /// Write a mono 16-bit WAV of `seconds` seconds at 100 Hz.
    fn write_source(path: &Path, seconds: usize) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..(seconds * 100) {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn quiet_options() -> RunOptions {
        RunOptions {
            quiet: true,
            ..RunOptions::default()
        }
    }

    fn no_cancel() -> AtomicBool {
        AtomicBool::new(false)
    }

    #[test]
    fn sixty_five_second_source_produces_expected_transcript() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("meeting.wav");
        write_source(&source, 65);

        // Three windows: [0,30), [30,60), [60,65). Only the last has content.
        let diarizer =
            MockDiarizer::new().with_turns(2, vec![SpeakerTurn::new(0.0, 3.0, "X")]);
        let transcriber =
            MockTranscriber::new().with_spans(2, vec![TranscriptSpan::new(0.0, 3.0, "hello")]);

        let dest = run_pipeline(
            &source,
            &diarizer,
            &transcriber,
            &quiet_options(),
            &no_cancel(),
        )
        .unwrap();

        assert_eq!(dest, tmp.path().join("transcriptions.txt"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "Speaker 1: hello\n\n");
    }

    #[test]
    fn speakers_are_numbered_in_first_occurrence_order_across_windows() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("meeting.wav");
        write_source(&source, 65);

        let diarizer = MockDiarizer::new()
            .with_turns(
                0,
                vec![
                    SpeakerTurn::new(0.0, 10.0, "SPEAKER_01"),
                    SpeakerTurn::new(10.0, 20.0, "SPEAKER_00"),
                ],
            )
            .with_turns(1, vec![SpeakerTurn::new(0.0, 30.0, "SPEAKER_00")]);
        let transcriber = MockTranscriber::new()
            .with_spans(
                0,
                vec![
                    TranscriptSpan::new(1.0, 5.0, "bonjour"),
                    TranscriptSpan::new(11.0, 15.0, "salut"),
                ],
            )
            .with_spans(1, vec![TranscriptSpan::new(2.0, 6.0, "merci")]);

        let dest = run_pipeline(
            &source,
            &diarizer,
            &transcriber,
            &quiet_options(),
            &no_cancel(),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "Speaker 1: bonjour\n\nSpeaker 2: salut\n\nSpeaker 2: merci\n\n"
        );
    }

    #[test]
    fn missing_source_aborts_before_any_side_effect() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("absent.wav");

        let result = run_pipeline(
            &source,
            &MockDiarizer::new(),
            &MockTranscriber::new(),
            &quiet_options(),
            &no_cancel(),
        );

        assert!(matches!(result, Err(DiascribeError::SourceMissing { .. })));
        assert!(!tmp.path().join("segments").exists());
        assert!(!tmp.path().join("transcriptions.txt").exists());
    }

    #[test]
    fn undecodable_source_is_source_unreadable() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("garbage.wav");
        fs::write(&source, b"definitely not audio").unwrap();

        let result = run_pipeline(
            &source,
            &MockDiarizer::new(),
            &MockTranscriber::new(),
            &quiet_options(),
            &no_cancel(),
        );

        assert!(matches!(
            result,
            Err(DiascribeError::SourceUnreadable { .. })
        ));
    }

    #[test]
    fn empty_source_yields_empty_transcript() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("empty.wav");
        write_source(&source, 0);

        let dest = run_pipeline(
            &source,
            &MockDiarizer::new(),
            &MockTranscriber::new(),
            &quiet_options(),
            &no_cancel(),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "");
        assert!(!tmp.path().join("segments").exists());
    }

    #[test]
    fn window_files_are_removed_after_success() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("meeting.wav");
        write_source(&source, 65);

        run_pipeline(
            &source,
            &MockDiarizer::new(),
            &MockTranscriber::new(),
            &quiet_options(),
            &no_cancel(),
        )
        .unwrap();

        assert!(!tmp.path().join("segments").exists());
    }

    #[test]
    fn window_files_are_removed_after_model_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("meeting.wav");
        write_source(&source, 65);

        let result = run_pipeline(
            &source,
            &MockDiarizer::new().with_failure(),
            &MockTranscriber::new(),
            &quiet_options(),
            &no_cancel(),
        );

        assert!(matches!(
            result,
            Err(DiascribeError::ModelInvocation { .. })
        ));
        assert!(!tmp.path().join("segments").exists());
        assert!(!tmp.path().join("transcriptions.txt").exists());
    }

    #[test]
    fn transcription_failure_also_aborts_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("meeting.wav");
        write_source(&source, 40);

        let result = run_pipeline(
            &source,
            &MockDiarizer::new(),
            &MockTranscriber::new().with_failure(),
            &quiet_options(),
            &no_cancel(),
        );

        assert!(matches!(
            result,
            Err(DiascribeError::ModelInvocation { .. })
        ));
        assert!(!tmp.path().join("segments").exists());
    }

    #[test]
    fn cancellation_aborts_and_cleans_up() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("meeting.wav");
        write_source(&source, 65);

        let cancel = AtomicBool::new(true);
        let result = run_pipeline(
            &source,
            &MockDiarizer::new(),
            &MockTranscriber::new(),
            &quiet_options(),
            &cancel,
        );

        assert!(matches!(result, Err(DiascribeError::Cancelled)));
        assert!(!tmp.path().join("segments").exists());
        assert!(!tmp.path().join("transcriptions.txt").exists());
    }

    #[test]
    fn keep_segments_leaves_window_files_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("meeting.wav");
        write_source(&source, 65);

        let options = RunOptions {
            keep_segments: true,
            quiet: true,
            ..RunOptions::default()
        };
        run_pipeline(
            &source,
            &MockDiarizer::new(),
            &MockTranscriber::new(),
            &options,
            &no_cancel(),
        )
        .unwrap();

        let segments = tmp.path().join("segments");
        assert!(segments.exists());
        assert!(segments.join("meeting_segment_0.wav").exists());
        assert!(segments.join("meeting_segment_2.wav").exists());
    }

    #[test]
    fn output_override_is_honored() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("meeting.wav");
        write_source(&source, 10);

        let dest = tmp.path().join("custom-name.txt");
        let options = RunOptions {
            output: Some(dest.clone()),
            quiet: true,
            ..RunOptions::default()
        };
        let written = run_pipeline(
            &source,
            &MockDiarizer::new(),
            &MockTranscriber::new(),
            &options,
            &no_cancel(),
        )
        .unwrap();

        assert_eq!(written, dest);
        assert!(dest.exists());
        assert!(!tmp.path().join("transcriptions.txt").exists());
    }

    #[test]
    fn spans_without_turns_are_labeled_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("meeting.wav");
        write_source(&source, 10);

        let transcriber = MockTranscriber::new()
            .with_spans(0, vec![TranscriptSpan::new(0.0, 2.0, "who said this")]);

        let dest = run_pipeline(
            &source,
            &MockDiarizer::new(),
            &transcriber,
            &quiet_options(),
            &no_cancel(),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "Unknown: who said this\n\n"
        );
    }
}
