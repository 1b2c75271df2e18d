//! Fixed-window segmentation of the source recording.
//!
//! Slices the decoded recording into non-overlapping windows of a fixed
//! length, materializes each window as a WAV file under the run's segment
//! directory, and owns that directory's lifetime through [`SegmentDir`].

use crate::audio::SourceAudio;
use crate::error::{DiascribeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// One fixed-length slice of the source recording.
///
/// `start` and `end` are seconds from the start of the recording; the final
/// window of a run may be shorter than the configured length. Windows are
/// immutable once created and read-only for every downstream consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioWindow {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub path: PathBuf,
}

impl AudioWindow {
    /// Window length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Scoped owner of the per-run segment directory.
///
/// The directory and every window file inside it are removed when the guard
/// drops, on the success path and on any abort path alike. A removal failure
/// is reported to stderr, never escalated. `keep()` defuses the guard.
#[derive(Debug)]
pub struct SegmentDir {
    path: PathBuf,
    armed: bool,
}

impl SegmentDir {
    /// Create the segment directory (and any missing parents).
    pub fn create(path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&path).map_err(|e| DiascribeError::storage(&path, e))?;
        Ok(Self { path, armed: true })
    }

    /// The directory windows are materialized into.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Leave the directory and its window files on disk when dropped.
    pub fn keep(&mut self) {
        self.armed = false;
    }
}

impl Drop for SegmentDir {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            eprintln!(
                "Warning: failed to remove segment directory {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Slice the recording into fixed-length windows and write each as a WAV file.
///
/// Windows cover `[0, duration)` exactly, with no gaps, overlaps, padding, or
/// dropped tail; the count equals `ceil(duration / window_seconds)`. Window
/// files are named `<source-stem>_segment_<index>.wav` and keep the source's
/// sample rate. A zero-length recording yields zero windows.
///
/// # Errors
/// Returns `Storage` if a window file cannot be written.
pub fn segment(
    audio: &SourceAudio,
    source: &Path,
    window_seconds: u32,
    dir: &SegmentDir,
) -> Result<Vec<AudioWindow>> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");

    let sample_rate = audio.sample_rate();
    let samples_per_window = sample_rate as usize * window_seconds as usize;

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut windows = Vec::new();
    for (index, chunk) in audio.samples().chunks(samples_per_window).enumerate() {
        let path = dir
            .path()
            .join(format!("{}_segment_{}.wav", stem, index));

        write_window(&path, spec, chunk)?;

        let start = (index * samples_per_window) as f64 / sample_rate as f64;
        let end = (index * samples_per_window + chunk.len()) as f64 / sample_rate as f64;
        windows.push(AudioWindow {
            index,
            start,
            end,
            path,
        });
    }

    Ok(windows)
}

fn write_window(path: &Path, spec: hound::WavSpec, samples: &[i16]) -> Result<()> {
    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| DiascribeError::storage(path, e))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| DiascribeError::storage(path, e))?;
    }
    writer
        .finalize()
        .map_err(|e| DiascribeError::storage(path, e))
}
