//! WAV decoding for the source recording.

use crate::error::{DiascribeError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A fully decoded source recording: mono 16-bit PCM at its native sample rate.
///
/// Multi-channel input is downmixed to mono; the sample rate is preserved so
/// window files keep the source's timing exactly.
pub struct SourceAudio {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl SourceAudio {
    /// Decode a WAV file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| DiascribeError::SourceUnreadable {
            message: format!("Failed to open {}: {}", path.display(), e),
        })?;
        Self::from_reader(Box::new(BufReader::new(file)))
    }

    /// Decode WAV data from any reader (for testing/flexibility).
    pub fn from_reader(reader: Box<dyn Read + Send>) -> Result<Self> {
        let mut wav_reader =
            hound::WavReader::new(reader).map_err(|e| DiascribeError::SourceUnreadable {
                message: format!("Failed to parse WAV file: {}", e),
            })?;

        let spec = wav_reader.spec();
        let sample_rate = spec.sample_rate;
        let channels = spec.channels as usize;

        if sample_rate == 0 || channels == 0 {
            return Err(DiascribeError::SourceUnreadable {
                message: format!(
                    "Invalid WAV format: {} channels at {} Hz",
                    channels, sample_rate
                ),
            });
        }

        let raw_samples: Vec<i16> = wav_reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| DiascribeError::SourceUnreadable {
                message: format!("Failed to read WAV samples: {}", e),
            })?;

        // Downmix to mono by averaging across channels
        let samples = if channels > 1 {
            raw_samples
                .chunks_exact(channels)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                    (sum / channels as i32) as i16
                })
                .collect()
        } else {
            raw_samples
        };

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// The decoded mono samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Native sample rate of the recording in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total duration of the recording in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// True when the recording contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Simple linear interpolation resampling.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}
