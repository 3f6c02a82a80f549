// ============================================================
// Layer 6 — Spectrogram Feature Extractor
// ============================================================
// Reference FeatureExtractor: log-magnitude spectrogram frames
// of a 16 kHz PCM WAV file.
//
//   samples ──frame(400, hop 160)──▶ × Hamming ──FFT──▶ ln(|X|+1)
//
// Each output row is one 10 ms hop; each column one FFT bin,
// keeping the lowest `feature_dim` bins (200 by default,
// i.e. 0–8 kHz at 16 kHz sampling).
//
// Multi-channel files use the first channel only.
//
// Reference: hound / realfft crate documentation

use std::{f32::consts::PI, path::Path};

use hound::{SampleFormat, WavReader};
use ndarray::Array2;
use realfft::{FftError, RealFftPlanner};

use crate::domain::error::{DataError, Result};
use crate::domain::traits::FeatureExtractor;

pub const DEFAULT_WINDOW: usize = 400;
pub const DEFAULT_HOP:    usize = 160;

#[derive(Debug, Clone)]
pub struct SpectrogramExtractor {
    window:      usize,
    hop:         usize,
    feature_dim: usize,
}

impl SpectrogramExtractor {
    /// 400-sample window, 160-sample hop
    pub fn new(feature_dim: usize) -> Result<Self> {
        Self::with_framing(feature_dim, DEFAULT_WINDOW, DEFAULT_HOP)
    }

    pub fn with_framing(feature_dim: usize, window: usize, hop: usize) -> Result<Self> {
        if window == 0 || hop == 0 {
            return Err(DataError::Config("window and hop must be greater than zero".into()));
        }
        let bins = window / 2 + 1;
        if feature_dim == 0 || feature_dim > bins {
            return Err(DataError::Config(format!(
                "feature_dim {feature_dim} must be in 1..={bins} for a {window}-sample window"
            )));
        }
        Ok(Self { window, hop, feature_dim })
    }

    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    /// Number of frames produced for `n` samples
    pub fn frame_count(&self, n: usize) -> usize {
        if n < self.window {
            0
        } else {
            (n - self.window) / self.hop + 1
        }
    }

    /// Spectrogram of an in-memory signal
    pub fn spectrogram(&self, signal: &[f32]) -> std::result::Result<Array2<f32>, FftError> {
        let frames = self.frame_count(signal.len());
        let mut features = Array2::<f32>::zeros((frames, self.feature_dim));

        let window = hamming(self.window);
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(self.window);
        let mut input   = fft.make_input_vec();
        let mut output  = fft.make_output_vec();
        let mut scratch = fft.make_scratch_vec();

        for frame in 0..frames {
            let start = frame * self.hop;
            for (i, slot) in input.iter_mut().enumerate() {
                *slot = signal[start + i] * window[i];
            }

            fft.process_with_scratch(&mut input, &mut output, &mut scratch)?;

            for (k, bin) in output.iter().take(self.feature_dim).enumerate() {
                features[[frame, k]] = (bin.norm() + 1.0).ln();
            }
        }

        Ok(features)
    }
}

impl FeatureExtractor for SpectrogramExtractor {
    fn extract(&self, path: &Path) -> Result<Array2<f32>> {
        let signal = read_first_channel(path)?;
        // FFT failures are reported against the file
        self.spectrogram(&signal).map_err(|e| DataError::Feature {
            path:   path.to_path_buf(),
            reason: format!("FFT failed: {e}"),
        })
    }
}

fn hamming(len: usize) -> Vec<f32> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|i| 0.54 - 0.46 * ((2.0 * PI * i as f32) / (len as f32 - 1.0)).cos())
        .collect()
}

/// Read channel 0 of a WAV as raw sample values (integer PCM is not rescaled).
fn read_first_channel(path: &Path) -> Result<Vec<f32>> {
    let feature_err = |reason: String| DataError::Feature {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = WavReader::open(path).map_err(|e| feature_err(e.to_string()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(channels)
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| feature_err(e.to_string()))?,
        SampleFormat::Int => reader
            .samples::<i32>()
            .step_by(channels)
            .map(|s| s.map(|v| v as f32))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| feature_err(e.to_string()))?,
    };

    Ok(samples)
}
