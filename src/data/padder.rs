// ============================================================
// Layer 4 — Sequence Padder
// ============================================================
// Two stateless routines that turn ragged samples into the
// fixed shapes the acoustic model expects.
//
// Audio: [t_i, feature_dim] arrays  →  [B, max_len, feature_dim, 1]
//
//   Each sample is cut down to a whole number of 8-frame blocks
//   (the model downsamples time by 8) and copied in at offset 0.
//   The recorded input length is t/8 + t%8. The model's CTC
//   loss was trained with exactly this value, so it is not
//   ceil(t/8) and not the truncated length.
//
//     t = 17 → rows 0..16 copied, length 2 + 1 = 3
//     t = 33 → rows 0..32 copied, length 4 + 1 = 5
//
// Labels: [l_i] id sequences  →  [B, max_len], lengths = l_i
//
// Padding value is 0 in both cases.

use ndarray::{s, Array2, Array4, ArrayView1};

use crate::domain::error::{DataError, Result};

/// Time downsampling factor of the downstream model
pub const TIME_DOWNSAMPLE: usize = 8;

/// Input length reported for a sample of `true_len` frames.
pub fn encoded_length(true_len: usize) -> usize {
    true_len / TIME_DOWNSAMPLE + true_len % TIME_DOWNSAMPLE
}

/// Pad audio feature matrices into `[B, max_len, feature_dim, 1]` plus a `[B, 1]` length column.
pub fn pad_audio(
    samples:     &[Array2<f32>],
    max_len:     usize,
    feature_dim: usize,
) -> Result<(Array4<f32>, Array2<i32>)> {
    let mut tensor  = Array4::<f32>::zeros((samples.len(), max_len, feature_dim, 1));
    let mut lengths = Array2::<i32>::zeros((samples.len(), 1));

    for (i, sample) in samples.iter().enumerate() {
        let (frames, dim) = sample.dim();
        if frames > max_len {
            return Err(DataError::Shape(format!(
                "audio sample {i} has {frames} frames, more than max_len {max_len}"
            )));
        }
        if dim != feature_dim {
            return Err(DataError::Shape(format!(
                "audio sample {i} has {dim} features, expected {feature_dim}"
            )));
        }

        let kept = frames / TIME_DOWNSAMPLE * TIME_DOWNSAMPLE;
        tensor
            .slice_mut(s![i, ..kept, .., 0])
            .assign(&sample.slice(s![..kept, ..]));
        lengths[[i, 0]] = encoded_length(frames) as i32;
    }

    Ok((tensor, lengths))
}

/// Pad label id sequences into `[B, max_len]` plus a `[B, 1]` true-length column.
pub fn pad_labels(sequences: &[Vec<u32>], max_len: usize) -> Result<(Array2<i32>, Array2<i32>)> {
    let mut matrix  = Array2::<i32>::zeros((sequences.len(), max_len));
    let mut lengths = Array2::<i32>::zeros((sequences.len(), 1));

    for (i, seq) in sequences.iter().enumerate() {
        if seq.len() > max_len {
            return Err(DataError::Shape(format!(
                "label sequence {i} has {} tokens, more than max_len {max_len}",
                seq.len()
            )));
        }

        let ids = seq
            .iter()
            .map(|&id| {
                i32::try_from(id)
                    .map_err(|_| DataError::Shape(format!("label id {id} in sequence {i} exceeds i32")))
            })
            .collect::<Result<Vec<i32>>>()?;
        matrix
            .slice_mut(s![i, ..seq.len()])
            .assign(&ArrayView1::from(ids.as_slice()));
        lengths[[i, 0]] = seq.len() as i32;
    }

    Ok((matrix, lengths))
}
