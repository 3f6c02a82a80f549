// ============================================================
// Layer 4 — Speech Batcher
// ============================================================
// Converts a padded Batch (ndarray, CPU) into the burn tensors
// the CTC training loop consumes:
//
//   inputs  = [audio, labels, input_lengths, label_lengths]
//   targets = all-zero [B, 1] column
//
// How the conversion works:
//   Every ndarray is already in row-major logical order, so we
//   flatten it into one Vec, build a 1D tensor, and reshape:
//
//   [b0_t0_f0, b0_t0_f1, ..., bB_tT_fF] → [B, T, F, 1]
//
// B is the Burn Backend (e.g. NdArray, Wgpu) — generic so the
// same batcher works on any device.
//
// Why not burn's Batcher trait?
//   A burn DataLoader picks the items of each mini-batch and then
//   calls Batcher::batch on them. Here the BatchSampler already
//   picked them: oversize samples are swapped for replacements
//   before a group is complete, and the group is padded to the
//   configured maxima. There is no Vec of items left to stack,
//   only one finished Batch to move onto the device, so the
//   conversion is a plain method taking &Batch.
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::prelude::*;

use crate::data::sampler::Batch;

// ─── SpeechBatch ──────────────────────────────────────────────────────────────
/// A batch ready for the acoustic model's forward pass.
/// All tensors have the batch size as their first dimension;
/// the last batch of a split may be shorter than the rest.
#[derive(Debug, Clone)]
pub struct SpeechBatch<B: Backend> {
    /// Padded features — shape: [batch, audio_max_len, feature_dim, 1]
    /// Frames past each sample's multiple-of-8 length are zero
    pub audio: Tensor<B, 4>,

    /// Padded label ids — shape: [batch, label_max_len]
    /// Left-aligned, zero after the true length
    pub labels: Tensor<B, 2, Int>,

    /// Downsampled frame counts — shape: [batch, 1]
    /// frames/8 + frames%8, what the CTC loss sees as input length
    pub input_lengths: Tensor<B, 2, Int>,

    /// True label counts — shape: [batch, 1]
    pub label_lengths: Tensor<B, 2, Int>,

    /// Placeholder loss targets — shape: [batch, 1]
    /// Always zero; the loss is computed inside the model graph
    pub targets: Tensor<B, 2>,
}

// ─── SpeechBatcher ────────────────────────────────────────────────────────────
/// Holds the target device so tensors land on the right GPU/CPU.
#[derive(Clone, Debug)]
pub struct SpeechBatcher<B: Backend> {
    /// The device to create tensors on (e.g. GPU index 0)
    pub device: B::Device,
}

impl<B: Backend> SpeechBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Move one padded batch onto the device.
    ///
    /// Steps:
    ///   1. Flatten the 4D audio array and reshape to [B, T, F, 1]
    ///   2. Flatten labels and both length columns into Int tensors
    ///   3. Build the all-zero float target column
    pub fn to_tensors(&self, batch: &Batch) -> SpeechBatch<B> {
        let (b, t, f, c) = batch.audio.dim();
        let label_len    = batch.labels.dim().1;

        // ── Audio ─────────────────────────────────────────────────────────────
        // ndarray iterates in logical row-major order, which is the
        // order reshape expects, even for non-contiguous views
        let audio_flat: Vec<f32> = batch.audio.iter().copied().collect();
        let audio = Tensor::<B, 1>::from_floats(audio_flat.as_slice(), &self.device)
            .reshape([b, t, f, c]);

        // ── Labels and lengths (i32 already, checked by the padder) ──────────
        let labels = self.int_matrix(batch.labels.iter().copied().collect(), [b, label_len]);
        let input_lengths = self.int_matrix(batch.input_lengths.iter().copied().collect(), [b, 1]);
        let label_lengths = self.int_matrix(batch.label_lengths.iter().copied().collect(), [b, 1]);

        // ── Targets ───────────────────────────────────────────────────────────
        let targets_flat: Vec<f32> = batch.targets.iter().copied().collect();
        let targets = Tensor::<B, 1>::from_floats(targets_flat.as_slice(), &self.device)
            .reshape([b, 1]);

        SpeechBatch {
            audio,
            labels,
            input_lengths,
            label_lengths,
            targets,
        }
    }

    /// 1D Int tensor from `flat`, reshaped to `shape`
    fn int_matrix(&self, flat: Vec<i32>, shape: [usize; 2]) -> Tensor<B, 2, Int> {
        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device).reshape(shape)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::padder::{pad_audio, pad_labels};
    use burn::backend::NdArray;
    use ndarray::Array2;

    type TestBackend = NdArray;

    fn batch() -> Batch {
        let audios = vec![
            Array2::from_elem((17, 4), 1.0f32),
            Array2::from_elem((8, 4), 2.0f32),
        ];
        let (audio, input_lengths)  = pad_audio(&audios, 32, 4).unwrap();
        let (labels, label_lengths) = pad_labels(&[vec![3, 1], vec![7, 7, 7]], 6).unwrap();
        Batch {
            audio,
            labels,
            input_lengths,
            label_lengths,
            targets: Array2::zeros((2, 1)),
        }
    }

    #[test]
    fn test_tensor_shapes() {
        let batcher = SpeechBatcher::<TestBackend>::new(Default::default());
        let out = batcher.to_tensors(&batch());

        assert_eq!(out.audio.dims(), [2, 32, 4, 1]);
        assert_eq!(out.labels.dims(), [2, 6]);
        assert_eq!(out.input_lengths.dims(), [2, 1]);
        assert_eq!(out.label_lengths.dims(), [2, 1]);
        assert_eq!(out.targets.dims(), [2, 1]);
    }

    #[test]
    fn test_tensor_values_survive_reshape() {
        let batcher = SpeechBatcher::<TestBackend>::new(Default::default());
        let out = batcher.to_tensors(&batch());

        // 16 kept frames of 1.0 plus 8 frames of 2.0, four features each
        let audio_sum: f64 = out.audio.sum().into_scalar().elem::<f64>();
        assert_eq!(audio_sum, (16.0 * 4.0) + (8.0 * 2.0 * 4.0));

        let label_sum: i64 = out.labels.sum().into_scalar().elem::<i64>();
        assert_eq!(label_sum, 3 + 1 + 7 * 3);

        let input_len_sum: i64 = out.input_lengths.sum().into_scalar().elem::<i64>();
        assert_eq!(input_len_sum, 3 + 1);

        let target_sum: f64 = out.targets.sum().into_scalar().elem::<f64>();
        assert_eq!(target_sum, 0.0);
    }
}
