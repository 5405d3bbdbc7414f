// Novelty function: half-wave-rectified log-magnitude flux, weighted by a
// linear high-frequency ramp and summed to a scalar descriptor per frame.

/// Tracks `prev_log_mag` across frames and folds each new spectrum into a
/// single spectral-flux descriptor value.
pub struct NoveltyTracker {
    prev_log_mag: Vec<f32>,
    hf_ramp: Vec<f32>,
    diff: Vec<f32>,
}

impl NoveltyTracker {
    pub fn new(bins: usize) -> Self {
        let hf_ramp = if bins <= 1 {
            vec![0.0; bins]
        } else {
            (0..bins).map(|k| k as f32 / bins as f32).collect()
        };

        NoveltyTracker {
            prev_log_mag: vec![0.0; bins],
            hf_ramp,
            diff: vec![0.0; bins],
        }
    }

    /// Fold `log_mag` into the descriptor for this frame, then store it as
    /// `prev_log_mag` for the next call.
    pub fn push(&mut self, log_mag: &[f32]) -> f32 {
        debug_assert_eq!(log_mag.len(), self.prev_log_mag.len());

        let mut descriptor = 0.0f32;
        for (((diff, &curr), &prev), &hf) in self
            .diff
            .iter_mut()
            .zip(log_mag)
            .zip(&self.prev_log_mag)
            .zip(&self.hf_ramp)
        {
            let rectified = (curr - prev).max(0.0);
            *diff = rectified * hf;
            descriptor += *diff;
        }

        self.prev_log_mag.copy_from_slice(log_mag);
        descriptor
    }
}
