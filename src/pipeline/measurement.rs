// Frame measurement: RMS of the exact (non-padded) hop slice, and dB
// loudness with a -140 dB floor for near-silence.

/// dB floor used in lieu of -infinity for silent/near-silent frames.
pub const LOUDNESS_FLOOR_DB: f32 = -140.0;

/// `rms = sqrt(mean(samples^2))`.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|&s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// `20 * log10(rms)` if `rms > 1e-7`, else the dB floor.
pub fn loudness_db(rms: f32) -> f32 {
    if rms > 1e-7 {
        20.0 * rms.log10()
    } else {
        LOUDNESS_FLOOR_DB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_is_zero_rms_and_floored_loudness() {
        let samples = vec![0.0; 64];
        let r = rms(&samples);
        assert_eq!(r, 0.0);
        assert_eq!(loudness_db(r), LOUDNESS_FLOOR_DB);
    }

    #[test]
    fn full_scale_sine_is_near_zero_db() {
        let samples: Vec<f32> = (0..100)
            .map(|i| (i as f32 * 0.3).sin())
            .collect();
        let r = rms(&samples);
        assert!(r > 0.0);
        assert!(loudness_db(r).is_finite());
    }

    #[test]
    fn empty_slice_is_silent() {
        assert_eq!(rms(&[]), 0.0);
    }
}
