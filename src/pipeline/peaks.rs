// Centered adaptive-threshold local-maximum detection with refractory.
// The loop runs over i in [1, F-1), so the first and last frames can never
// be onsets even if they are local maxima: both ends are kept out of the
// candidate range because they don't have a full neighbor on both sides.

/// A raw detected peak, before hysteresis / min-gap post-filtering.
#[derive(Debug, Clone)]
pub struct RawPeak {
    pub frame_index: usize,
    pub descriptor: f32,
    pub threshold_at_detection: f32,
    pub descriptor_normalized: f32,
}

/// Configuration for adaptive peak picking.
#[derive(Debug, Clone)]
pub struct PeakPickerConfig {
    pub half_window: usize,
    pub sensitivity: f32,
    pub refractory_frames: usize,
}

/// Centered adaptive-threshold local-maximum detection over the full
/// descriptor array `d`. Returns an empty vector (not an error) for a flat
/// or empty descriptor.
pub fn pick_peaks(d: &[f32], config: &PeakPickerConfig) -> Vec<RawPeak> {
    if d.len() < 3 {
        return Vec::new();
    }

    let d_min = d.iter().cloned().fold(f32::INFINITY, f32::min);
    let d_max = d.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

    if !(d_max > d_min) {
        // Flat descriptor: not an error, just zero onsets.
        return Vec::new();
    }

    let half_window = config.half_window;
    let mut peaks = Vec::new();
    let mut last_onset_frame: Option<usize> = None;

    for i in 1..d.len() - 1 {
        let lo = i.saturating_sub(half_window);
        let hi = (i + half_window + 1).min(d.len());

        let window_sum: f32 = d[lo..hi].iter().sum();
        let window_count = (hi - lo).saturating_sub(1).max(1);
        let local_mean = (window_sum - d[i]) / window_count as f32;
        let threshold = local_mean * config.sensitivity;

        let is_local_max = d[i] > d[i - 1] && d[i] > d[i + 1];
        let above_threshold = d[i].is_finite() && threshold.is_finite() && d[i] > threshold;
        let refractory_ok = match last_onset_frame {
            Some(last) => i.saturating_sub(last) > config.refractory_frames,
            None => true,
        };

        if is_local_max && above_threshold && refractory_ok {
            last_onset_frame = Some(i);
            peaks.push(RawPeak {
                frame_index: i,
                descriptor: d[i],
                threshold_at_detection: threshold,
                descriptor_normalized: (d[i] - d_min) / (d_max - d_min),
            });
        }
    }

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(half_window: usize, sensitivity: f32, refractory_frames: usize) -> PeakPickerConfig {
        PeakPickerConfig {
            half_window,
            sensitivity,
            refractory_frames,
        }
    }

    #[test]
    fn flat_descriptor_yields_no_peaks() {
        let d = vec![1.0; 50];
        let peaks = pick_peaks(&d, &config(8, 1.2, 3));
        assert!(peaks.is_empty());
    }

    #[test]
    fn single_spike_is_detected() {
        let mut d = vec![0.0; 20];
        d[10] = 5.0;
        let peaks = pick_peaks(&d, &config(8, 1.2, 3));
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].frame_index, 10);
        assert!((peaks[0].descriptor_normalized - 1.0).abs() < 1e-6);
    }

    #[test]
    fn boundary_frames_are_never_onsets() {
        let mut d = vec![0.0; 10];
        d[0] = 10.0;
        d[9] = 10.0;
        let peaks = pick_peaks(&d, &config(8, 1.2, 0));
        assert!(peaks.is_empty());
    }

    #[test]
    fn refractory_suppresses_close_repeats() {
        let mut d = vec![0.0; 30];
        d[10] = 5.0;
        d[12] = 5.0;
        let peaks = pick_peaks(&d, &config(8, 1.2, 3));
        // Second spike is within the refractory window of the first.
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].frame_index, 10);
    }

    #[test]
    fn plateau_samples_are_not_onsets() {
        let mut d = vec![0.0; 20];
        d[10] = 5.0;
        d[11] = 5.0;
        let peaks = pick_peaks(&d, &config(8, 1.2, 0));
        assert!(peaks.is_empty());
    }
}
