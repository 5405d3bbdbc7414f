// Tempo estimator: median inter-onset-interval, octave-normalized into
// [60, 180] BPM.

/// Fastest inter-onset interval considered plausible (300 BPM).
const MAX_PLAUSIBLE_BPM: f64 = 300.0;
const MIN_BPM: f64 = 60.0;
const MAX_BPM: f64 = 180.0;

/// Estimate source-average BPM from sorted kept onset frame indices.
/// Returns 0.0 if there are fewer than two onsets, `fps <= 0`, or every
/// interval is implausibly fast / non-finite.
pub fn estimate_bpm(onset_frames: &[usize], fps: f64) -> f64 {
    if onset_frames.len() <= 1 || fps <= 0.0 {
        return 0.0;
    }

    let min_interval_secs = 60.0 / MAX_PLAUSIBLE_BPM;

    let mut intervals: Vec<f64> = onset_frames
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64 / fps)
        .filter(|&interval| interval.is_finite() && interval >= min_interval_secs)
        .collect();

    if intervals.is_empty() {
        return 0.0;
    }

    intervals.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median = intervals[intervals.len() / 2];

    if median <= 0.0 {
        return 0.0;
    }

    let mut bpm = 60.0 / median;
    while bpm > MAX_BPM {
        bpm *= 0.5;
    }
    while bpm < MIN_BPM {
        bpm *= 2.0;
    }

    if bpm.is_finite() {
        bpm
    } else {
        0.0
    }
}
