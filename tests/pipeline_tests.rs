// Integration tests exercising the published API end to end against
// synthetic PCM, mirroring the seed scenarios the pipeline was built to
// satisfy: silence, a single click, a steady train, an overly fast train,
// closely doubled hits, and stereo/mono equivalence.

use onset_core::{process, PipelineConfig};

const SAMPLE_RATE: u32 = 48_000;

fn silence(seconds: f64) -> Vec<f32> {
    vec![0.0f32; (SAMPLE_RATE as f64 * seconds) as usize]
}

fn click_train(seconds: f64, spacing_samples: usize) -> Vec<f32> {
    let mut pcm = silence(seconds);
    let mut i = 0;
    while i < pcm.len() {
        pcm[i] = 1.0;
        i += spacing_samples;
    }
    pcm
}

#[test]
fn silence_yields_no_onsets_and_floor_loudness() {
    let pcm = silence(2.0);
    let source = process(&pcm, SAMPLE_RATE, 1, 60.0, &PipelineConfig::default()).unwrap();

    assert_eq!(source.frames.len(), 120);
    assert_eq!(source.onset_count(), 0);
    assert_eq!(source.average_bpm, 0.0);
    assert!(source.frames.iter().all(|f| f.rms == 0.0));
    assert_eq!(source.average_loudness_db, -140.0);
}

#[test]
fn single_click_produces_exactly_one_onset() {
    let mut pcm = silence(1.0);
    pcm[24_000] = 1.0;

    let source = process(&pcm, SAMPLE_RATE, 1, 60.0, &PipelineConfig::default()).unwrap();

    assert_eq!(source.onset_count(), 1);
    let onset = source.onsets().next().unwrap();
    assert!((onset.frame_index as i64 - 30).abs() <= 1);
    assert!((onset.descriptor_normalized - 1.0).abs() < 1e-6);
    assert_eq!(source.average_bpm, 0.0);
}

#[test]
fn steady_train_is_detected_with_consistent_spacing() {
    // fps=100, half-second spacing -> 50-frame gaps, well above refractory.
    let pcm = click_train(4.0, SAMPLE_RATE as usize / 2);
    let mut config = PipelineConfig::default();
    config.refractory_seconds = 0.1;

    let source = process(&pcm, SAMPLE_RATE, 1, 100.0, &config).unwrap();

    assert!(source.onset_count() >= 6);
    let onsets: Vec<_> = source.onsets().collect();
    for pair in onsets.windows(2) {
        let gap = pair[1].frame_index - pair[0].frame_index;
        assert!((gap as i64 - 50).abs() <= 2);
    }
    if source.average_bpm > 0.0 {
        assert!((source.average_bpm - 120.0).abs() < 5.0);
    }
}

#[test]
fn too_fast_train_is_normalized_into_plausible_bpm_range() {
    // Clicks every 0.15s: faster than any reasonable refractory/threshold
    // combination can fully resolve one-to-one, but whatever survives must
    // land the source-average tempo back in [60, 180].
    let pcm = click_train(4.0, (SAMPLE_RATE as f64 * 0.15) as usize);
    let source = process(&pcm, SAMPLE_RATE, 1, 100.0, &PipelineConfig::default()).unwrap();

    if source.average_bpm > 0.0 {
        assert!(source.average_bpm >= 60.0 && source.average_bpm <= 180.0);
    }
}

#[test]
fn closely_doubled_hits_are_deduplicated_by_min_gap() {
    let mut pcm = silence(1.0);
    // Two impulses one frame apart at fps=60 (hop=800 samples).
    pcm[10_000] = 1.0;
    pcm[10_000 + 800] = 1.0;

    let mut config = PipelineConfig::default();
    config.apply_min_hit_gap = true;
    config.min_hit_gap_frames = 2;
    config.refractory_seconds = 0.0;

    let source = process(&pcm, SAMPLE_RATE, 1, 60.0, &config).unwrap();
    assert!(source.onset_count() <= 1);
}

#[test]
fn stereo_mixdown_matches_mono_source() {
    let mono_pcm = click_train(2.0, SAMPLE_RATE as usize / 2);
    let stereo_pcm: Vec<f32> = mono_pcm.iter().flat_map(|&s| [s, s]).collect();

    let mono_source = process(&mono_pcm, SAMPLE_RATE, 1, 60.0, &PipelineConfig::default()).unwrap();
    let stereo_source =
        process(&stereo_pcm, SAMPLE_RATE, 2, 60.0, &PipelineConfig::default()).unwrap();

    assert_eq!(mono_source.onset_count(), stereo_source.onset_count());
    assert_eq!(mono_source.frames.len(), stereo_source.frames.len());
    for (a, b) in mono_source.frames.iter().zip(stereo_source.frames.iter()) {
        assert!((a.rms - b.rms).abs() < 1e-5);
    }
}

#[test]
fn empty_pcm_is_not_an_error() {
    let source = process(&[], SAMPLE_RATE, 1, 60.0, &PipelineConfig::default()).unwrap();
    assert_eq!(source.frames.len(), 0);
    assert_eq!(source.onset_count(), 0);
}
