// Channel mixdown: reduces N-channel interleaved PCM to a single mono
// buffer by per-sample arithmetic mean. An average of bounded inputs is
// bounded, so no clipping guard is needed here.

/// Mix interleaved PCM with `channels` channels down to mono.
///
/// `pcm` is assumed interleaved (`[f0c0, f0c1, ..., f1c0, f1c1, ...]`). Any
/// trailing partial frame (fewer than `channels` samples) is dropped.
pub fn to_mono(pcm: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return pcm.to_vec();
    }

    let channels = channels as usize;
    let frame_count = pcm.len() / channels;
    let mut mono = Vec::with_capacity(frame_count);

    for frame_idx in 0..frame_count {
        let base = frame_idx * channels;
        let sum: f32 = pcm[base..base + channels].iter().sum();
        mono.push(sum / channels as f32);
    }

    mono
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_passthrough_is_unchanged() {
        let samples = vec![0.1, -0.2, 0.3, -0.4];
        assert_eq!(to_mono(&samples, 1), samples);
    }

    #[test]
    fn stereo_mixdown_averages_channels() {
        let stereo = vec![1.0, -1.0, 0.5, 0.5];
        let mono = to_mono(&stereo, 2);
        assert_eq!(mono, vec![0.0, 0.5]);
    }

    #[test]
    fn stereo_duplicate_channels_matches_mono_source() {
        let mono_source = vec![0.2, -0.3, 0.9];
        let duplicated: Vec<f32> = mono_source.iter().flat_map(|&s| [s, s]).collect();
        let mixed = to_mono(&duplicated, 2);

        for (a, b) in mixed.iter().zip(mono_source.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn drops_trailing_partial_frame() {
        let samples = vec![1.0, 1.0, 1.0]; // 1.5 frames at channels=2
        assert_eq!(to_mono(&samples, 2), vec![1.0]);
    }
}
