use super::*;
use crate::assets::media::AudioPcm;
use crate::audio::compose::{LayerRole, MUSIC_GAIN, compose};

fn stereo(frames: usize, value: f32) -> AudioPcm {
    AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![value; frames * 2],
    }
}

#[test]
fn short_voice_is_padded_with_silence() {
    let comp = compose(AudioLayer::voice(stereo(2, 0.5)), None, 1.0).unwrap();
    let out = mix_composition(&comp);
    assert_eq!(out.len(), 8);
    assert_eq!(&out[..4], &[0.5, 0.5, 0.5, 0.5]);
    assert_eq!(&out[4..], &[0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn long_voice_is_truncated() {
    let comp = compose(AudioLayer::voice(stereo(40, 0.5)), None, 1.0).unwrap();
    assert_eq!(mix_composition(&comp).len(), 8);
}

#[test]
fn short_music_loops_instead_of_leaving_silence() {
    let music = AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![1.0, 1.0, -1.0, -1.0, 0.5, 0.5],
    };
    let comp = compose(AudioLayer::voice(stereo(8, 0.0)), Some(music), 2.0).unwrap();
    let out = mix_composition(&comp);
    assert_eq!(out.len(), 16);
    let left: Vec<f32> = out.chunks_exact(2).map(|f| f[0]).collect();
    let expected = [1.0f32, -1.0, 0.5, 1.0, -1.0, 0.5, 1.0, -1.0];
    for (got, want) in left.iter().zip(expected) {
        assert!((got - want * MUSIC_GAIN).abs() < 1e-6);
    }
}

#[test]
fn long_music_is_truncated_from_its_start() {
    let mut samples = Vec::new();
    for i in 0..40 {
        samples.push(i as f32 / 100.0);
        samples.push(i as f32 / 100.0);
    }
    let music = AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: samples,
    };
    let comp = compose(AudioLayer::voice(stereo(4, 0.0)), Some(music), 1.0).unwrap();
    let out = mix_composition(&comp);
    assert_eq!(out.len(), 8);
    assert!((out[6] - 0.03 * MUSIC_GAIN).abs() < 1e-6);
}

#[test]
fn voice_and_music_sum_with_their_gains_and_clamp() {
    let comp = compose(
        AudioLayer::voice(stereo(4, 0.5)),
        Some(stereo(4, 1.0)),
        1.0,
    )
    .unwrap();
    assert!(comp.layer(LayerRole::Music).is_some());
    let out = mix_composition(&comp);
    assert!((out[0] - (0.5 + MUSIC_GAIN)).abs() < 1e-6);

    let loud = compose(AudioLayer::voice(stereo(4, 0.99)), Some(stereo(4, 1.0)), 1.0).unwrap();
    assert!(mix_composition(&loud).iter().all(|s| *s <= 1.0));
}

#[test]
fn mono_sources_are_duplicated_to_both_channels() {
    let voice = AudioPcm {
        sample_rate: 4,
        channels: 1,
        interleaved_f32: vec![0.25; 4],
    };
    let comp = AudioComposition {
        sample_rate: 4,
        channels: 2,
        total_samples: 4,
        layers: vec![AudioLayer::voice(voice)],
    };
    assert!(mix_composition(&comp).iter().all(|s| (*s - 0.25).abs() < 1e-6));
}

#[test]
fn f32le_file_has_four_bytes_per_sample() {
    let path = std::env::temp_dir().join(format!(
        "promoreel_mix_{}/mix.f32le",
        std::process::id()
    ));
    write_mix_to_f32le_file(&[0.0, 1.0, -1.0], &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 12);
    assert_eq!(&bytes[4..8], &1.0f32.to_le_bytes());
    let _ = std::fs::remove_file(&path);
}
