use std::path::Path;
use std::sync::Arc;

use crate::assets::media::{self, AudioPcm};
use crate::audio::catalog::Track;
use crate::foundation::error::{ReelError, ReelResult};

/// Gain applied to the voiceover layer.
pub const VOICE_GAIN: f32 = 1.0;
/// Gain applied to the background music layer.
pub const MUSIC_GAIN: f32 = 0.12;

/// What a layer contributes to the mix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerRole {
    /// Narration; the timing authority.
    Voice,
    /// Background music bed.
    Music,
}

/// Decoded audio source with a fixed gain.
///
/// Layers are only built through [`AudioLayer::voice`] and [`AudioLayer::music`], so the gain
/// always matches the role.
#[derive(Clone, Debug)]
pub struct AudioLayer {
    role: LayerRole,
    gain: f32,
    looped: bool,
    pcm: Arc<AudioPcm>,
}

impl AudioLayer {
    /// Voiceover layer at [`VOICE_GAIN`]. Played once; shorter voice is padded with silence.
    pub fn voice(pcm: AudioPcm) -> Self {
        Self {
            role: LayerRole::Voice,
            gain: VOICE_GAIN,
            looped: false,
            pcm: Arc::new(pcm),
        }
    }

    /// Music layer at [`MUSIC_GAIN`]. Repeats from its start until the composition ends.
    pub fn music(pcm: AudioPcm) -> Self {
        Self {
            role: LayerRole::Music,
            gain: MUSIC_GAIN,
            looped: true,
            pcm: Arc::new(pcm),
        }
    }

    /// Layer role.
    pub fn role(&self) -> LayerRole {
        self.role
    }

    /// Linear gain applied while mixing.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Whether the source repeats to fill the composition.
    pub fn looped(&self) -> bool {
        self.looped
    }

    /// Native duration of the decoded source in seconds.
    pub fn duration_sec(&self) -> f64 {
        self.pcm.duration_sec()
    }

    /// Decoded source PCM.
    pub fn pcm(&self) -> &AudioPcm {
        &self.pcm
    }
}

/// Set of layers mixed down to one stream of exactly `total_samples` frames.
#[derive(Clone, Debug)]
pub struct AudioComposition {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Output length in sample frames.
    pub total_samples: u64,
    /// Layers in the mix; order does not affect the result.
    pub layers: Vec<AudioLayer>,
}

impl AudioComposition {
    /// Composite duration in seconds.
    pub fn duration_sec(&self) -> f64 {
        self.total_samples as f64 / f64::from(self.sample_rate)
    }

    /// Layer with `role`, if present.
    pub fn layer(&self, role: LayerRole) -> Option<&AudioLayer> {
        self.layers.iter().find(|l| l.role == role)
    }
}

/// Build the composition for `voice` plus optional `music`, cut to `target_duration` seconds.
///
/// Music longer than the target is truncated; shorter music loops from its start. Empty music is
/// dropped. The composite length is `round(target_duration * sample_rate)` frames whatever the
/// layer lengths are.
pub fn compose(
    voice: AudioLayer,
    music: Option<AudioPcm>,
    target_duration: f64,
) -> ReelResult<AudioComposition> {
    if !(target_duration.is_finite() && target_duration > 0.0) {
        return Err(ReelError::invalid_input(format!(
            "audio target duration must be finite and > 0, got {target_duration}"
        )));
    }
    if voice.role != LayerRole::Voice {
        return Err(ReelError::invalid_input(
            "compose expects a voice layer as its first argument",
        ));
    }

    let sample_rate = voice.pcm.sample_rate;
    check_pcm(&voice.pcm, sample_rate, "voice")?;
    let total_samples = (target_duration * f64::from(sample_rate)).round() as u64;

    let mut layers = vec![voice];
    if let Some(pcm) = music {
        check_pcm(&pcm, sample_rate, "music")?;
        if pcm.frames() == 0 {
            tracing::warn!("music decoded to zero samples, mixing voice only");
        } else {
            let music = AudioLayer::music(pcm);
            tracing::debug!(
                music_sec = music.duration_sec(),
                target_sec = target_duration,
                looping = music.duration_sec() < target_duration,
                "adding music layer"
            );
            layers.push(music);
        }
    }

    Ok(AudioComposition {
        sample_rate,
        channels: media::MIX_CHANNELS,
        total_samples,
        layers,
    })
}

/// Decode `voice_path` (and `music` when present) and build the composition.
///
/// `target_duration` defaults to the decoded voice duration.
pub fn compose_from_files(
    voice_path: &Path,
    music: Option<&Track>,
    target_duration: Option<f64>,
) -> ReelResult<AudioComposition> {
    let voice = decode_voice(voice_path)?;
    let target = target_duration.unwrap_or_else(|| voice.duration_sec());
    compose(voice, decode_music(music, target)?, target)
}

/// Decode the selected music track, if any, at the mix rate.
///
/// Only the first `target_duration` seconds are read; shorter tracks are looped by the mixer.
pub fn decode_music(track: Option<&Track>, target_duration: f64) -> ReelResult<Option<AudioPcm>> {
    track
        .map(|t| {
            media::decode_audio_f32_stereo(
                &t.path,
                media::MIX_SAMPLE_RATE,
                Some(target_duration),
            )
        })
        .transpose()
}

/// Decode a voiceover file into a [`LayerRole::Voice`] layer.
pub fn decode_voice(voice_path: &Path) -> ReelResult<AudioLayer> {
    let pcm = media::decode_audio_f32_stereo(voice_path, media::MIX_SAMPLE_RATE, None)?;
    Ok(AudioLayer::voice(pcm))
}

fn check_pcm(pcm: &AudioPcm, sample_rate: u32, what: &str) -> ReelResult<()> {
    if pcm.sample_rate == 0 || pcm.sample_rate != sample_rate {
        return Err(ReelError::media_decode(format!(
            "{what} sample rate {} does not match mix rate {sample_rate}",
            pcm.sample_rate
        )));
    }
    if !matches!(pcm.channels, 1 | 2) {
        return Err(ReelError::media_decode(format!(
            "{what} has unsupported channel count {}",
            pcm.channels
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/compose.rs"]
mod tests;
