use std::path::Path;

use crate::audio::compose::{AudioComposition, AudioLayer};
use crate::foundation::error::{ReelError, ReelResult};

/// Mix all composition layers into interleaved output PCM of exactly `total_samples` frames.
pub fn mix_composition(comp: &AudioComposition) -> Vec<f32> {
    let frames = comp.total_samples as usize;
    let mut out = vec![0.0f32; frames * usize::from(comp.channels)];

    for layer in &comp.layers {
        mix_layer(&mut out, comp, layer);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn mix_layer(out: &mut [f32], comp: &AudioComposition, layer: &AudioLayer) {
    let pcm = layer.pcm();
    let src = pcm.interleaved_f32.as_slice();
    let src_channels = usize::from(pcm.channels);
    let src_frames = pcm.frames() as usize;
    if src_frames == 0 {
        return;
    }
    let dst_channels = usize::from(comp.channels);
    let gain = layer.gain();

    for dst_frame in 0..comp.total_samples as usize {
        let src_frame = if layer.looped() {
            dst_frame % src_frames
        } else if dst_frame < src_frames {
            dst_frame
        } else {
            break;
        };

        let (l, r) = if src_channels == 1 {
            let v = src[src_frame];
            (v, v)
        } else {
            let i = src_frame * src_channels;
            (src[i], src[i + 1])
        };

        let dst_idx = dst_frame * dst_channels;
        out[dst_idx] += l * gain;
        if dst_channels > 1 {
            out[dst_idx + 1] += r * gain;
        }
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::io(format!(
                "failed to create audio mix output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::io(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
