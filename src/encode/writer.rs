use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::audio::compose::AudioComposition;
use crate::audio::mix::{mix_composition, write_mix_to_f32le_file};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::VisualTimeline;

/// Container written by [`write`].
pub const CONTAINER: &str = "mp4";
/// Video codec written by [`write`].
pub const VIDEO_CODEC: &str = "h264";
/// Audio codec written by [`write`].
pub const AUDIO_CODEC: &str = "aac";

/// A finished video file.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutput {
    /// Absolute path of the written file.
    pub path: PathBuf,
    /// Container format.
    pub container: &'static str,
    /// Video codec.
    pub video_codec: &'static str,
    /// Audio codec.
    pub audio_codec: &'static str,
    /// Video frame rate.
    pub fps: Fps,
    /// Output duration in seconds; equals the audio composition duration.
    pub duration_sec: f64,
    /// Video frames pushed to the encoder.
    pub frames: u64,
}

/// Encode `timeline` with the mixed `composition` into an MP4 at `destination`.
///
/// ffmpeg writes a sibling `<name>.partial` which is renamed onto `destination` only after the
/// encoder exits successfully. On any error the partial file is removed.
#[tracing::instrument(skip(timeline, composition, destination), fields(dest = %destination.display()))]
pub fn write(
    timeline: &mut dyn VisualTimeline,
    composition: &AudioComposition,
    destination: &Path,
    overwrite: bool,
) -> ReelResult<RenderOutput> {
    let destination = std::path::absolute(destination).map_err(|e| {
        ReelError::io(format!(
            "failed to resolve output path '{}': {e}",
            destination.display()
        ))
    })?;
    if !overwrite && destination.exists() {
        return Err(ReelError::io(format!(
            "output file '{}' already exists",
            destination.display()
        )));
    }
    if !is_ffmpeg_on_path() {
        return Err(ReelError::io(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    let audio_path = temp_mix_path();
    let _audio_tmp = TempFileGuard(Some(audio_path.clone()));
    let mixed = mix_composition(composition);
    write_mix_to_f32le_file(&mixed, &audio_path)?;
    drop(mixed);

    let partial = partial_path(&destination);
    let mut partial_guard = TempFileGuard(Some(partial.clone()));

    let duration_sec = composition.duration_sec();
    let mut sink =
        FfmpegSink::new(FfmpegSinkOpts::new(&partial).with_max_duration(duration_sec));
    let canvas = timeline.canvas();
    let fps = timeline.fps();
    let frames = timeline.frame_count();

    tracing::info!(
        width = canvas.width,
        height = canvas.height,
        frames,
        duration_sec,
        "encoding"
    );

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps,
        audio: Some(AudioInputConfig {
            path: audio_path.clone(),
            sample_rate: composition.sample_rate,
            channels: composition.channels,
        }),
    })?;
    timeline.render_into(&mut sink)?;
    sink.end()?;
    drop(sink);

    if overwrite && destination.exists() {
        std::fs::remove_file(&destination).map_err(|e| {
            ReelError::io(format!(
                "failed to replace existing output '{}': {e}",
                destination.display()
            ))
        })?;
    }
    std::fs::rename(&partial, &destination).map_err(|e| {
        ReelError::io(format!(
            "failed to move '{}' to '{}': {e}",
            partial.display(),
            destination.display()
        ))
    })?;
    partial_guard.disarm();

    Ok(RenderOutput {
        path: destination,
        container: CONTAINER,
        video_codec: VIDEO_CODEC,
        audio_codec: AUDIO_CODEC,
        fps,
        duration_sec,
        frames,
    })
}

/// Sibling path ffmpeg writes to before the final rename: `clip.mp4` -> `clip.mp4.partial`.
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".partial");
    destination.with_file_name(name)
}

fn temp_mix_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "promoreel_audio_mix_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

/// Removes the held path on drop unless disarmed.
struct TempFileGuard(Option<PathBuf>);

impl TempFileGuard {
    fn disarm(&mut self) {
        self.0 = None;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/writer.rs"]
mod tests;
