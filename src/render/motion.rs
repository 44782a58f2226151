use std::path::PathBuf;

use rand::Rng;

use crate::assets::media::{VideoFrameStream, VideoSourceInfo, probe_video};
use crate::audio::catalog::{Track, list_tracks};
use crate::audio::compose::{AudioComposition, compose, decode_music, decode_voice};
use crate::audio::select::{MusicChoice, select};
use crate::config::EngineConfig;
use crate::encode::sink::FrameSink;
use crate::encode::writer::{self, RenderOutput};
use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::{FrameRGBA, VisualTimeline};
use crate::timeline::looping::LoopPlan;
use crate::timeline::plan::OUTPUT_FPS;

/// Inputs for looping a pre-generated motion clip under a voiceover.
#[derive(Clone, Debug)]
pub struct MotionRequest {
    /// Voiceover audio; its duration is the video duration.
    pub voice_path: PathBuf,
    /// Base clip, repeated or trimmed to fit. Its own audio is discarded.
    pub clip_path: PathBuf,
    /// Background music choice.
    pub music: MusicChoice,
    /// Output file name under the configured output directory.
    pub output_name: String,
}

/// Base clip repeated `loop_count` times and cut at the target duration.
///
/// Each repeat streams from its own `ffmpeg` decoder, dropped before the next repeat opens.
pub struct MotionTimeline {
    clip: VideoSourceInfo,
    canvas: Canvas,
    fps: Fps,
    plan: LoopPlan,
    frame_count: u64,
}

impl MotionTimeline {
    /// Plan repeats of `clip` covering `target` seconds.
    pub fn new(clip: VideoSourceInfo, target: f64) -> ReelResult<Self> {
        let plan = LoopPlan::new(clip.duration_sec, target)?;
        let fps = Fps::new(OUTPUT_FPS, 1)?;
        let frame_count = fps.secs_to_frames_round(target).max(1);
        Ok(Self {
            canvas: Canvas::even(clip.width, clip.height),
            clip,
            fps,
            plan,
            frame_count,
        })
    }

    /// Repeat plan for the clip.
    pub fn loop_plan(&self) -> &LoopPlan {
        &self.plan
    }

    /// Repeat index each output frame is taken from.
    pub fn repeat_of(&self, f: FrameIndex) -> u32 {
        self.plan.locate(self.fps.frames_to_secs(f.0)).0
    }
}

impl VisualTimeline for MotionTimeline {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fps(&self) -> Fps {
        self.fps
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn render_into(&mut self, sink: &mut dyn FrameSink) -> ReelResult<()> {
        let mut stream: Option<(u32, VideoFrameStream)> = None;
        let mut frame = FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: Vec::new(),
            premultiplied: true,
        };
        let mut scratch = Vec::new();
        let mut have_frame = false;

        for f in 0..self.frame_count {
            let repeat = self.repeat_of(FrameIndex(f));
            if stream.as_ref().is_none_or(|(r, _)| *r != repeat) {
                // Close the previous decoder before spawning the next one.
                drop(stream.take());
                tracing::debug!(repeat, of = self.plan.loop_count, "opening clip decoder");
                stream = Some((
                    repeat,
                    VideoFrameStream::open(&self.clip.source_path, self.canvas, self.fps)?,
                ));
            }
            if let Some((_, decoder)) = stream.as_mut()
                && decoder.next_frame(&mut scratch)?
            {
                std::mem::swap(&mut frame.data, &mut scratch);
                have_frame = true;
            }
            // A repeat that runs dry holds its last decoded frame.
            if !have_frame {
                return Err(ReelError::media_decode(format!(
                    "no frames decoded from '{}'",
                    self.clip.source_path.display()
                )));
            }
            sink.push_frame(FrameIndex(f), &frame)?;
        }
        Ok(())
    }
}

/// Everything needed to encode a merged clip, resolved but not yet written.
pub struct MotionJob {
    /// Final output path.
    pub destination: PathBuf,
    /// Music track picked for this render, if any.
    pub track: Option<Track>,
    /// Voice plus optional music, cut to the target duration.
    pub composition: AudioComposition,
    /// Visual track.
    pub timeline: MotionTimeline,
}

/// Probe the clip, decode the voice, pick music and plan the repeats.
#[tracing::instrument(skip(config, request, rng), fields(clip = %request.clip_path.display()))]
pub fn prepare_motion<R: Rng + ?Sized>(
    config: &EngineConfig,
    request: &MotionRequest,
    rng: &mut R,
) -> ReelResult<MotionJob> {
    config.validate()?;
    let destination = config.output_path(&request.output_name)?;

    let clip = probe_video(&request.clip_path)?;
    let voice = decode_voice(&request.voice_path)?;
    let target = if voice.duration_sec() > 0.0 {
        voice.duration_sec()
    } else {
        tracing::warn!("voice decoded to zero length, using clip duration");
        clip.duration_sec
    };

    let track = select(&request.music, &list_tracks(&config.music_dir), rng);
    let music = decode_music(track.as_ref(), target)?;
    let composition = compose(voice, music, target)?;
    let timeline = MotionTimeline::new(clip, target)?;

    tracing::info!(
        clip_sec = timeline.loop_plan().clip_duration,
        target_sec = target,
        loops = timeline.loop_plan().loop_count,
        track = track.as_ref().map(|t| t.name.as_str()).unwrap_or("none"),
        "motion merge planned"
    );

    Ok(MotionJob {
        destination,
        track,
        composition,
        timeline,
    })
}

/// Loop or trim the base clip to the voiceover length, attach the composed audio and encode.
#[tracing::instrument(skip(config, request, rng), fields(out = %request.output_name))]
pub fn render_motion<R: Rng + ?Sized>(
    config: &EngineConfig,
    request: &MotionRequest,
    rng: &mut R,
) -> ReelResult<RenderOutput> {
    let mut job = prepare_motion(config, request, rng)?;
    writer::write(
        &mut job.timeline,
        &job.composition,
        &job.destination,
        config.overwrite,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/motion.rs"]
mod tests;
