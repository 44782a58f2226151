use std::path::PathBuf;

use rand::Rng;
use rayon::prelude::*;

use crate::assets::decode::{PreparedImage, load_image_to_height};
use crate::audio::catalog::{Track, list_tracks};
use crate::audio::compose::{AudioComposition, compose, decode_music, decode_voice};
use crate::audio::select::{MusicChoice, select};
use crate::config::EngineConfig;
use crate::encode::sink::FrameSink;
use crate::encode::writer::{self, RenderOutput};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::{FrameRGBA, RenderThreading, VisualTimeline};
use crate::render::cpu::{CpuBackend, ImageDraw};
use crate::timeline::plan::{self, FADE_SEC, OUTPUT_FPS};

/// Inputs for a still-image slideshow.
#[derive(Clone, Debug)]
pub struct SlideshowRequest {
    /// Voiceover audio; its duration is the video duration.
    pub voice_path: PathBuf,
    /// Images in scene order (PNG or JPEG).
    pub images: Vec<PathBuf>,
    /// Background music choice.
    pub music: MusicChoice,
    /// Output file name under the configured output directory.
    pub output_name: String,
}

/// One image held for a slice of the timeline.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Image rescaled to the target height.
    pub image: PreparedImage,
    /// Scene start on the timeline, in seconds.
    pub start_sec: f64,
    /// Scene length in seconds.
    pub duration_sec: f64,
}

/// Ken-Burns slideshow of equally timed scenes with a global fade in and out.
pub struct SlideshowTimeline {
    canvas: Canvas,
    fps: Fps,
    scenes: Vec<Scene>,
    durations: Vec<f64>,
    total_sec: f64,
    frame_count: u64,
    threading: RenderThreading,
}

impl SlideshowTimeline {
    /// Lay `images` out across `total_duration` seconds (clamped to at least one second).
    pub fn new(
        images: Vec<PreparedImage>,
        total_duration: f64,
        threading: RenderThreading,
    ) -> ReelResult<Self> {
        let durations = plan::plan(images.len(), total_duration)?;
        let total_sec = plan::clamp_total(total_duration);

        let width = images.iter().map(|i| i.width).max().unwrap_or(0);
        let height = images.iter().map(|i| i.height).max().unwrap_or(0);
        let canvas = Canvas::even(width, height);

        let mut start_sec = 0.0;
        let scenes = images
            .into_iter()
            .zip(&durations)
            .map(|(image, &duration_sec)| {
                let scene = Scene {
                    image,
                    start_sec,
                    duration_sec,
                };
                start_sec += duration_sec;
                scene
            })
            .collect();

        let fps = Fps::new(OUTPUT_FPS, 1)?;
        let frame_count = fps.secs_to_frames_round(total_sec).max(1);

        Ok(Self {
            canvas,
            fps,
            scenes,
            durations,
            total_sec,
            frame_count,
            threading,
        })
    }

    /// Scenes in playback order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Timeline length in seconds; the sum of all scene durations.
    pub fn total_sec(&self) -> f64 {
        self.total_sec
    }

    /// What frame `f` draws: scene index, zoom and fade opacity.
    pub fn frame_draw(&self, f: FrameIndex) -> ReelResult<ImageDraw<'_>> {
        let t = self.fps.frames_to_secs(f.0);
        let (idx, local) = plan::scene_at(&self.durations, t)
            .ok_or_else(|| ReelError::invalid_input("slideshow has no scenes"))?;
        let scene = &self.scenes[idx];
        Ok(ImageDraw {
            key: idx,
            image: &scene.image,
            zoom: plan::zoom(local, scene.duration_sec),
            opacity: plan::fade_gain(t, self.total_sec, FADE_SEC) as f32,
        })
    }

    fn render_frame(&self, backend: &mut CpuBackend, f: FrameIndex) -> ReelResult<FrameRGBA> {
        backend.render_image(self.canvas, self.frame_draw(f)?)
    }

    fn render_sequential(&self, sink: &mut dyn FrameSink) -> ReelResult<()> {
        let mut backend = CpuBackend::new();
        for f in 0..self.frame_count {
            let frame = self.render_frame(&mut backend, FrameIndex(f))?;
            sink.push_frame(FrameIndex(f), &frame)?;
        }
        Ok(())
    }

    fn render_parallel(&self, sink: &mut dyn FrameSink) -> ReelResult<()> {
        let pool = self.threading.build_pool()?;
        let all = FrameRange::new(FrameIndex(0), FrameIndex(self.frame_count))?;
        for chunk in all.chunks(self.threading.normalized_chunk_size()) {
            let indices: Vec<u64> = (chunk.start.0..chunk.end.0).collect();
            let rendered = pool.install(|| {
                indices
                    .par_iter()
                    .map_init(CpuBackend::new, |backend, &f| {
                        self.render_frame(backend, FrameIndex(f))
                    })
                    .collect::<Vec<_>>()
            });
            for (f, frame) in indices.into_iter().zip(rendered) {
                sink.push_frame(FrameIndex(f), &frame?)?;
            }
        }
        Ok(())
    }
}

impl VisualTimeline for SlideshowTimeline {
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
        if self.threading.parallel {
            self.render_parallel(sink)
        } else {
            self.render_sequential(sink)
        }
    }
}

/// Everything needed to encode a slideshow, resolved but not yet written.
pub struct SlideshowJob {
    /// Final output path.
    pub destination: PathBuf,
    /// Music track picked for this render, if any.
    pub track: Option<Track>,
    /// Voice plus optional music, cut to the timeline length.
    pub composition: AudioComposition,
    /// Visual track.
    pub timeline: SlideshowTimeline,
}

/// Decode the voice and images, pick music and build the slideshow timeline and audio.
#[tracing::instrument(skip(config, request, rng), fields(images = request.images.len()))]
pub fn prepare_slideshow<R: Rng + ?Sized>(
    config: &EngineConfig,
    request: &SlideshowRequest,
    rng: &mut R,
) -> ReelResult<SlideshowJob> {
    if request.images.is_empty() {
        return Err(ReelError::invalid_input(
            "slideshow needs at least one image",
        ));
    }
    config.validate()?;
    let destination = config.output_path(&request.output_name)?;

    let voice = decode_voice(&request.voice_path)?;
    let duration = plan::clamp_total(voice.duration_sec());
    tracing::debug!(
        voice_sec = voice.duration_sec(),
        duration_sec = duration,
        "voice decoded"
    );

    let track = select(&request.music, &list_tracks(&config.music_dir), rng);
    let music = decode_music(track.as_ref(), duration)?;
    let composition = compose(voice, music, duration)?;

    let images = request
        .images
        .iter()
        .map(|p| load_image_to_height(p, config.target_height))
        .collect::<ReelResult<Vec<_>>>()?;
    let timeline = SlideshowTimeline::new(images, duration, RenderThreading::from_config(config))?;

    tracing::info!(
        scenes = timeline.scenes().len(),
        per_scene_sec = duration / timeline.scenes().len() as f64,
        track = track.as_ref().map(|t| t.name.as_str()).unwrap_or("none"),
        "slideshow planned"
    );

    Ok(SlideshowJob {
        destination,
        track,
        composition,
        timeline,
    })
}

/// Render a zooming slideshow of `request.images` timed to the voiceover and encode it.
#[tracing::instrument(skip(config, request, rng), fields(out = %request.output_name))]
pub fn render_slideshow<R: Rng + ?Sized>(
    config: &EngineConfig,
    request: &SlideshowRequest,
    rng: &mut R,
) -> ReelResult<RenderOutput> {
    let mut job = prepare_slideshow(config, request, rng)?;
    writer::write(
        &mut job.timeline,
        &job.composition,
        &job.destination,
        config.overwrite,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/slideshow.rs"]
mod tests;
