//! promoreel assembles short promotional videos from a narrated script.
//!
//! A voiceover drives the timing. The visual track is either a slideshow of still images with a
//! slow Ken-Burns push-in, or a single pre-generated motion clip looped and cut to length. Optional
//! background music is picked from a read-only catalog and mixed quietly under the voice. The
//! result is encoded to an H.264/AAC MP4 by the system `ffmpeg`.
//!
//! - [`list_tracks`] and [`select`] resolve a [`MusicChoice`] to zero or one [`Track`]
//! - [`compose`] builds an [`AudioComposition`] of exactly the target duration
//! - [`render_slideshow`] and [`render_motion`] run a full render and return a [`RenderOutput`]
//!
//! Every entry point takes an explicit [`EngineConfig`] and, where randomness is involved, a
//! caller-supplied [`rand::Rng`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod config;
mod encode;
mod foundation;
mod render;
mod timeline;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, FrameRange, Vec2};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::decode::{
    PreparedImage, decode_image_to_height, load_image_to_height, scaled_width,
};
pub use crate::assets::media::{
    AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE, VideoFrameStream, VideoSourceInfo,
    decode_audio_f32_stereo, is_tool_on_path, probe_video,
};
pub use crate::audio::catalog::{MUSIC_EXTENSION, Track, list_tracks};
pub use crate::audio::compose::{
    AudioComposition, AudioLayer, LayerRole, MUSIC_GAIN, VOICE_GAIN, compose, compose_from_files,
    decode_music, decode_voice,
};
pub use crate::audio::mix::{mix_composition, write_mix_to_f32le_file};
pub use crate::audio::select::{MusicChoice, select};
pub use crate::config::{ENV_MUSIC_DIR, ENV_OUTPUT_DIR, EngineConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::writer::{
    AUDIO_CODEC, CONTAINER, RenderOutput, VIDEO_CODEC, partial_path, write,
};
pub use crate::render::backend::{FrameRGBA, RenderThreading, VisualTimeline};
pub use crate::render::cpu::{CpuBackend, ImageDraw};
pub use crate::render::motion::{
    MotionJob, MotionRequest, MotionTimeline, prepare_motion, render_motion,
};
pub use crate::render::slideshow::{
    Scene, SlideshowJob, SlideshowRequest, SlideshowTimeline, prepare_slideshow,
    render_slideshow,
};
pub use crate::timeline::looping::{LoopPlan, LoopSpan, MAX_LOOP_COUNT};
pub use crate::timeline::plan::{
    FADE_SEC, MIN_TOTAL_SEC, OUTPUT_FPS, ZOOM_END, clamp_total, fade_gain, plan, scene_at, zoom,
};
