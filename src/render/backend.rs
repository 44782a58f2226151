use crate::config::EngineConfig;
use crate::encode::sink::FrameSink;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. Every frame produced by this crate is opaque, so the
/// bytes also read as straight alpha.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// A finite visual track that can be streamed, frame by frame, into a [`FrameSink`].
///
/// Implementations push frames `0..frame_count()` in strictly increasing order.
pub trait VisualTimeline {
    /// Output canvas.
    fn canvas(&self) -> Canvas;
    /// Output frame rate.
    fn fps(&self) -> Fps;
    /// Total frame count.
    fn frame_count(&self) -> u64;
    /// Timeline duration in seconds.
    fn duration_sec(&self) -> f64 {
        self.fps().frames_to_secs(self.frame_count())
    }
    /// Render every frame into `sink`. The caller owns `begin`/`end` on the sink.
    fn render_into(&mut self, sink: &mut dyn FrameSink) -> ReelResult<()>;
}

/// Frame-level parallelism settings.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Render each chunk across a rayon pool.
    pub parallel: bool,
    /// Frames per chunk.
    pub chunk_size: usize,
    /// Worker count; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 48,
            threads: None,
        }
    }
}

impl RenderThreading {
    /// Threading settings taken from the engine configuration.
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            parallel: cfg.parallel,
            chunk_size: cfg.chunk_size,
            threads: cfg.threads,
        }
    }

    pub(crate) fn normalized_chunk_size(&self) -> u64 {
        self.chunk_size.max(1) as u64
    }

    pub(crate) fn build_pool(&self) -> ReelResult<rayon::ThreadPool> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(ReelError::invalid_input(
                "render threading 'threads' must be >= 1 when set",
            ));
        }

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = self.threads {
            builder = builder.num_threads(n);
        }
        builder
            .build()
            .map_err(|e| ReelError::io(format!("failed to build rayon thread pool: {e}")))
    }
}
