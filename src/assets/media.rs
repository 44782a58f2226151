use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Internal audio mixing sample rate used across decode/mix/encode pipeline.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Channel count of decoded and mixed PCM.
pub const MIX_CHANNELS: u16 = 2;

#[derive(Clone, Debug)]
/// Decoded interleaved floating-point PCM.
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.interleaved_f32.len() / usize::from(self.channels)) as u64
    }

    /// Duration in seconds.
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

#[derive(Clone, Debug)]
/// Basic metadata about a source video file.
pub struct VideoSourceInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Container duration in seconds.
    pub duration_sec: f64,
}

/// Probe source video metadata through `ffprobe`.
///
/// A missing video stream, missing dimensions, or a zero/unreadable duration are all reported as
/// [`ReelError::MediaDecode`].
pub fn probe_video(source_path: &Path) -> ReelResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = run_ffprobe(source_path)?;
    let parsed: ProbeOut = serde_json::from_slice(&out)
        .map_err(|e| ReelError::media_decode(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            ReelError::media_decode(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;
    let width = video_stream
        .width
        .ok_or_else(|| ReelError::media_decode("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| ReelError::media_decode("missing video height from ffprobe"))?;

    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| parse_duration(f.duration.as_deref()))
        .or_else(|| parse_duration(video_stream.duration.as_deref()))
        .unwrap_or(0.0);
    if !(duration_sec.is_finite() && duration_sec > 0.0) {
        return Err(ReelError::media_decode(format!(
            "video '{}' has zero or unreadable duration",
            source_path.display()
        )));
    }

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        duration_sec,
    })
}

fn run_ffprobe(source_path: &Path) -> ReelResult<Vec<u8>> {
    if !source_path.is_file() {
        return Err(ReelError::media_decode(format!(
            "media file '{}' does not exist",
            source_path.display()
        )));
    }
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::io(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::media_decode(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    Ok(out.stdout)
}

fn parse_duration(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Decode audio from a media source to stereo interleaved `f32` PCM.
///
/// With `max_duration_sec` set, `ffmpeg` stops reading the input after that many seconds.
pub fn decode_audio_f32_stereo(
    path: &Path,
    sample_rate: u32,
    max_duration_sec: Option<f64>,
) -> ReelResult<AudioPcm> {
    if !path.is_file() {
        return Err(ReelError::media_decode(format!(
            "audio file '{}' does not exist",
            path.display()
        )));
    }
    let out = Command::new("ffmpeg")
        .args(audio_decode_args(path, sample_rate, max_duration_sec))
        .output()
        .map_err(|e| ReelError::io(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(ReelError::media_decode(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: MIX_CHANNELS,
        interleaved_f32: f32le_bytes_to_samples(&out.stdout)?,
    })
}

fn audio_decode_args(
    path: &Path,
    sample_rate: u32,
    max_duration_sec: Option<f64>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-v".into(), "error".into()];
    if let Some(max) = max_duration_sec.filter(|d| d.is_finite() && *d > 0.0) {
        args.push("-t".into());
        args.push(format!("{max:.6}").into());
    }
    args.push("-i".into());
    args.push(path.as_os_str().to_owned());
    for a in [
        "-vn",
        "-f",
        "f32le",
        "-acodec",
        "pcm_f32le",
        "-ac",
        &MIX_CHANNELS.to_string(),
        "-ar",
        &sample_rate.to_string(),
        "pipe:1",
    ] {
        args.push(a.into());
    }
    args
}

pub(crate) fn f32le_bytes_to_samples(bytes: &[u8]) -> ReelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::media_decode(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(pcm)
}

/// Streaming decoder yielding straight-alpha RGBA8 frames of a video, resampled to `fps` and
/// scaled to `size`.
///
/// The `ffmpeg` child is killed and reaped on drop, so an early return never leaks the process.
pub struct VideoFrameStream {
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    frame_len: usize,
    source: PathBuf,
}

impl VideoFrameStream {
    /// Spawn a decoder for `source`.
    pub fn open(source: &Path, size: Canvas, fps: Fps) -> ReelResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(source)
            .args([
                "-an",
                "-vf",
                &format!(
                    "fps={}/{},scale={}:{}",
                    fps.num, fps.den, size.width, size.height
                ),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ReelError::io(format!("failed to spawn ffmpeg video decoder: {e}")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::io("failed to open ffmpeg stdout (unexpected)"))?;

        Ok(Self {
            child: Some(child),
            stdout: Some(stdout),
            frame_len: size.width as usize * size.height as usize * 4,
            source: source.to_path_buf(),
        })
    }

    /// Read the next frame into `buf`. Returns `false` at end of stream.
    pub fn next_frame(&mut self, buf: &mut Vec<u8>) -> ReelResult<bool> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(false);
        };
        buf.resize(self.frame_len, 0);
        let mut filled = 0usize;
        while filled < self.frame_len {
            let n = stdout.read(&mut buf[filled..]).map_err(|e| {
                ReelError::media_decode(format!(
                    "failed to read decoded frame from '{}': {e}",
                    self.source.display()
                ))
            })?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == self.frame_len {
            return Ok(true);
        }
        self.stdout = None;
        if filled != 0 {
            tracing::warn!(
                source = %self.source.display(),
                bytes = filled,
                "discarding truncated trailing video frame"
            );
        }
        Ok(false)
    }
}

impl Drop for VideoFrameStream {
    fn drop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Return `true` when `tool` (e.g. `ffmpeg`, `ffprobe`) can be invoked from `PATH`.
pub fn is_tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
