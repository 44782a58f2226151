#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub fn ffmpeg_tools_available() -> bool {
    let ok = |tool: &str| {
        Command::new(tool)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    };
    ok("ffmpeg") && ok("ffprobe")
}

/// Fresh scratch directory under `target/`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("promoreel_it").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Sine tone of `secs` seconds as 48 kHz PCM WAV.
///
/// The container is chosen explicitly so tracks can carry an `.mp3` name without needing an MP3
/// encoder in the local ffmpeg build; ffmpeg probes the content when decoding.
pub fn synth_tone(path: &Path, secs: f64, freq: u32) {
    let status = Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-f", "lavfi", "-i"])
        .arg(format!("sine=frequency={freq}:sample_rate=48000"))
        .args(["-t", &format!("{secs}"), "-c:a", "pcm_s16le", "-f", "wav"])
        .arg(path)
        .status()
        .unwrap();
    assert!(status.success(), "ffmpeg failed creating {}", path.display());
}

/// Test-pattern clip of `secs` seconds with its own audio track.
pub fn synth_clip(path: &Path, secs: f64) {
    let status = Command::new("ffmpeg")
        .args([
            "-v",
            "error",
            "-y",
            "-f",
            "lavfi",
            "-i",
            "testsrc=size=64x48:rate=30",
            "-f",
            "lavfi",
            "-i",
            "sine=frequency=880:sample_rate=48000",
            "-t",
            &format!("{secs}"),
            "-pix_fmt",
            "yuv420p",
            "-c:v",
            "libx264",
            "-c:a",
            "aac",
        ])
        .arg(path)
        .status()
        .unwrap();
    assert!(status.success(), "ffmpeg failed creating {}", path.display());
}

/// Solid-color PNG.
pub fn synth_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(path)
        .unwrap();
}

/// Number of streams of `kind` (`video` / `audio`) in a media file.
pub fn stream_count(path: &Path, kind: &str) -> usize {
    let selector = match kind {
        "video" => "v",
        _ => "a",
    };
    let out = Command::new("ffprobe")
        .args(["-v", "error", "-select_streams", selector])
        .args(["-show_entries", "stream=codec_name", "-of", "csv=p=0"])
        .arg(path)
        .output()
        .unwrap();
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count()
}
