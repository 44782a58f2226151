use super::*;
use crate::assets::media::AudioPcm;
use crate::audio::compose::{AudioLayer, compose};
use crate::encode::sink::FrameSink;
use crate::foundation::core::Canvas;

struct Unreachable;

impl VisualTimeline for Unreachable {
    fn canvas(&self) -> Canvas {
        Canvas::even(2, 2)
    }
    fn fps(&self) -> Fps {
        Fps { num: 24, den: 1 }
    }
    fn frame_count(&self) -> u64 {
        1
    }
    fn render_into(&mut self, _sink: &mut dyn FrameSink) -> ReelResult<()> {
        panic!("render_into must not run when the destination is rejected");
    }
}

fn one_second() -> AudioComposition {
    let pcm = AudioPcm {
        sample_rate: 48_000,
        channels: 2,
        interleaved_f32: vec![0.0; 96_000],
    };
    compose(AudioLayer::voice(pcm), None, 1.0).unwrap()
}

#[test]
fn partial_path_is_a_sibling_keeping_the_extension() {
    assert_eq!(
        partial_path(Path::new("/out/promo.mp4")),
        PathBuf::from("/out/promo.mp4.partial")
    );
    assert_eq!(
        partial_path(Path::new("out/reel")),
        PathBuf::from("out/reel.partial")
    );
    assert_ne!(
        partial_path(Path::new("/out/promo.mp4")),
        partial_path(Path::new("/out/promo.mov"))
    );
}

#[test]
fn existing_destination_without_overwrite_is_io_error() {
    let dir = std::env::temp_dir().join(format!("promoreel_writer_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let dest = dir.join("taken.mp4");
    std::fs::write(&dest, b"keep me").unwrap();

    let err = write(&mut Unreachable, &one_second(), &dest, false).unwrap_err();
    assert!(matches!(err, ReelError::Io(_)));
    assert_eq!(std::fs::read(&dest).unwrap(), b"keep me");
    assert!(!partial_path(&dest).exists());
    let _ = std::fs::remove_file(&dest);
}

#[test]
fn temp_guard_removes_file_unless_disarmed() {
    let dir = std::env::temp_dir().join(format!("promoreel_guard_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let removed = dir.join("removed.bin");
    let kept = dir.join("kept.bin");
    std::fs::write(&removed, b"x").unwrap();
    std::fs::write(&kept, b"x").unwrap();

    drop(TempFileGuard(Some(removed.clone())));
    let mut guard = TempFileGuard(Some(kept.clone()));
    guard.disarm();
    drop(guard);

    assert!(!removed.exists());
    assert!(kept.exists());
    let _ = std::fs::remove_file(&kept);
}
