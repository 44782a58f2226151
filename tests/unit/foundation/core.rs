use super::*;

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
}

#[test]
fn chunks_cover_range_in_order() {
    let r = FrameRange::new(FrameIndex(3), FrameIndex(13)).unwrap();
    let chunks: Vec<_> = r.chunks(4).collect();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].start, FrameIndex(3));
    assert_eq!(chunks[0].end, FrameIndex(7));
    assert_eq!(chunks[2].start, FrameIndex(11));
    assert_eq!(chunks[2].end, FrameIndex(13));
    let total: u64 = chunks.iter().map(|c| c.end.0 - c.start.0).sum();
    assert_eq!(total, 10);
}

#[test]
fn chunk_size_zero_is_treated_as_one() {
    let r = FrameRange::new(FrameIndex(0), FrameIndex(3)).unwrap();
    assert_eq!(r.chunks(0).count(), 3);
}

#[test]
fn fps_rounds_seconds_to_nearest_frame() {
    let fps = Fps::new(24, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(12.0), 288);
    assert_eq!(fps.secs_to_frames_round(0.02), 0);
    assert_eq!(fps.secs_to_frames_round(0.03), 1);
    assert!((fps.frames_to_secs(288) - 12.0).abs() < 1e-12);
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
}

#[test]
fn canvas_even_rounds_up() {
    let c = Canvas::even(1619, 1080);
    assert_eq!(c.width, 1620);
    assert_eq!(c.height, 1080);
    assert_eq!(Canvas::even(0, 1), Canvas { width: 2, height: 2 });
}
