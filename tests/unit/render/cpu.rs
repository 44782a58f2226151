use super::*;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
    let mut bytes = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        bytes.extend_from_slice(&rgba);
    }
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(bytes),
    }
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn narrow_image_is_centered_on_black() {
    let canvas = Canvas::even(32, 16);
    let img = solid(8, 16, [255, 255, 255, 255]);
    let mut backend = CpuBackend::new();
    let frame = backend
        .render_image(
            canvas,
            ImageDraw {
                key: 0,
                image: &img,
                zoom: 1.0,
                opacity: 1.0,
            },
        )
        .unwrap();

    assert_eq!(frame.data.len(), 32 * 16 * 4);
    assert_eq!(px(&frame, 16, 8), [255, 255, 255, 255]);
    assert_eq!(px(&frame, 1, 8), [0, 0, 0, 255]);
    assert_eq!(px(&frame, 30, 8), [0, 0, 0, 255]);
}

#[test]
fn zero_opacity_is_black() {
    let canvas = Canvas::even(8, 8);
    let img = solid(8, 8, [200, 100, 50, 255]);
    let frame = CpuBackend::new()
        .render_image(
            canvas,
            ImageDraw {
                key: 0,
                image: &img,
                zoom: 1.0,
                opacity: 0.0,
            },
        )
        .unwrap();
    assert!(frame.data.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn half_opacity_dims_the_image() {
    let canvas = Canvas::even(8, 8);
    let img = solid(8, 8, [200, 200, 200, 255]);
    let frame = CpuBackend::new()
        .render_image(
            canvas,
            ImageDraw {
                key: 0,
                image: &img,
                zoom: 1.0,
                opacity: 0.5,
            },
        )
        .unwrap();
    let [r, _, _, a] = px(&frame, 4, 4);
    assert_eq!(a, 255);
    assert!((90..=110).contains(&r), "r = {r}");
}

#[test]
fn zoom_scales_about_the_center() {
    let canvas = Canvas::even(100, 50);
    let img = solid(20, 10, [0, 0, 0, 255]);
    let a = centered_zoom(canvas, &img, 1.0);
    let b = centered_zoom(canvas, &img, 1.1);

    let p0 = a * kurbo::Point::new(0.0, 0.0);
    assert!((p0.x - 40.0).abs() < 1e-9 && (p0.y - 20.0).abs() < 1e-9);
    let c = b * kurbo::Point::new(10.0, 5.0);
    assert!((c.x - 50.0).abs() < 1e-9 && (c.y - 25.0).abs() < 1e-9);
    let corner = b * kurbo::Point::new(20.0, 10.0);
    assert!((corner.x - 61.0).abs() < 1e-9 && (corner.y - 30.5).abs() < 1e-9);
}

#[test]
fn oversized_canvas_is_rejected() {
    let img = solid(1, 1, [0, 0, 0, 255]);
    let err = CpuBackend::new()
        .render_image(
            Canvas {
                width: 70_000,
                height: 2,
            },
            ImageDraw {
                key: 0,
                image: &img,
                zoom: 1.0,
                opacity: 1.0,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));
}
