use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_keeps_size_when_height_matches_and_premultiplies() {
    let prepared = decode_image_to_height(&png_bytes(1, 1, [100, 50, 200, 128]), 1).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rescales_to_target_height_preserving_aspect() {
    let prepared = decode_image_to_height(&png_bytes(40, 20, [255, 0, 0, 255]), 60).unwrap();
    assert_eq!(prepared.height, 60);
    assert_eq!(prepared.width, 120);
    assert_eq!(prepared.rgba8_premul.len(), 120 * 60 * 4);
}

#[test]
fn scaled_width_rounds_and_never_hits_zero() {
    assert_eq!(scaled_width(1920, 1080, 1080), 1920);
    assert_eq!(scaled_width(1000, 3000, 1080), 360);
    assert_eq!(scaled_width(1, 10_000, 10), 1);
}

#[test]
fn undecodable_file_is_invalid_input() {
    let dir = std::env::temp_dir().join(format!("promoreel_decode_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("broken.png");
    std::fs::write(&path, b"not an image").unwrap();

    let err = load_image_to_height(&path, 32).unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));

    let err = load_image_to_height(&dir.join("missing.png"), 32).unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));
}
