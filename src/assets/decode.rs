use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode encoded image bytes, rescale to `target_height` (aspect preserving) and convert to
/// premultiplied RGBA8.
pub fn decode_image_to_height(bytes: &[u8], target_height: u32) -> ReelResult<PreparedImage> {
    if target_height == 0 {
        return Err(ReelError::invalid_input("target height must be > 0"));
    }
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (src_w, src_h) = rgba.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ReelError::invalid_input("image has zero dimensions"));
    }

    let width = scaled_width(src_w, src_h, target_height);
    let rgba = if src_h == target_height {
        rgba
    } else {
        image::imageops::resize(
            &rgba,
            width,
            target_height,
            image::imageops::FilterType::Lanczos3,
        )
    };

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height: target_height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Read and decode an image file. Unreadable or undecodable files are invalid input.
pub fn load_image_to_height(path: &Path, target_height: u32) -> ReelResult<PreparedImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        ReelError::invalid_input(format!("failed to read image '{}': {e}", path.display()))
    })?;
    decode_image_to_height(&bytes, target_height).map_err(|e| match e {
        ReelError::Other(inner) => ReelError::invalid_input(format!(
            "failed to decode image '{}': {inner:#}",
            path.display()
        )),
        other => other,
    })
}

/// Width after uniformly scaling `src_w x src_h` to `target_height`; never below 1.
pub fn scaled_width(src_w: u32, src_h: u32, target_height: u32) -> u32 {
    let w = (f64::from(src_w) * f64::from(target_height) / f64::from(src_h)).round();
    (w as u32).max(1)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
