use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, Canvas, Vec2};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::backend::FrameRGBA;

const BLACK: [u8; 4] = [0, 0, 0, 255];

/// One scaled, faded image centered on the canvas.
#[derive(Clone, Copy, Debug)]
pub struct ImageDraw<'a> {
    /// Cache key for the image paint; equal keys must refer to the same image.
    pub key: usize,
    /// Image pixels at their unzoomed size.
    pub image: &'a PreparedImage,
    /// Uniform scale about the canvas center.
    pub zoom: f64,
    /// Opacity over the black background, `0..=1`.
    pub opacity: f32,
}

/// CPU raster backend powered by `vello_cpu`.
///
/// Keeps its render context and decoded paints between frames; one instance per worker thread.
#[derive(Default)]
pub struct CpuBackend {
    ctx: Option<vello_cpu::RenderContext>,
    image_cache: HashMap<usize, vello_cpu::Image>,
}

impl CpuBackend {
    /// Create a backend with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `draw` over an opaque black `canvas`.
    pub fn render_image(&mut self, canvas: Canvas, draw: ImageDraw<'_>) -> ReelResult<FrameRGBA> {
        let (w, h) = canvas_u16(canvas)?;
        let paint = self.image_paint_for(draw.key, draw.image)?;
        let opacity = draw.opacity.clamp(0.0, 1.0);
        let tr = centered_zoom(canvas, draw.image, draw.zoom);

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            BLACK[0], BLACK[1], BLACK[2], BLACK[3],
        ));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(canvas.width),
            f64::from(canvas.height),
        ));

        if opacity > 0.0 {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint(paint);
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(draw.image.width),
                f64::from(draw.image.height),
            ));
            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn image_paint_for(&mut self, key: usize, image: &PreparedImage) -> ReelResult<vello_cpu::Image> {
        if let Some(p) = self.image_cache.get(&key) {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(key, paint.clone());
        Ok(paint)
    }
}

/// Transform placing `image` centered on `canvas` and scaled by `zoom` about the canvas center.
pub fn centered_zoom(canvas: Canvas, image: &PreparedImage, zoom: f64) -> Affine {
    let half = Vec2::new(f64::from(image.width) / 2.0, f64::from(image.height) / 2.0);
    Affine::translate(canvas.center()) * Affine::scale(zoom) * Affine::translate(-half)
}

fn canvas_u16(canvas: Canvas) -> ReelResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ReelError::invalid_input("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ReelError::invalid_input("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::invalid_input("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::invalid_input("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::invalid_input("image byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
