use crate::foundation::error::{ReelError, ReelResult};

/// Output frame rate shared by both visual paths.
pub const OUTPUT_FPS: u32 = 24;
/// Shortest timeline a slideshow is stretched to, in seconds.
pub const MIN_TOTAL_SEC: f64 = 1.0;
/// Scale reached at the end of every scene.
pub const ZOOM_END: f64 = 1.1;
/// Length of the global fade-in and fade-out, in seconds.
pub const FADE_SEC: f64 = 0.5;

/// Split `total_duration` evenly across `image_count` scenes.
///
/// The total is clamped to at least [`MIN_TOTAL_SEC`] first; non-finite totals count as zero.
pub fn plan(image_count: usize, total_duration: f64) -> ReelResult<Vec<f64>> {
    if image_count == 0 {
        return Err(ReelError::invalid_input(
            "slideshow needs at least one image",
        ));
    }
    let total = clamp_total(total_duration);
    let per_scene = total / image_count as f64;
    Ok(vec![per_scene; image_count])
}

/// Timeline length after the minimum-duration clamp.
pub fn clamp_total(total_duration: f64) -> f64 {
    let total = if total_duration.is_finite() {
        total_duration
    } else {
        0.0
    };
    total.max(MIN_TOTAL_SEC)
}

/// Ken-Burns scale at local time `t` of a scene lasting `d` seconds.
///
/// Linear from `1.0` at `t = 0` to exactly [`ZOOM_END`] at `t = d`.
pub fn zoom(t: f64, d: f64) -> f64 {
    if d.is_nan() || d <= 0.0 {
        return 1.0;
    }
    let t = if t.is_finite() { t.clamp(0.0, d) } else { 0.0 };
    if t >= d {
        return ZOOM_END;
    }
    1.0 + (ZOOM_END - 1.0) * (t / d)
}

/// Active scene index and scene-local time for timeline instant `t`.
///
/// Instants before zero map to the first scene, past the end to the last scene at its end.
pub fn scene_at(durations: &[f64], t: f64) -> Option<(usize, f64)> {
    let last = durations.len().checked_sub(1)?;
    let mut start = 0.0;
    let t = t.max(0.0);
    for (idx, &d) in durations.iter().enumerate() {
        if t < start + d || idx == last {
            return Some((idx, (t - start).clamp(0.0, d)));
        }
        start += d;
    }
    None
}

/// Opacity of the global fade at instant `t` of a timeline lasting `total` seconds.
pub fn fade_gain(t: f64, total: f64, fade: f64) -> f64 {
    if total.is_nan() || total <= 0.0 || fade.is_nan() || fade <= 0.0 {
        return 1.0;
    }
    let fade = fade.min(total / 2.0);
    let t = t.clamp(0.0, total);
    let fade_in = t / fade;
    let fade_out = (total - t) / fade;
    fade_in.min(fade_out).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/plan.rs"]
mod tests;
