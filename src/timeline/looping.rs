use crate::foundation::error::{ReelError, ReelResult};

/// Upper bound on repeats of one base clip; each repeat opens its own decoder.
pub const MAX_LOOP_COUNT: u32 = 10_000;

/// Source span `[start_sec, end_sec)` of the base clip played by one repeat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopSpan {
    /// Span start in clip time.
    pub start_sec: f64,
    /// Span end in clip time.
    pub end_sec: f64,
}

impl LoopSpan {
    /// Span length in seconds.
    pub fn duration_sec(self) -> f64 {
        self.end_sec - self.start_sec
    }
}

/// How a base clip of `clip_duration` seconds is repeated to cover `target` seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopPlan {
    /// Native clip duration `B`.
    pub clip_duration: f64,
    /// Merged timeline duration `T`.
    pub target: f64,
    /// `ceil(T / B)`, at least one.
    pub loop_count: u32,
    /// One span per repeat; all but the last cover the whole clip.
    pub spans: Vec<LoopSpan>,
}

impl LoopPlan {
    /// Plan repeats of a `clip_duration` clip cut to exactly `target` seconds.
    pub fn new(clip_duration: f64, target: f64) -> ReelResult<Self> {
        if !clip_duration.is_finite() || clip_duration <= 0.0 {
            return Err(ReelError::media_decode(format!(
                "base clip duration must be finite and > 0, got {clip_duration}"
            )));
        }
        if !target.is_finite() || target <= 0.0 {
            return Err(ReelError::invalid_input(format!(
                "merge target duration must be finite and > 0, got {target}"
            )));
        }

        let ratio = (target / clip_duration).ceil();
        if ratio > f64::from(MAX_LOOP_COUNT) {
            return Err(ReelError::media_decode(format!(
                "base clip of {clip_duration}s would need {ratio} repeats to cover {target}s \
                 (max {MAX_LOOP_COUNT})"
            )));
        }
        let loop_count = (ratio as u32).max(1);
        let mut spans = Vec::with_capacity(loop_count as usize);
        let mut remaining = target;
        for _ in 0..loop_count {
            let len = remaining.min(clip_duration);
            spans.push(LoopSpan {
                start_sec: 0.0,
                end_sec: len,
            });
            remaining -= len;
        }

        Ok(Self {
            clip_duration,
            target,
            loop_count,
            spans,
        })
    }

    /// Sum of all span durations; equals `target`.
    pub fn total_sec(&self) -> f64 {
        self.spans.iter().map(|s| s.duration_sec()).sum()
    }

    /// Repeat index and clip-local time for merged timeline instant `t`.
    pub fn locate(&self, t: f64) -> (u32, f64) {
        let t = t.clamp(0.0, self.target);
        let idx = ((t / self.clip_duration).floor() as u32).min(self.loop_count - 1);
        let local = t - f64::from(idx) * self.clip_duration;
        (idx, local.clamp(0.0, self.clip_duration))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/looping.rs"]
mod tests;
