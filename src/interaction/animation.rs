//! Frame-based animation timeline.
//!
//! Animations are plain `(start, duration, easing, target)` descriptors driven
//! by one ticking clock. The caller supplies the `apply` step when advancing,
//! so no animation owns a timer of its own.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Element count above which entrance animations are staggered.
pub const STAGGER_THRESHOLD: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Maps normalized time in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let shifted = -2.0 * t + 2.0;
                    1.0 - shifted * shifted * shifted / 2.0
                }
            }
        }
    }

    /// Name understood by the interactive bundle runtime.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseOutCubic => "cubicOut",
            Self::EaseInOutCubic => "cubicInOut",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDescriptor<T> {
    pub start: Duration,
    pub duration: Duration,
    pub easing: Easing,
    pub target: T,
}

impl<T> AnimationDescriptor<T> {
    #[must_use]
    pub fn new(start: Duration, duration: Duration, easing: Easing, target: T) -> Self {
        Self {
            start,
            duration,
            easing,
            target,
        }
    }

    #[must_use]
    pub fn end(&self) -> Duration {
        self.start + self.duration
    }

    /// Eased progress at `now`; `0` before start, `1` at or after end.
    #[must_use]
    pub fn progress_at(&self, now: Duration) -> f64 {
        if now <= self.start {
            return if self.duration.is_zero() && now == self.start {
                1.0
            } else {
                0.0
            };
        }
        if self.duration.is_zero() || now >= self.end() {
            return 1.0;
        }
        let elapsed = (now - self.start).as_secs_f64();
        self.easing.apply(elapsed / self.duration.as_secs_f64())
    }
}

/// One category moving between display slots during a sort transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotMove {
    pub original_index: usize,
    pub from_slot: f64,
    pub to_slot: f64,
}

impl SlotMove {
    #[must_use]
    pub fn slot_at(self, progress: f64) -> f64 {
        self.from_slot + (self.to_slot - self.from_slot) * progress
    }
}

/// Set of descriptors advanced together by a single clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<T> {
    tracks: Vec<AnimationDescriptor<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self { tracks: Vec::new() }
    }
}

impl<T> Timeline<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: AnimationDescriptor<T>) {
        self.tracks.push(descriptor);
    }

    #[must_use]
    pub fn tracks(&self) -> &[AnimationDescriptor<T>] {
        &self.tracks
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Latest end time across tracks.
    #[must_use]
    pub fn end(&self) -> Option<Duration> {
        self.tracks.iter().map(AnimationDescriptor::end).max()
    }

    /// Applies every track's eased progress at `now` and retires finished tracks.
    ///
    /// Finished tracks are applied one last time with progress `1.0`.
    pub fn advance(&mut self, now: Duration, mut apply: impl FnMut(&T, f64)) {
        for track in &self.tracks {
            apply(&track.target, track.progress_at(now));
        }
        self.tracks.retain(|track| now < track.end());
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

impl Timeline<usize> {
    /// Entrance timeline for `count` elements fitting inside `total`.
    ///
    /// Small element counts animate together. Larger counts are staggered: each
    /// element runs for half of `total` and start offsets spread over the
    /// other half, so the whole entrance still ends at `start + total`.
    #[must_use]
    pub fn staggered(count: usize, start: Duration, total: Duration, easing: Easing) -> Self {
        let mut timeline = Self::new();
        let delays = stagger_delays(count, total);
        let duration = if count > STAGGER_THRESHOLD {
            total / 2
        } else {
            total
        };
        for (index, delay) in delays.into_iter().enumerate() {
            timeline.push(AnimationDescriptor::new(
                start + delay,
                duration,
                easing,
                index,
            ));
        }
        timeline
    }
}

/// Start offsets for a staggered entrance of `count` elements within `total`.
#[must_use]
pub fn stagger_delays(count: usize, total: Duration) -> Vec<Duration> {
    if count <= STAGGER_THRESHOLD {
        return vec![Duration::ZERO; count];
    }
    let spread = total / 2;
    let last = (count - 1) as u32;
    (0..count as u32).map(|index| spread * index / last).collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{AnimationDescriptor, Easing, STAGGER_THRESHOLD, Timeline, stagger_delays};

    #[test]
    fn easing_hits_endpoints() {
        for easing in [Easing::Linear, Easing::EaseOutCubic, Easing::EaseInOutCubic] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn timeline_retires_finished_tracks_after_final_apply() {
        let mut timeline = Timeline::new();
        timeline.push(AnimationDescriptor::new(
            Duration::ZERO,
            Duration::from_millis(100),
            Easing::Linear,
            7_usize,
        ));
        let mut seen = Vec::new();
        timeline.advance(Duration::from_millis(50), |target, progress| {
            seen.push((*target, progress))
        });
        timeline.advance(Duration::from_millis(120), |target, progress| {
            seen.push((*target, progress))
        });
        assert_eq!(seen, vec![(7, 0.5), (7, 1.0)]);
        assert!(timeline.is_idle());
    }

    #[test]
    fn many_elements_are_staggered_within_total() {
        let total = Duration::from_millis(300);
        let delays = stagger_delays(STAGGER_THRESHOLD + 4, total);
        assert_eq!(delays.first(), Some(&Duration::ZERO));
        assert_eq!(delays.last(), Some(&Duration::from_millis(150)));

        let timeline = Timeline::staggered(STAGGER_THRESHOLD + 4, Duration::ZERO, total, Easing::EaseOutCubic);
        assert_eq!(timeline.end(), Some(total));
        assert!(stagger_delays(3, total).iter().all(Duration::is_zero));
    }
}
