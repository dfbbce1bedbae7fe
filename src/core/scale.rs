use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};

/// Nice tick steps are `{1, 2, 2.5, 5} × 10^k`.
const NICE_STEP_MANTISSAS: [f64; 4] = [1.0, 2.0, 2.5, 5.0];

/// Ticks emitted by [`LinearScale::ticks`] are capped at this count.
const MAX_TICK_COUNT: f64 = 64.0;

pub type TickList = SmallVec<[f64; 12]>;

/// Linear mapping from a value domain onto a pixel range.
///
/// Ranges may be inverted (`range_start > range_end`), which is how value
/// axes grow upward on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite()
            || !domain_end.is_finite()
            || domain_start == domain_end
            || !(domain_end - domain_start).is_finite()
        {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    /// Value scale for `[min(0, min_value), max_value × headroom]`.
    ///
    /// Degenerate inputs (no values, all zero) fall back to `[0, 1]`.
    pub fn for_values(
        values: impl IntoIterator<Item = f64>,
        headroom: f64,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold((0.0_f64, 0.0_f64), |(min, max), value| {
                (min.min(value), max.max(value))
            });
        // Headroom is dropped where it would overflow.
        let with_headroom = |value: f64| {
            let scaled = value * headroom;
            if scaled.is_finite() { scaled } else { value }
        };
        let mut domain_start = if min < 0.0 { with_headroom(min) } else { 0.0 };
        let mut domain_end = with_headroom(max);
        if !(domain_end - domain_start).is_finite() {
            domain_start /= 2.0;
            domain_end /= 2.0;
        }
        if domain_end <= domain_start {
            domain_end = if domain_start < 0.0 { 0.0 } else { 1.0 };
        }
        Self::new(domain_start, domain_end, range_start, range_end)
    }

    /// Identity scale `[0, 1] → [0, 1]`.
    #[must_use]
    pub const fn unit() -> Self {
        Self {
            domain_start: 0.0,
            domain_end: 1.0,
            range_start: 0.0,
            range_end: 1.0,
        }
    }

    /// Same domain mapped onto a new pixel range.
    #[must_use]
    pub fn with_range(self, range_start: f64, range_end: f64) -> Self {
        Self {
            range_start,
            range_end,
            ..self
        }
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let mut normalized = (value - self.domain_start) / span;
        if !normalized.is_finite() {
            normalized = value / span - self.domain_start / span;
        }
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64) -> f64 {
        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / range_span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }

    /// Pixel length of `value` measured from zero (clamped into the domain).
    #[must_use]
    pub fn extent_from_zero(self, value: f64) -> f64 {
        let zero = self.domain_to_pixel(0.0_f64.clamp(self.domain_start, self.domain_end));
        (self.domain_to_pixel(value) - zero).abs()
    }

    /// Nice tick step targeting roughly `target_count` intervals.
    #[must_use]
    pub fn tick_step(self, target_count: usize) -> f64 {
        nice_step((self.domain_end - self.domain_start).abs(), target_count)
    }

    /// Ticks at multiples of the nice step that fall inside the domain.
    #[must_use]
    pub fn ticks(self, target_count: usize) -> TickList {
        let step = self.tick_step(target_count);
        let (low, high) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };
        let mut ticks = TickList::new();
        if !(step.is_finite() && step > 0.0) {
            return ticks;
        }
        let first = (low / step).ceil();
        let last = (high / step + 1e-9).floor();
        if !first.is_finite() || !last.is_finite() || last - first > MAX_TICK_COUNT {
            return ticks;
        }
        for index in first as i64..=last as i64 {
            ticks.push(index as f64 * step);
        }
        ticks
    }
}

#[must_use]
pub fn nice_step(span: f64, target_count: usize) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }
    let raw = span / target_count.max(1) as f64;
    if !raw.is_normal() {
        return span;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    if !(magnitude.is_finite() && magnitude > 0.0) {
        return span;
    }
    NICE_STEP_MANTISSAS
        .iter()
        .map(|mantissa| mantissa * magnitude)
        .find(|candidate| *candidate >= raw)
        .unwrap_or(10.0 * magnitude)
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, nice_step};

    #[test]
    fn value_scale_applies_headroom() {
        let scale = LinearScale::for_values([10.0, 30.0, 20.0], 1.15, 300.0, 0.0).expect("scale");
        let (start, end) = scale.domain();
        assert_eq!(start, 0.0);
        assert!((end - 34.5).abs() < 1e-9);
    }

    #[test]
    fn value_scale_falls_back_for_empty_input() {
        let scale = LinearScale::for_values([], 1.15, 300.0, 0.0).expect("scale");
        assert_eq!(scale.domain(), (0.0, 1.0));
    }

    #[test]
    fn inverted_range_round_trips() {
        let scale = LinearScale::new(0.0, 50.0, 400.0, 100.0).expect("scale");
        let px = scale.domain_to_pixel(20.0);
        assert!((px - 280.0).abs() < 1e-9);
        assert!((scale.pixel_to_domain(px) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn ticks_stay_inside_domain() {
        let scale = LinearScale::new(0.0, 34.5, 0.0, 100.0).expect("scale");
        let ticks = scale.ticks(5);
        assert_eq!(ticks.as_slice(), &[0.0, 10.0, 20.0, 30.0]);
        assert_eq!(nice_step(34.5, 5), 10.0);
    }

    #[test]
    fn subnormal_domain_still_yields_bounded_ticks() {
        let scale = LinearScale::for_values([5e-324], 1.15, 300.0, 0.0).expect("scale");
        let step = scale.tick_step(5);
        assert!(step > 0.0 && step.is_finite());
        let ticks = scale.ticks(5);
        assert!(!ticks.is_empty());
        assert!(ticks.len() <= 65);
        assert!(scale.domain_to_pixel(5e-324).is_finite());
    }

    #[test]
    fn huge_values_keep_a_finite_domain() {
        let scale = LinearScale::for_values([f64::MAX], 1.15, 300.0, 0.0).expect("scale");
        assert_eq!(scale.domain(), (0.0, f64::MAX));
        assert!((scale.domain_to_pixel(f64::MAX) - 0.0).abs() < 1e-9);

        let scale = LinearScale::for_values([f64::MAX, -f64::MAX], 1.15, 300.0, 0.0).expect("scale");
        let (start, end) = scale.domain();
        assert!((end - start).is_finite());
        assert!(scale.domain_to_pixel(f64::MAX).is_finite());
        assert!(scale.ticks(5).len() <= 65);
    }
}
