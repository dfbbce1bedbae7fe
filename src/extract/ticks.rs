use crate::core::parse_value;
use crate::render::TextPrimitive;

/// Least-squares map from pixel coordinate to data value, fitted on axis
/// tick labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct PixelFit {
    slope: f64,
    intercept: f64,
}

impl PixelFit {
    /// Needs at least two ticks at distinct pixel positions.
    pub(super) fn from_ticks(ticks: &[(f64, f64)]) -> Option<Self> {
        if ticks.len() < 2 {
            return None;
        }
        let count = ticks.len() as f64;
        let mean_px = ticks.iter().map(|(px, _)| px).sum::<f64>() / count;
        let mean_value = ticks.iter().map(|(_, value)| value).sum::<f64>() / count;
        let (covariance, variance) = ticks.iter().fold((0.0, 0.0), |(cov, var), (px, value)| {
            let dx = px - mean_px;
            (cov + dx * (value - mean_value), var + dx * dx)
        });
        if variance <= f64::EPSILON {
            return None;
        }
        let slope = covariance / variance;
        Some(Self {
            slope,
            intercept: mean_value - slope * mean_px,
        })
    }

    pub(super) fn value_at(self, px: f64) -> f64 {
        self.slope * px + self.intercept
    }

    /// Value of a bar spanning `[start_px, end_px]` from the zero line.
    pub(super) fn span_value(self, start_px: f64, end_px: f64) -> f64 {
        let start = self.value_at(start_px);
        let end = self.value_at(end_px);
        if start.abs() >= end.abs() { start } else { end }
    }
}

pub(super) fn numeric(text: &TextPrimitive) -> Option<f64> {
    parse_value(&text.text)
}

/// Vertical center of an unrotated text box.
pub(super) fn center_y(text: &TextPrimitive) -> f64 {
    text.y + text.font_size_px / 2.0
}

/// Rounds away float noise picked up by the fit.
pub(super) fn clean(value: f64) -> f64 {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::PixelFit;

    #[test]
    fn fit_inverts_a_linear_axis() {
        let fit = PixelFit::from_ticks(&[(300.0, 0.0), (250.0, 10.0), (200.0, 20.0)]).expect("fit");
        assert!((fit.value_at(150.0) - 30.0).abs() < 1e-9);
        assert!((fit.span_value(300.0, 225.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn single_tick_cannot_fit() {
        assert!(PixelFit::from_ticks(&[(10.0, 1.0)]).is_none());
        assert!(PixelFit::from_ticks(&[(10.0, 1.0), (10.0, 2.0)]).is_none());
    }
}
