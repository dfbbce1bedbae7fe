use crate::core::format::{format_value_with_precision, precision_for_step};
use crate::core::scale::TickList;
use crate::core::{LinearScale, ThemeContext};
use crate::render::{LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::layout::{PlotArea, estimate_label_text_width_px};

const TARGET_TICK_COUNT: usize = 5;
const TICK_LABEL_GAP_PX: f64 = 6.0;

/// Value axis: domain, nice ticks and their label precision.
///
/// Built before the plot area is known so tick label widths can size margins;
/// `with_range` then binds it to pixels.
#[derive(Debug, Clone)]
pub(super) struct ValueAxis {
    scale: LinearScale,
    ticks: TickList,
    precision: u32,
}

impl ValueAxis {
    pub(super) fn for_values(values: impl IntoIterator<Item = f64>, headroom: f64) -> Self {
        let scale = LinearScale::for_values(values, headroom, 0.0, 1.0).unwrap_or(LinearScale::unit());
        let step = scale.tick_step(TARGET_TICK_COUNT);
        Self {
            scale,
            ticks: scale.ticks(TARGET_TICK_COUNT),
            precision: precision_for_step(step),
        }
    }

    pub(super) fn with_range(mut self, range_start: f64, range_end: f64) -> Self {
        self.scale = self.scale.with_range(range_start, range_end);
        self
    }

    pub(super) fn scale(&self) -> LinearScale {
        self.scale
    }

    /// Pixel position of zero, clamped into the domain.
    pub(super) fn zero_px(&self) -> f64 {
        let (start, end) = self.scale.domain();
        self.scale.domain_to_pixel(0.0_f64.clamp(start.min(end), start.max(end)))
    }

    fn labels(&self) -> impl Iterator<Item = (f64, String)> + '_ {
        self.ticks
            .iter()
            .map(|tick| (*tick, format_value_with_precision(*tick, self.precision)))
    }

    pub(super) fn widest_label_px(&self, font_size_px: f64) -> f64 {
        self.labels()
            .map(|(_, text)| estimate_label_text_width_px(&text, font_size_px))
            .fold(0.0, f64::max)
    }

    /// Ticks on the left edge with horizontal gridlines (vertical value axis).
    pub(super) fn push_left(&self, frame: &mut RenderFrame, theme: &ThemeContext, plot: PlotArea) {
        let tokens = theme.tokens();
        let font = theme.typography().tick_size_px;
        for (tick, text) in self.labels() {
            let y = self.scale.domain_to_pixel(tick);
            frame
                .lines
                .push(LinePrimitive::new(plot.left, y, plot.right, y, 1.0, tokens.grid));
            frame.texts.push(TextPrimitive::new(
                text,
                plot.left - TICK_LABEL_GAP_PX,
                y - font / 2.0,
                font,
                tokens.muted_text,
                TextHAlign::Right,
            ));
        }
        let zero = self.zero_px();
        frame
            .lines
            .push(LinePrimitive::new(plot.left, zero, plot.right, zero, 1.0, tokens.border));
    }

    /// Ticks along the bottom edge with vertical gridlines (horizontal value axis).
    pub(super) fn push_bottom(&self, frame: &mut RenderFrame, theme: &ThemeContext, plot: PlotArea) {
        let tokens = theme.tokens();
        let font = theme.typography().tick_size_px;
        for (tick, text) in self.labels() {
            let x = self.scale.domain_to_pixel(tick);
            frame
                .lines
                .push(LinePrimitive::new(x, plot.top, x, plot.bottom, 1.0, tokens.grid));
            frame.texts.push(TextPrimitive::new(
                text,
                x,
                plot.bottom + TICK_LABEL_GAP_PX,
                font,
                tokens.muted_text,
                TextHAlign::Center,
            ));
        }
        let zero = self.zero_px();
        frame
            .lines
            .push(LinePrimitive::new(zero, plot.top, zero, plot.bottom, 1.0, tokens.border));
    }
}

#[cfg(test)]
mod tests {
    use super::ValueAxis;

    #[test]
    fn axis_binds_domain_to_pixels_after_sizing() {
        let axis = ValueAxis::for_values([10.0, 30.0, 20.0], 1.15).with_range(300.0, 100.0);
        assert_eq!(axis.zero_px(), 300.0);
        assert_eq!(axis.ticks.as_slice(), &[0.0, 10.0, 20.0, 30.0]);
        assert!(axis.widest_label_px(10.0) > 0.0);
    }
}
