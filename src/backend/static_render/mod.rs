//! Static rendering backend.
//!
//! Lays a `ChartSpec` out into a retained `RenderFrame` plus the hit regions
//! needed to map pointer positions back to data elements. Layout is pure:
//! identical inputs produce identical frames, so any `Renderer` (Cairo, SVG,
//! the null renderer in tests) draws the same chart.

mod axis;
mod bar;
mod donut;
mod hit_test;
mod layout;
mod line;
mod overlay;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ChartSpec, ChartType, SeriesData, ThemeContext, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HitTest, InteractionState, TooltipModel};
use crate::render::{Color, RenderFrame, Renderer};

pub(crate) use donut::DONUT_START_ANGLE_DEG;
pub use hit_test::{HitRegion, HitShape, hit_test_regions};
pub use layout::PlotArea;
use layout::DIMMED_ALPHA;

/// Text drawn when there is nothing to plot.
pub const PLACEHOLDER_TEXT: &str = "No data to display";

fn default_donut_hole_ratio() -> f64 {
    0.65
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticRenderOptions {
    /// Inner radius as a fraction of the outer radius, within `0.6..=0.7`.
    #[serde(default = "default_donut_hole_ratio")]
    pub donut_hole_ratio: f64,
    #[serde(default = "default_true")]
    pub show_donut_total: bool,
    #[serde(default = "default_true")]
    pub show_value_labels: bool,
}

impl Default for StaticRenderOptions {
    fn default() -> Self {
        Self {
            donut_hole_ratio: default_donut_hole_ratio(),
            show_donut_total: true,
            show_value_labels: true,
        }
    }
}

impl StaticRenderOptions {
    pub fn validate(&self) -> ChartResult<()> {
        if !(0.6..=0.7).contains(&self.donut_hole_ratio) {
            return Err(ChartError::InvalidData(format!(
                "donut hole ratio must be within 0.6..=0.7, got {}",
                self.donut_hole_ratio
            )));
        }
        Ok(())
    }
}

/// One laid-out static chart: the drawable frame and its hit regions.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticRender {
    frame: RenderFrame,
    regions: Vec<HitRegion>,
    plot: Option<PlotArea>,
}

impl StaticRender {
    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    #[must_use]
    pub fn into_frame(self) -> RenderFrame {
        self.frame
    }

    #[must_use]
    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    /// Plot rectangle, absent when the placeholder was drawn.
    #[must_use]
    pub fn plot(&self) -> Option<PlotArea> {
        self.plot
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.plot.is_none()
    }

    /// Tooltip anchor for the element with `original_index`.
    #[must_use]
    pub fn anchor_for(&self, original_index: usize) -> Option<(f64, f64)> {
        self.regions
            .iter()
            .find(|region| region.original_index == original_index)
            .map(HitRegion::anchor)
    }

    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) -> ChartResult<()> {
        renderer.render(&self.frame)
    }
}

impl HitTest for StaticRender {
    fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        hit_test_regions(&self.regions, x, y)
    }
}

/// Builds static chart frames for every `ChartType`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticBackend {
    options: StaticRenderOptions,
}

impl StaticBackend {
    #[must_use]
    pub fn new(options: StaticRenderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &StaticRenderOptions {
        &self.options
    }

    /// Lays out `spec` for `viewport`. Never fails: empty or fully hidden data
    /// yields the placeholder frame.
    #[must_use]
    pub fn render(
        &self,
        spec: &ChartSpec,
        theme: &ThemeContext,
        state: &InteractionState,
        viewport: Viewport,
    ) -> StaticRender {
        self.render_with_slots(spec, theme, state, viewport, &[])
    }

    /// Like `render`, with bar categories drawn at fractional display slots.
    ///
    /// `slots` maps original index to slot position and is used while a sort
    /// transition is in flight. Categories missing from `slots` keep their
    /// resolved position.
    #[must_use]
    pub fn render_with_slots(
        &self,
        spec: &ChartSpec,
        theme: &ThemeContext,
        state: &InteractionState,
        viewport: Viewport,
        slots: &[(usize, f64)],
    ) -> StaticRender {
        let spec = if has_non_finite_values(spec) {
            Cow::Owned(spec.clone().sanitized())
        } else {
            Cow::Borrowed(spec)
        };
        let viewport = Viewport::new(viewport.width.max(1), viewport.height.max(1));
        let mut frame = RenderFrame::new(viewport);
        let content_top = layout::push_header(&mut frame, &spec, theme);
        let ctx = BuildContext {
            spec: &spec,
            theme,
            state,
            options: &self.options,
            slots,
        };

        let built = match spec.chart_type {
            ChartType::Bar => bar::build_vertical(&ctx, &mut frame, content_top),
            ChartType::HorizontalBar => bar::build_horizontal(&ctx, &mut frame, content_top),
            ChartType::Donut => donut::build(&ctx, &mut frame, content_top),
            ChartType::Line => line::build(&ctx, &mut frame, content_top, false),
            ChartType::Area => line::build(&ctx, &mut frame, content_top, true),
        };

        let Some(BuiltChart { plot, regions }) = built else {
            layout::push_placeholder(&mut frame, theme, content_top);
            debug!(chart_type = spec.chart_type.as_str(), "rendered no-data placeholder");
            return StaticRender {
                frame,
                regions: Vec::new(),
                plot: None,
            };
        };

        let mut render = StaticRender {
            frame,
            regions,
            plot: Some(plot),
        };
        if let Some(index) = state.hover_index() {
            let tooltip = TooltipModel::for_index(&spec, state, index);
            if let (Some(tooltip), Some(anchor)) = (tooltip, render.anchor_for(index)) {
                overlay::push_tooltip(&mut render.frame, theme, &tooltip, anchor);
            }
        }
        debug!(
            chart_type = spec.chart_type.as_str(),
            primitives = render.frame.primitive_count(),
            regions = render.regions.len(),
            "static frame built"
        );
        render
    }
}

pub(super) struct BuildContext<'a> {
    spec: &'a ChartSpec,
    theme: &'a ThemeContext,
    state: &'a InteractionState,
    options: &'a StaticRenderOptions,
    slots: &'a [(usize, f64)],
}

impl BuildContext<'_> {
    fn slot_for(&self, original_index: usize, position: usize) -> f64 {
        self.slots
            .iter()
            .find(|(index, _)| *index == original_index)
            .map_or(position as f64, |(_, slot)| *slot)
    }
}

pub(super) struct BuiltChart {
    plot: PlotArea,
    regions: Vec<HitRegion>,
}

/// Palette color for an element, dimmed while another element is hovered.
fn element_color(theme: &ThemeContext, original_index: usize, hover: Option<usize>) -> Color {
    let color = theme.color_for_index(original_index);
    match hover {
        Some(hovered) if hovered != original_index => color.with_alpha(color.alpha * DIMMED_ALPHA),
        _ => color,
    }
}

fn has_non_finite_values(spec: &ChartSpec) -> bool {
    match &spec.series {
        SeriesData::Categories(categories) => categories.iter().any(|category| !category.value.is_finite()),
        SeriesData::Multi(series) => series
            .iter()
            .any(|named| named.points.is_empty() || named.points.iter().any(|point| !point.is_finite())),
    }
}

#[cfg(test)]
mod tests {
    use super::{PLACEHOLDER_TEXT, StaticBackend};
    use crate::core::{ChartSpec, ChartType, ThemeContext, Viewport};
    use crate::interaction::{HitTest, InteractionState};

    #[test]
    fn empty_spec_renders_placeholder_without_regions() {
        let render = StaticBackend::default().render(
            &ChartSpec::empty(ChartType::Bar),
            &ThemeContext::light(),
            &InteractionState::default(),
            Viewport::new(320, 200),
        );
        assert!(render.is_placeholder());
        assert!(render.frame().texts.iter().any(|text| text.text == PLACEHOLDER_TEXT));
        assert_eq!(render.hit_test(160.0, 100.0), None);
    }

    #[test]
    fn bar_hit_test_maps_to_original_index() {
        let spec = ChartSpec::categories(ChartType::Bar, &["A", "B", "C"], &[10.0, 30.0, 20.0]);
        let render = StaticBackend::default().render(
            &spec,
            &ThemeContext::light(),
            &InteractionState::default(),
            Viewport::new(600, 400),
        );
        for (index, rect) in render.frame().rects.iter().enumerate() {
            let center = (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
            assert_eq!(render.hit_test(center.0, center.1), Some(index));
        }
    }
}
