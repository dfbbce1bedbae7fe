use crate::core::{NamedSeries, SeriesData, format_value, resolve_visible_items, resolve_visible_series};
use crate::render::{Color, PolylinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::axis::ValueAxis;
use super::hit_test::{HitRegion, HitShape};
use super::layout::{
    LabelMode, OUTER_PADDING_PX, PlotArea, category_label_band_px, estimate_label_text_width_px,
    push_category_label, resolve_label_mode,
};
use super::{BuildContext, BuiltChart, DIMMED_ALPHA};

const VALUE_HEADROOM: f64 = 1.1;
const STROKE_WIDTH_PX: f64 = 2.0;
const HOVER_STROKE_WIDTH_PX: f64 = 3.0;
const AREA_FILL_ALPHA: f64 = 0.25;
const POINT_HIT_RADIUS_PX: f64 = 8.0;
const MARKER_SIZE_PX: f64 = 8.0;
const LEGEND_SWATCH_PX: f64 = 10.0;

struct LineLayout {
    plot: PlotArea,
    axis: ValueAxis,
    slot_width: f64,
    label_mode: LabelMode,
}

impl LineLayout {
    fn x_at(&self, position: usize) -> f64 {
        self.plot.left + self.slot_width * (position as f64 + 0.5)
    }

    fn y_at(&self, value: f64) -> f64 {
        self.axis.scale().domain_to_pixel(value)
    }
}

pub(super) fn build(
    ctx: &BuildContext<'_>,
    frame: &mut RenderFrame,
    content_top: f64,
    filled: bool,
) -> Option<BuiltChart> {
    match &ctx.spec.series {
        SeriesData::Categories(_) => build_single(ctx, frame, content_top, filled),
        SeriesData::Multi(_) => build_multi(ctx, frame, content_top, filled),
    }
}

/// Category data: one unnamed line, one hit column per category.
fn build_single(
    ctx: &BuildContext<'_>,
    frame: &mut RenderFrame,
    content_top: f64,
    filled: bool,
) -> Option<BuiltChart> {
    let items = resolve_visible_items(ctx.spec, ctx.state);
    if items.is_empty() {
        return None;
    }
    let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
    let layout = layout(
        ctx,
        frame,
        content_top,
        &labels,
        items.iter().map(|item| item.value),
    );

    let color = ctx.theme.color_for_index(0);
    let points: Vec<(f64, f64)> = items
        .iter()
        .enumerate()
        .map(|(position, item)| (layout.x_at(position), layout.y_at(item.value)))
        .collect();
    frame.polylines.push(series_polyline(
        points.clone(),
        color,
        STROKE_WIDTH_PX,
        filled,
        layout.axis.zero_px(),
    ));

    let hover = ctx.state.hover_index();
    let mut regions = Vec::with_capacity(items.len());
    for (position, (item, (x, y))) in items.iter().zip(points).enumerate() {
        regions.push(HitRegion::new(
            item.original_index,
            HitShape::Rect {
                x: x - layout.slot_width / 2.0,
                y: layout.plot.top,
                width: layout.slot_width,
                height: layout.plot.height(),
            },
        ));
        if hover == Some(item.original_index) {
            push_marker(ctx, frame, x, y, color);
        }
        push_category_label(
            frame,
            ctx.theme,
            layout.label_mode,
            position,
            &item.label,
            x,
            layout.plot.bottom + 6.0,
        );
    }

    Some(BuiltChart {
        plot: layout.plot,
        regions,
    })
}

/// Named series: one labeled line each, points hit-test to their series.
fn build_multi(
    ctx: &BuildContext<'_>,
    frame: &mut RenderFrame,
    content_top: f64,
    filled: bool,
) -> Option<BuiltChart> {
    let series = resolve_visible_series(ctx.spec, ctx.state);
    if series.is_empty() {
        return None;
    }
    let content_top = push_legend(ctx, frame, content_top, &series);

    let longest = series
        .iter()
        .map(|(_, named)| named)
        .max_by_key(|named| named.points.len())?;
    let x_labels: Vec<String> = longest.points.iter().map(|point| format_value(point.x)).collect();
    let layout = layout(
        ctx,
        frame,
        content_top,
        &x_labels,
        series
            .iter()
            .flat_map(|(_, named)| named.points.iter().map(|point| point.y)),
    );

    let hover = ctx.state.hover_index();
    let mut regions = Vec::new();
    for (original_index, named) in &series {
        let base = ctx.theme.color_for_index(*original_index);
        let (color, stroke) = match hover {
            Some(hovered) if hovered == *original_index => (base, HOVER_STROKE_WIDTH_PX),
            Some(_) => (base.with_alpha(base.alpha * DIMMED_ALPHA), STROKE_WIDTH_PX),
            None => (base, STROKE_WIDTH_PX),
        };
        let points: Vec<(f64, f64)> = named
            .points
            .iter()
            .enumerate()
            .map(|(position, point)| (layout.x_at(position), layout.y_at(point.y)))
            .collect();
        regions.extend(points.iter().map(|(x, y)| {
            HitRegion::new(
                *original_index,
                HitShape::Point {
                    x: *x,
                    y: *y,
                    radius: POINT_HIT_RADIUS_PX,
                },
            )
        }));
        frame.polylines.push(
            series_polyline(points, color, stroke, filled, layout.axis.zero_px())
                .with_label(named.name.clone()),
        );
    }
    for (position, label) in x_labels.iter().enumerate() {
        push_category_label(
            frame,
            ctx.theme,
            layout.label_mode,
            position,
            label,
            layout.x_at(position),
            layout.plot.bottom + 6.0,
        );
    }

    Some(BuiltChart {
        plot: layout.plot,
        regions,
    })
}

fn layout<S: AsRef<str>>(
    ctx: &BuildContext<'_>,
    frame: &mut RenderFrame,
    content_top: f64,
    x_labels: &[S],
    values: impl IntoIterator<Item = f64>,
) -> LineLayout {
    let typography = ctx.theme.typography();
    let viewport = frame.viewport;
    let axis = ValueAxis::for_values(values, VALUE_HEADROOM);
    let left = OUTER_PADDING_PX + axis.widest_label_px(typography.tick_size_px) + 8.0;
    let right = viewport.width_f64() - OUTER_PADDING_PX;
    let slot_width = (right - left).max(1.0) / x_labels.len().max(1) as f64;
    let max_rotated_extent = (viewport.height_f64() * 0.3).max(24.0);
    let label_mode = resolve_label_mode(
        x_labels,
        slot_width,
        typography.label_size_px,
        max_rotated_extent,
    );
    let bottom = viewport.height_f64()
        - OUTER_PADDING_PX * 0.5
        - category_label_band_px(label_mode, typography.label_size_px, max_rotated_extent);
    let plot = PlotArea::new(left, content_top, right, bottom);
    let axis = axis.with_range(plot.bottom, plot.top);
    axis.push_left(frame, ctx.theme, plot);
    LineLayout {
        plot,
        axis,
        slot_width,
        label_mode,
    }
}

fn series_polyline(
    points: Vec<(f64, f64)>,
    color: Color,
    stroke_width: f64,
    filled: bool,
    baseline_y: f64,
) -> PolylinePrimitive {
    let polyline = PolylinePrimitive::new(points, stroke_width, color);
    if filled {
        polyline.with_fill(color.with_alpha(color.alpha * AREA_FILL_ALPHA), baseline_y)
    } else {
        polyline
    }
}

fn push_marker(ctx: &BuildContext<'_>, frame: &mut RenderFrame, x: f64, y: f64, color: Color) {
    let half = MARKER_SIZE_PX / 2.0;
    frame.rects.push(
        RectPrimitive::new(x - half, y - half, MARKER_SIZE_PX, MARKER_SIZE_PX, color)
            .with_border(2.0, ctx.theme.tokens().background)
            .with_corner_radius(half),
    );
}

/// One legend row under the header; returns the new content top.
fn push_legend(
    ctx: &BuildContext<'_>,
    frame: &mut RenderFrame,
    content_top: f64,
    series: &[(usize, NamedSeries)],
) -> f64 {
    let font = ctx.theme.typography().label_size_px;
    let mut x = OUTER_PADDING_PX;
    for (original_index, named) in series {
        frame.rects.push(
            RectPrimitive::new(
                x,
                content_top + (font - LEGEND_SWATCH_PX) / 2.0,
                LEGEND_SWATCH_PX,
                LEGEND_SWATCH_PX,
                ctx.theme.color_for_index(*original_index),
            )
            .with_border(1.0, ctx.theme.tokens().border),
        );
        x += LEGEND_SWATCH_PX + 4.0;
        frame.texts.push(TextPrimitive::new(
            named.name.clone(),
            x,
            content_top,
            font,
            ctx.theme.tokens().text,
            TextHAlign::Left,
        ));
        x += estimate_label_text_width_px(&named.name, font) + 12.0;
    }
    content_top + font + 10.0
}
