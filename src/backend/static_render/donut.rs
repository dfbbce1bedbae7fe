use crate::core::{format_value, resolve_visible_items};
use crate::render::{RenderFrame, TextHAlign, TextPrimitive, WedgePrimitive};

use super::hit_test::{HitRegion, HitShape};
use super::layout::{OUTER_PADDING_PX, PlotArea, truncate_label};
use super::{BuildContext, BuiltChart, element_color};

/// Donuts start at twelve o'clock and run clockwise.
pub(crate) const DONUT_START_ANGLE_DEG: f64 = -90.0;
const HOVER_POP_PX: f64 = 4.0;
const LABEL_OFFSET_PX: f64 = 10.0;
const MIN_OUTER_RADIUS_PX: f64 = 8.0;
/// Shares below this many degrees do not get an outside label.
const MIN_LABELED_SWEEP_DEG: f64 = 6.0;

pub(super) fn build(
    ctx: &BuildContext<'_>,
    frame: &mut RenderFrame,
    content_top: f64,
) -> Option<BuiltChart> {
    // Visible donut items are already restricted to positive values; their
    // percents drive both the wedge sweeps and the tooltip shares.
    let items = resolve_visible_items(ctx.spec, ctx.state);
    let share_sum: f64 = items.iter().map(|item| item.percent).sum();
    if items.is_empty() || share_sum <= 0.0 {
        return None;
    }
    let total: f64 = items.iter().map(|item| item.value).sum();

    let typography = ctx.theme.typography();
    let label_font = typography.label_size_px;
    let viewport = frame.viewport;
    let plot = PlotArea::new(
        OUTER_PADDING_PX,
        content_top,
        viewport.width_f64() - OUTER_PADDING_PX,
        viewport.height_f64() - OUTER_PADDING_PX,
    );
    let (center_x, center_y) = plot.center();
    let label_room = LABEL_OFFSET_PX + label_font * 1.5;
    let outer_radius = (plot.width().min(plot.height()) / 2.0 - label_room).max(MIN_OUTER_RADIUS_PX);
    let inner_radius = outer_radius * ctx.options.donut_hole_ratio;
    let hover = ctx.state.hover_index();
    let max_label_chars = ((plot.width() / 2.0 - outer_radius - LABEL_OFFSET_PX) / (label_font * 0.6))
        .floor()
        .max(4.0) as usize;

    let mut regions = Vec::with_capacity(items.len());
    let mut start = DONUT_START_ANGLE_DEG;
    for item in &items {
        let sweep = item.percent / share_sum * 360.0;
        let popped = hover == Some(item.original_index);
        let wedge = WedgePrimitive {
            center_x,
            center_y,
            inner_radius,
            outer_radius: if popped {
                outer_radius + HOVER_POP_PX
            } else {
                outer_radius
            },
            start_angle_deg: start,
            sweep_deg: sweep,
            fill_color: element_color(ctx.theme, item.original_index, hover),
        };
        frame.wedges.push(wedge);
        regions.push(HitRegion::new(
            item.original_index,
            HitShape::Wedge {
                center_x,
                center_y,
                inner_radius,
                outer_radius: wedge.outer_radius,
                start_angle_deg: start,
                sweep_deg: sweep,
            },
        ));

        if sweep >= MIN_LABELED_SWEEP_DEG && !item.label.is_empty() {
            let (x, y) = wedge.point_on_bisector(outer_radius + LABEL_OFFSET_PX);
            let cos = wedge.mid_angle_deg().to_radians().cos();
            let align = if cos > 0.1 {
                TextHAlign::Left
            } else if cos < -0.1 {
                TextHAlign::Right
            } else {
                TextHAlign::Center
            };
            frame.texts.push(TextPrimitive::new(
                truncate_label(&item.label, max_label_chars),
                x,
                y - label_font / 2.0,
                label_font,
                ctx.theme.tokens().text,
                align,
            ));
        }
        start += sweep;
    }

    if ctx.options.show_donut_total {
        let total_font = typography.title_size_px;
        frame.texts.push(TextPrimitive::new(
            format_value(total),
            center_x,
            center_y - total_font * 0.75,
            total_font,
            ctx.theme.tokens().text,
            TextHAlign::Center,
        ));
        frame.texts.push(TextPrimitive::new(
            "Total",
            center_x,
            center_y + total_font * 0.35,
            typography.tick_size_px,
            ctx.theme.tokens().muted_text,
            TextHAlign::Center,
        ));
    }

    Some(BuiltChart { plot, regions })
}
