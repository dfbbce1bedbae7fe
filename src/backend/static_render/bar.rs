use crate::core::{VisibleItem, format_value, resolve_visible_items};
use crate::render::{RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::axis::ValueAxis;
use super::hit_test::{HitRegion, HitShape};
use super::layout::{
    BAR_FILL_RATIO, LabelMode, OUTER_PADDING_PX, PlotArea, category_label_band_px,
    estimate_label_text_width_px, push_category_label, resolve_label_mode, truncate_label,
};
use super::{BuildContext, BuiltChart, element_color};

const VALUE_HEADROOM: f64 = 1.15;
const MIN_HIT_EXTENT_PX: f64 = 4.0;
const VALUE_LABEL_GAP_PX: f64 = 3.0;

pub(super) fn build_vertical(
    ctx: &BuildContext<'_>,
    frame: &mut RenderFrame,
    content_top: f64,
) -> Option<BuiltChart> {
    let items = resolve_visible_items(ctx.spec, ctx.state);
    if items.is_empty() {
        return None;
    }
    let typography = ctx.theme.typography();
    let viewport = frame.viewport;
    let axis = ValueAxis::for_values(items.iter().map(|item| item.value), VALUE_HEADROOM);

    let left = OUTER_PADDING_PX + axis.widest_label_px(typography.tick_size_px) + 8.0;
    let right = viewport.width_f64() - OUTER_PADDING_PX;
    let slot_width = (right - left).max(1.0) / items.len() as f64;
    let max_rotated_extent = (viewport.height_f64() * 0.3).max(24.0);
    let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
    let mode = resolve_label_mode(
        &labels,
        slot_width,
        typography.label_size_px,
        max_rotated_extent,
    );
    let bottom = viewport.height_f64()
        - OUTER_PADDING_PX * 0.5
        - category_label_band_px(mode, typography.label_size_px, max_rotated_extent);
    let top = content_top + typography.label_size_px + VALUE_LABEL_GAP_PX * 2.0;
    let plot = PlotArea::new(left, top, right, bottom);

    let axis = axis.with_range(plot.bottom, plot.top);
    axis.push_left(frame, ctx.theme, plot);
    let zero = axis.zero_px();

    let mut regions = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let slot = ctx.slot_for(item.original_index, position);
        let x = plot.left + slot_width * (slot + (1.0 - BAR_FILL_RATIO) / 2.0);
        let width = slot_width * BAR_FILL_RATIO;
        let value_px = axis.scale().domain_to_pixel(item.value);
        let y = value_px.min(zero);
        let height = (value_px - zero).abs();
        let color = element_color(ctx.theme, item.original_index, ctx.state.hover_index());
        frame
            .rects
            .push(RectPrimitive::new(x, y, width, height, color).with_corner_radius(2.0));

        let hit_height = height.max(MIN_HIT_EXTENT_PX);
        let hit_y = if item.value >= 0.0 { zero - hit_height } else { zero };
        regions.push(HitRegion::new(
            item.original_index,
            HitShape::Rect {
                x,
                y: hit_y,
                width,
                height: hit_height,
            },
        ));

        let center_x = x + width / 2.0;
        if ctx.options.show_value_labels {
            let font = typography.label_size_px;
            let label_y = if item.value >= 0.0 {
                y - font - VALUE_LABEL_GAP_PX
            } else {
                y + height + VALUE_LABEL_GAP_PX
            };
            frame.texts.push(TextPrimitive::new(
                format_value(item.value),
                center_x,
                label_y,
                font,
                ctx.theme.tokens().text,
                TextHAlign::Center,
            ));
        }
        push_category_label(
            frame,
            ctx.theme,
            mode,
            position,
            &item.label,
            center_x,
            plot.bottom + 6.0,
        );
    }

    Some(BuiltChart { plot, regions })
}

pub(super) fn build_horizontal(
    ctx: &BuildContext<'_>,
    frame: &mut RenderFrame,
    content_top: f64,
) -> Option<BuiltChart> {
    let items = resolve_visible_items(ctx.spec, ctx.state);
    if items.is_empty() {
        return None;
    }
    let typography = ctx.theme.typography();
    let label_font = typography.label_size_px;
    let viewport = frame.viewport;
    let axis = ValueAxis::for_values(items.iter().map(|item| item.value), VALUE_HEADROOM);

    let label_band = widest_label(&items, label_font).min(viewport.width_f64() * 0.3);
    let value_band = if ctx.options.show_value_labels {
        items
            .iter()
            .map(|item| estimate_label_text_width_px(&format_value(item.value), label_font))
            .fold(0.0, f64::max)
            + 8.0
    } else {
        0.0
    };
    let left = OUTER_PADDING_PX + label_band + 8.0;
    let right = viewport.width_f64() - OUTER_PADDING_PX - value_band;
    let bottom = viewport.height_f64() - OUTER_PADDING_PX * 0.5 - (typography.tick_size_px + 12.0);
    let plot = PlotArea::new(left, content_top, right, bottom);

    let axis = axis.with_range(plot.left, plot.right);
    axis.push_bottom(frame, ctx.theme, plot);
    let zero = axis.zero_px();

    let slot_height = plot.height() / items.len() as f64;
    let label_mode = if slot_height >= label_font * 1.1 {
        LabelMode::Horizontal
    } else {
        LabelMode::Thinned {
            every: ((label_font * 1.1) / slot_height.max(0.5)).ceil() as usize,
        }
    };
    let max_chars = ((label_band / (label_font * 0.6)).floor() as usize).max(3);

    let mut regions = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let slot = ctx.slot_for(item.original_index, position);
        let y = plot.top + slot_height * (slot + (1.0 - BAR_FILL_RATIO) / 2.0);
        let height = slot_height * BAR_FILL_RATIO;
        let value_px = axis.scale().domain_to_pixel(item.value);
        let x = value_px.min(zero);
        let width = (value_px - zero).abs();
        let color = element_color(ctx.theme, item.original_index, ctx.state.hover_index());
        frame
            .rects
            .push(RectPrimitive::new(x, y, width, height, color).with_corner_radius(2.0));

        let hit_width = width.max(MIN_HIT_EXTENT_PX);
        let hit_x = if item.value >= 0.0 { zero } else { zero - hit_width };
        regions.push(HitRegion::new(
            item.original_index,
            HitShape::Rect {
                x: hit_x,
                y,
                width: hit_width,
                height,
            },
        ));

        let center_y = y + height / 2.0;
        if ctx.options.show_value_labels {
            let (label_x, align) = if item.value >= 0.0 {
                (x + width + 4.0, TextHAlign::Left)
            } else {
                (x - 4.0, TextHAlign::Right)
            };
            frame.texts.push(TextPrimitive::new(
                format_value(item.value),
                label_x,
                center_y - label_font / 2.0,
                label_font,
                ctx.theme.tokens().text,
                align,
            ));
        }
        if label_mode.shows(position) && !item.label.is_empty() {
            frame.texts.push(TextPrimitive::new(
                truncate_label(&item.label, max_chars),
                plot.left - 8.0,
                center_y - label_font / 2.0,
                label_font,
                ctx.theme.tokens().text,
                TextHAlign::Right,
            ));
        }
    }

    Some(BuiltChart { plot, regions })
}

fn widest_label(items: &[VisibleItem], font_size_px: f64) -> f64 {
    items
        .iter()
        .map(|item| estimate_label_text_width_px(&item.label, font_size_px))
        .fold(0.0, f64::max)
}
