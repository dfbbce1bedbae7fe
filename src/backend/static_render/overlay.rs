use crate::core::ThemeContext;
use crate::interaction::TooltipModel;
use crate::render::{RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::layout::estimate_label_text_width_px;

const TOOLTIP_PADDING_PX: f64 = 8.0;
const TOOLTIP_OFFSET_PX: f64 = 12.0;
const LINE_GAP_PX: f64 = 4.0;

/// Draws the hover tooltip near `anchor`, kept inside the viewport.
pub(super) fn push_tooltip(
    frame: &mut RenderFrame,
    theme: &ThemeContext,
    tooltip: &TooltipModel,
    anchor: (f64, f64),
) {
    let font = theme.typography().label_size_px;
    let tokens = theme.tokens();
    let lines = tooltip.lines();
    let width = lines
        .iter()
        .map(|line| estimate_label_text_width_px(line, font))
        .fold(0.0, f64::max)
        + TOOLTIP_PADDING_PX * 2.0;
    let height = lines.len() as f64 * (font + LINE_GAP_PX) - LINE_GAP_PX + TOOLTIP_PADDING_PX * 2.0;

    let viewport = frame.viewport;
    let mut x = anchor.0 + TOOLTIP_OFFSET_PX;
    if x + width > viewport.width_f64() {
        x = anchor.0 - TOOLTIP_OFFSET_PX - width;
    }
    let x = x.clamp(0.0, (viewport.width_f64() - width).max(0.0));
    let y = (anchor.1 - height - TOOLTIP_OFFSET_PX).clamp(0.0, (viewport.height_f64() - height).max(0.0));

    frame.rects.push(
        RectPrimitive::new(x, y, width, height, tokens.tooltip_background)
            .with_border(1.0, tokens.border)
            .with_corner_radius(4.0),
    );
    for (row, line) in lines.into_iter().enumerate() {
        let color = if row == 0 { tokens.text } else { tokens.muted_text };
        frame.texts.push(TextPrimitive::new(
            line,
            x + TOOLTIP_PADDING_PX,
            y + TOOLTIP_PADDING_PX + row as f64 * (font + LINE_GAP_PX),
            font,
            color,
            TextHAlign::Left,
        ));
    }
}
