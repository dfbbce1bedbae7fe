use std::fmt::Write as _;

use crate::render::{Color, RenderFrame, TextHAlign, WedgePrimitive};

/// Serializes a retained frame as a standalone SVG document.
///
/// Draw order matches the raster backend so both exports look alike.
#[must_use]
pub fn frame_to_svg(frame: &RenderFrame, background: Color, font_family: &str) -> String {
    let width = frame.viewport.width;
    let height = frame.viewport.height;
    let font_family = escape_text(font_family);
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width}' height='{height}' viewBox='0 0 {width} {height}' role='img'>"
    );
    let _ = writeln!(
        svg,
        "  <rect width='{width}' height='{height}' fill='{}'/>",
        background.to_css()
    );

    for rect in &frame.rects {
        let stroke = if rect.border_width > 0.0 {
            format!(
                " stroke='{}' stroke-width='{:.2}'",
                rect.border_color.to_css(),
                rect.border_width
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            svg,
            "  <rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' rx='{:.2}' fill='{}'{stroke}/>",
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            rect.corner_radius,
            rect.fill_color.to_css()
        );
    }

    for wedge in &frame.wedges {
        let _ = writeln!(
            svg,
            "  <path d='{}' fill='{}'/>",
            wedge_path(*wedge),
            wedge.fill_color.to_css()
        );
    }

    for polyline in &frame.polylines {
        let Some(first) = polyline.points.first() else {
            continue;
        };
        let points = polyline
            .points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(fill) = polyline.fill {
            let last = polyline.points.last().unwrap_or(first);
            let _ = writeln!(
                svg,
                "  <polygon points='{:.2},{:.2} {points} {:.2},{:.2}' fill='{}' stroke='none'/>",
                first.0,
                polyline.baseline_y,
                last.0,
                polyline.baseline_y,
                fill.to_css()
            );
        }
        let _ = writeln!(
            svg,
            "  <polyline points='{points}' fill='none' stroke='{}' stroke-width='{:.2}' stroke-linejoin='round'/>",
            polyline.color.to_css(),
            polyline.stroke_width
        );
    }

    for line in &frame.lines {
        let _ = writeln!(
            svg,
            "  <line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' stroke='{}' stroke-width='{:.2}'/>",
            line.x1,
            line.y1,
            line.x2,
            line.y2,
            line.color.to_css(),
            line.stroke_width
        );
    }

    for text in &frame.texts {
        let anchor = match text.h_align {
            TextHAlign::Left => "start",
            TextHAlign::Center => "middle",
            TextHAlign::Right => "end",
        };
        let transform = if text.rotation_deg != 0.0 {
            format!(
                " transform='rotate({:.2} {:.2} {:.2})'",
                text.rotation_deg, text.x, text.y
            )
        } else {
            String::new()
        };
        let _ = writeln!(
            svg,
            "  <text x='{:.2}' y='{:.2}' fill='{}' font-family='{font_family}' font-size='{:.1}' text-anchor='{anchor}' dominant-baseline='text-before-edge'{transform}>{}</text>",
            text.x,
            text.y,
            text.color.to_css(),
            text.font_size_px,
            escape_text(&text.text)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn wedge_path(wedge: WedgePrimitive) -> String {
    // A full ring cannot be expressed with one arc; split it in two halves.
    let sweep = wedge.sweep_deg.min(359.999);
    let start = wedge.start_angle_deg.to_radians();
    let end = (wedge.start_angle_deg + sweep).to_radians();
    let large_arc = u8::from(sweep > 180.0);
    let point = |radius: f64, angle: f64| {
        (
            wedge.center_x + radius * angle.cos(),
            wedge.center_y + radius * angle.sin(),
        )
    };
    let (ox1, oy1) = point(wedge.outer_radius, start);
    let (ox2, oy2) = point(wedge.outer_radius, end);
    let (ix2, iy2) = point(wedge.inner_radius, end);
    let (ix1, iy1) = point(wedge.inner_radius, start);
    let outer = wedge.outer_radius;
    let inner = wedge.inner_radius;
    format!(
        "M {ox1:.2} {oy1:.2} A {outer:.2} {outer:.2} 0 {large_arc} 1 {ox2:.2} {oy2:.2} L {ix2:.2} {iy2:.2} A {inner:.2} {inner:.2} 0 {large_arc} 0 {ix1:.2} {iy1:.2} Z"
    )
}

pub(crate) fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
