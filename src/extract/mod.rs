//! Chart data extraction from retained static frames.
//!
//! Reconstructs a `ChartSpec` by classifying the primitives the static
//! backend drew. The heuristics follow that backend's drawing conventions
//! (bar geometry, tick label placement, donut start angle) and are kept
//! behind [`extract_chart`] so nothing else depends on them.

mod ticks;

use tracing::debug;

use crate::backend::static_render::DONUT_START_ANGLE_DEG;
use crate::core::{
    CategoryValue, ChartSpec, ChartType, DataPoint, NamedSeries, SeriesData, parse_value,
};
use crate::render::{PolylinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, WedgePrimitive};

use ticks::{PixelFit, center_y, clean, numeric};

const EDGE_EPSILON_PX: f64 = 0.5;
const UNNAMED_SERIES: &str = "Series";

/// Result of extraction: a reconstructed spec, or a best-effort unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedChart {
    Known(ChartSpec),
    /// No recognizable data primitives. Carries whatever text was found.
    Unknown { title: String, texts: Vec<String> },
}

impl ExtractedChart {
    #[must_use]
    pub fn spec(&self) -> Option<&ChartSpec> {
        match self {
            Self::Known(spec) => Some(spec),
            Self::Unknown { .. } => None,
        }
    }

    #[must_use]
    pub fn into_spec(self) -> Option<ChartSpec> {
        match self {
            Self::Known(spec) => Some(spec),
            Self::Unknown { .. } => None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown { .. })
    }

    #[must_use]
    pub fn chart_type(&self) -> Option<ChartType> {
        self.spec().map(|spec| spec.chart_type)
    }
}

/// Classifies `frame` and rebuilds its data. Never fails.
///
/// Priority: wedges (donut), then polylines (line/area), then borderless
/// rectangles (bar/horizontal bar).
#[must_use]
pub fn extract_chart(frame: &RenderFrame) -> ExtractedChart {
    let header = Header::find(frame);
    let series = if !frame.wedges.is_empty() {
        extract_donut(frame, &header)
    } else if !frame.polylines.is_empty() {
        extract_lines(frame, &header)
    } else {
        let bars: Vec<RectPrimitive> = frame
            .rects
            .iter()
            .copied()
            .filter(|rect| rect.border_width == 0.0)
            .collect();
        if bars.is_empty() {
            None
        } else {
            Some(extract_bars(frame, &header, &bars))
        }
    };

    match series {
        Some((chart_type, series)) if !series.is_empty() => {
            debug!(
                chart_type = chart_type.as_str(),
                elements = series.len(),
                "chart extracted from frame"
            );
            let spec = ChartSpec::new(chart_type, series)
                .with_title(header.title.unwrap_or_default())
                .with_subtitle(header.subtitle);
            ExtractedChart::Known(spec)
        }
        _ => {
            debug!(texts = frame.texts.len(), "frame not recognized, returning unknown chart");
            ExtractedChart::Unknown {
                title: header.title.unwrap_or_default(),
                texts: frame.texts.iter().map(|text| text.text.clone()).collect(),
            }
        }
    }
}

/// Title/subtitle: left-aligned unrotated texts sharing the leftmost
/// header x, above every data primitive.
struct Header {
    title: Option<String>,
    subtitle: Option<String>,
    consumed: Vec<usize>,
}

impl Header {
    fn find(frame: &RenderFrame) -> Self {
        let data_top = data_top(frame);
        let mut candidates: Vec<(usize, &TextPrimitive)> = frame
            .texts
            .iter()
            .enumerate()
            .filter(|(_, text)| {
                text.h_align == TextHAlign::Left
                    && text.rotation_deg == 0.0
                    && text.y + text.font_size_px <= data_top
            })
            .collect();
        candidates.sort_by(|(_, left), (_, right)| left.y.total_cmp(&right.y));

        let Some((title_index, title)) = candidates.first().copied() else {
            return Self {
                title: None,
                subtitle: None,
                consumed: Vec::new(),
            };
        };
        let subtitle = candidates.iter().skip(1).copied().find(|(_, text)| {
            (text.x - title.x).abs() <= EDGE_EPSILON_PX && text.font_size_px < title.font_size_px
        });
        let mut consumed = vec![title_index];
        consumed.extend(subtitle.map(|(index, _)| index));
        Self {
            title: Some(title.text.clone()),
            subtitle: subtitle.map(|(_, text)| text.text.clone()),
            consumed,
        }
    }
}

fn data_top(frame: &RenderFrame) -> f64 {
    let rects = frame.rects.iter().map(|rect| rect.y);
    let wedges = frame
        .wedges
        .iter()
        .map(|wedge| wedge.center_y - wedge.outer_radius);
    let points = frame
        .polylines
        .iter()
        .flat_map(|polyline| polyline.points.iter().map(|(_, y)| *y));
    rects
        .chain(wedges)
        .chain(points)
        .fold(f64::INFINITY, f64::min)
}

fn extract_bars(
    frame: &RenderFrame,
    header: &Header,
    bars: &[RectPrimitive],
) -> (ChartType, SeriesData) {
    let horizontal = is_horizontal(frame, bars);
    let texts: Vec<&TextPrimitive> = frame
        .texts
        .iter()
        .enumerate()
        .filter(|(index, _)| !header.consumed.contains(index))
        .map(|(_, text)| text)
        .collect();
    let min_x = bars.iter().map(|bar| bar.x).fold(f64::INFINITY, f64::min);
    let max_bottom = bars.iter().map(|bar| bar.bottom()).fold(f64::NEG_INFINITY, f64::max);

    let (chart_type, fit) = if horizontal {
        // Value ticks sit centered under the plot.
        let ticks: Vec<(f64, f64)> = texts
            .iter()
            .filter(|text| text.h_align == TextHAlign::Center && text.y >= max_bottom)
            .filter_map(|text| numeric(text).map(|value| (text.x, value)))
            .collect();
        (ChartType::HorizontalBar, PixelFit::from_ticks(&ticks))
    } else {
        // Value ticks sit right-aligned left of the first bar.
        let ticks: Vec<(f64, f64)> = texts
            .iter()
            .filter(|text| text.h_align == TextHAlign::Right && text.rotation_deg == 0.0 && text.x < min_x)
            .filter_map(|text| numeric(text).map(|value| (center_y(text), value)))
            .collect();
        (ChartType::Bar, PixelFit::from_ticks(&ticks))
    };

    let categories = bars
        .iter()
        .enumerate()
        .map(|(position, bar)| {
            let value = match (fit, horizontal) {
                (Some(fit), true) => fit.span_value(bar.x, bar.right()),
                (Some(fit), false) => fit.span_value(bar.bottom(), bar.y),
                (None, true) => bar.width,
                (None, false) => bar.height,
            };
            let label = if horizontal {
                bar_label_horizontal(&texts, bar, min_x)
            } else {
                bar_label_vertical(&texts, bar, max_bottom)
            };
            CategoryValue::new(
                label.unwrap_or_else(|| generic_label(position)),
                clean(value),
            )
        })
        .collect();
    (chart_type, SeriesData::Categories(categories))
}

/// Bars sharing one width are vertical; bars sharing one height are
/// horizontal. Ties fall back to which side carries numeric ticks, then to
/// the element's own aspect ratio.
fn is_horizontal(frame: &RenderFrame, bars: &[RectPrimitive]) -> bool {
    let first = bars[0];
    let same_width = bars
        .iter()
        .filter(|bar| (bar.width - first.width).abs() <= EDGE_EPSILON_PX)
        .count();
    let same_height = bars
        .iter()
        .filter(|bar| (bar.height - first.height).abs() <= EDGE_EPSILON_PX)
        .count();
    if same_width != same_height {
        return same_height > same_width;
    }

    let numeric_aligned = |align: TextHAlign| {
        frame
            .texts
            .iter()
            .filter(|text| text.h_align == align && numeric(text).is_some())
            .count()
    };
    let left = numeric_aligned(TextHAlign::Left);
    let right = numeric_aligned(TextHAlign::Right);
    if left != right {
        return left > right;
    }
    first.height < first.width
}

fn bar_label_vertical(texts: &[&TextPrimitive], bar: &RectPrimitive, max_bottom: f64) -> Option<String> {
    let center = bar.x + bar.width / 2.0;
    let tolerance = bar.width / 2.0 / 0.7;
    texts
        .iter()
        .filter(|text| text.y >= max_bottom && (text.x - center).abs() <= tolerance)
        .min_by(|left, right| (left.x - center).abs().total_cmp(&(right.x - center).abs()))
        .map(|text| text.text.clone())
}

fn bar_label_horizontal(texts: &[&TextPrimitive], bar: &RectPrimitive, min_x: f64) -> Option<String> {
    let center = bar.y + bar.height / 2.0;
    let tolerance = bar.height / 2.0 / 0.7;
    texts
        .iter()
        .filter(|text| text.h_align == TextHAlign::Right && text.x <= min_x)
        .filter(|text| (center_y(text) - center).abs() <= tolerance)
        .min_by(|left, right| {
            (center_y(left) - center)
                .abs()
                .total_cmp(&(center_y(right) - center).abs())
        })
        .map(|text| text.text.clone())
}

fn extract_donut(frame: &RenderFrame, header: &Header) -> Option<(ChartType, SeriesData)> {
    let mut wedges: Vec<WedgePrimitive> = frame
        .wedges
        .iter()
        .copied()
        .filter(|wedge| wedge.sweep_deg > 0.0)
        .collect();
    if wedges.is_empty() {
        return None;
    }
    wedges.sort_by(|left, right| {
        angle_from_start(left.start_angle_deg).total_cmp(&angle_from_start(right.start_angle_deg))
    });

    let (center_x, center_y_px, inner_radius) = (wedges[0].center_x, wedges[0].center_y, wedges[0].inner_radius);
    let texts: Vec<(usize, &TextPrimitive)> = frame
        .texts
        .iter()
        .enumerate()
        .filter(|(index, _)| !header.consumed.contains(index))
        .collect();
    let inside_hole = |text: &TextPrimitive| {
        (text.x - center_x).hypot(center_y(text) - center_y_px) < inner_radius.max(1.0)
    };
    let total = texts
        .iter()
        .filter(|(_, text)| text.h_align == TextHAlign::Center && inside_hole(text))
        .find_map(|(_, text)| parse_value(&text.text));
    let scale = total.unwrap_or(100.0);

    let outside: Vec<&TextPrimitive> = texts
        .iter()
        .map(|(_, text)| *text)
        .filter(|text| !inside_hole(text))
        .collect();
    let categories = wedges
        .iter()
        .enumerate()
        .map(|(position, wedge)| {
            let anchor = wedge.point_on_bisector(wedge.outer_radius + 10.0);
            let label = outside
                .iter()
                .filter(|text| {
                    (text.x - anchor.0).hypot(center_y(text) - anchor.1) <= text.font_size_px * 2.0
                })
                .min_by(|left, right| {
                    let left_distance = (left.x - anchor.0).hypot(center_y(left) - anchor.1);
                    let right_distance = (right.x - anchor.0).hypot(center_y(right) - anchor.1);
                    left_distance.total_cmp(&right_distance)
                })
                .map(|text| text.text.clone());
            CategoryValue::new(
                label.unwrap_or_else(|| generic_label(position)),
                clean(wedge.sweep_deg / 360.0 * scale),
            )
        })
        .collect();
    Some((ChartType::Donut, SeriesData::Categories(categories)))
}

fn angle_from_start(angle_deg: f64) -> f64 {
    (angle_deg - DONUT_START_ANGLE_DEG).rem_euclid(360.0)
}

fn extract_lines(frame: &RenderFrame, header: &Header) -> Option<(ChartType, SeriesData)> {
    let polylines: Vec<&PolylinePrimitive> = frame
        .polylines
        .iter()
        .filter(|polyline| !polyline.points.is_empty())
        .collect();
    if polylines.is_empty() {
        return None;
    }
    let chart_type = if polylines.iter().any(|polyline| polyline.fill.is_some()) {
        ChartType::Area
    } else {
        ChartType::Line
    };

    let texts: Vec<&TextPrimitive> = frame
        .texts
        .iter()
        .enumerate()
        .filter(|(index, _)| !header.consumed.contains(index))
        .map(|(_, text)| text)
        .collect();
    let min_x = polylines
        .iter()
        .flat_map(|polyline| polyline.points.iter().map(|(x, _)| *x))
        .fold(f64::INFINITY, f64::min);
    let max_y = polylines
        .iter()
        .flat_map(|polyline| polyline.points.iter().map(|(_, y)| *y))
        .fold(f64::NEG_INFINITY, f64::max);
    let ticks: Vec<(f64, f64)> = texts
        .iter()
        .filter(|text| text.h_align == TextHAlign::Right && text.rotation_deg == 0.0 && text.x < min_x)
        .filter_map(|text| numeric(text).map(|value| (center_y(text), value)))
        .collect();
    let fit = PixelFit::from_ticks(&ticks);
    let value_at = |y: f64| fit.map_or(-y, |fit| clean(fit.value_at(y)));

    let x_label_at = |x: f64, tolerance: f64| {
        texts
            .iter()
            .filter(|text| text.y > max_y && (text.x - x).abs() <= tolerance)
            .min_by(|left, right| (left.x - x).abs().total_cmp(&(right.x - x).abs()))
            .map(|text| text.text.clone())
    };
    let spacing = |polyline: &PolylinePrimitive| match polyline.points.as_slice() {
        [first, second, ..] => (second.0 - first.0).abs() / 2.0,
        _ => f64::INFINITY,
    };

    let single_unnamed = polylines.len() == 1 && polylines[0].label.is_none();
    if single_unnamed {
        let polyline = polylines[0];
        let tolerance = spacing(polyline);
        let categories = polyline
            .points
            .iter()
            .enumerate()
            .map(|(position, (x, y))| {
                CategoryValue::new(
                    x_label_at(*x, tolerance).unwrap_or_else(|| generic_label(position)),
                    value_at(*y),
                )
            })
            .collect();
        return Some((chart_type, SeriesData::Categories(categories)));
    }

    let series = polylines
        .iter()
        .map(|polyline| {
            let tolerance = spacing(polyline);
            let points = polyline
                .points
                .iter()
                .enumerate()
                .map(|(position, (x, y))| {
                    let x_value = x_label_at(*x, tolerance)
                        .and_then(|label| parse_value(&label))
                        .unwrap_or(position as f64);
                    DataPoint::new(x_value, value_at(*y))
                })
                .collect();
            NamedSeries::new(
                polyline.label.clone().unwrap_or_else(|| UNNAMED_SERIES.to_owned()),
                points,
            )
        })
        .collect();
    Some((chart_type, SeriesData::Multi(series)))
}

fn generic_label(position: usize) -> String {
    format!("Category {}", position + 1)
}
