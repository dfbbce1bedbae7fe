use crate::core::{ChartSpec, ThemeContext, Viewport};
use crate::render::{RenderFrame, TextHAlign, TextPrimitive};

pub(super) const OUTER_PADDING_PX: f64 = 16.0;
pub(super) const BAR_FILL_RATIO: f64 = 0.7;
pub(super) const DIMMED_ALPHA: f64 = 0.35;
pub(super) const ROTATED_LABEL_DEG: f64 = -45.0;

/// Plot rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    /// Builds the area, keeping it at least one pixel wide and tall.
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right: right.max(left + 1.0),
            bottom: bottom.max(top + 1.0),
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// How category labels fit along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LabelMode {
    Horizontal,
    /// Rotated 45°, truncated to `max_chars`.
    Rotated { max_chars: usize },
    /// Too dense even rotated: only every `every`-th label is drawn.
    Thinned { every: usize },
}

impl LabelMode {
    pub(super) fn shows(self, position: usize) -> bool {
        match self {
            Self::Thinned { every } => position % every.max(1) == 0,
            Self::Horizontal | Self::Rotated { .. } => true,
        }
    }
}

pub(super) fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    // Backend-independent estimate; layout must stay deterministic.
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            'A'..='Z' => 0.68,
            _ => 0.56,
        }
    });
    units * font_size_px
}

/// Picks horizontal, rotated or thinned labels for slots `slot_width` wide.
pub(super) fn resolve_label_mode<S: AsRef<str>>(
    labels: &[S],
    slot_width: f64,
    font_size_px: f64,
    max_rotated_extent_px: f64,
) -> LabelMode {
    let widest = labels
        .iter()
        .map(|label| estimate_label_text_width_px(label.as_ref(), font_size_px))
        .fold(0.0_f64, f64::max);
    if widest <= slot_width * 0.92 {
        return LabelMode::Horizontal;
    }

    // A rotated label needs roughly its line height (projected) per slot.
    let rotated_footprint = font_size_px * 1.15;
    if slot_width >= rotated_footprint {
        let char_width = font_size_px * 0.6;
        let max_chars = ((max_rotated_extent_px / char_width).floor() as usize).max(4);
        return LabelMode::Rotated { max_chars };
    }

    let every = (rotated_footprint / slot_width.max(0.5)).ceil() as usize;
    LabelMode::Thinned {
        every: every.max(2),
    }
}

/// Vertical space consumed below the plot by category labels.
pub(super) fn category_label_band_px(mode: LabelMode, font_size_px: f64, max_rotated_extent_px: f64) -> f64 {
    match mode {
        LabelMode::Horizontal | LabelMode::Thinned { .. } => font_size_px + 12.0,
        LabelMode::Rotated { .. } => max_rotated_extent_px * std::f64::consts::FRAC_1_SQRT_2 + 14.0,
    }
}

pub(super) fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Pushes a category label under a vertical slot centered at `x`.
pub(super) fn push_category_label(
    frame: &mut RenderFrame,
    theme: &ThemeContext,
    mode: LabelMode,
    position: usize,
    label: &str,
    x: f64,
    y: f64,
) {
    if !mode.shows(position) || label.is_empty() {
        return;
    }
    let font = theme.typography().label_size_px;
    let color = theme.tokens().text;
    let text = match mode {
        LabelMode::Rotated { max_chars } => {
            TextPrimitive::new(truncate_label(label, max_chars), x, y, font, color, TextHAlign::Right)
                .with_rotation(ROTATED_LABEL_DEG)
        }
        LabelMode::Horizontal | LabelMode::Thinned { .. } => {
            TextPrimitive::new(label, x, y, font, color, TextHAlign::Center)
        }
    };
    frame.texts.push(text);
}

/// Draws title/subtitle and returns the y where chart content may start.
pub(super) fn push_header(frame: &mut RenderFrame, spec: &ChartSpec, theme: &ThemeContext) -> f64 {
    let typography = theme.typography();
    let tokens = theme.tokens();
    let mut y = OUTER_PADDING_PX * 0.75;
    if !spec.title.trim().is_empty() {
        frame.texts.push(TextPrimitive::new(
            spec.title.trim(),
            OUTER_PADDING_PX,
            y,
            typography.title_size_px,
            tokens.text,
            TextHAlign::Left,
        ));
        y += typography.title_size_px + 4.0;
    }
    if let Some(subtitle) = spec
        .subtitle
        .as_deref()
        .map(str::trim)
        .filter(|subtitle| !subtitle.is_empty())
    {
        frame.texts.push(TextPrimitive::new(
            subtitle,
            OUTER_PADDING_PX,
            y,
            typography.subtitle_size_px,
            tokens.muted_text,
            TextHAlign::Left,
        ));
        y += typography.subtitle_size_px + 4.0;
    }
    y + OUTER_PADDING_PX * 0.5
}

/// Explicit "no data" placeholder; the only user-visible failure surface.
pub(super) fn push_placeholder(frame: &mut RenderFrame, theme: &ThemeContext, content_top: f64) {
    let viewport: Viewport = frame.viewport;
    let font = theme.typography().label_size_px * 1.2;
    let center_y = (content_top + viewport.height_f64()) / 2.0 - font / 2.0;
    frame.texts.push(TextPrimitive::new(
        super::PLACEHOLDER_TEXT,
        viewport.width_f64() / 2.0,
        center_y.max(content_top),
        font,
        theme.tokens().muted_text,
        TextHAlign::Center,
    ));
}
