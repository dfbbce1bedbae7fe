use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::ThemeMode;

/// Semantic color roles shared by both backends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemanticTokens {
    pub background: Color,
    pub text: Color,
    pub muted_text: Color,
    pub border: Color,
    pub grid: Color,
    pub accent: Color,
    pub tooltip_background: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    /// Web font name referenced by the interactive bundle, also used for raster text.
    pub font_family: String,
    pub title_size_px: f64,
    pub subtitle_size_px: f64,
    pub label_size_px: f64,
    pub tick_size_px: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_owned(),
            title_size_px: 16.0,
            subtitle_size_px: 12.0,
            label_size_px: 11.0,
            tick_size_px: 10.0,
        }
    }
}

/// Immutable theme value. A theme switch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeContext {
    mode: ThemeMode,
    palette: Vec<Color>,
    tokens: SemanticTokens,
    typography: Typography,
}

impl ThemeContext {
    pub fn new(
        mode: ThemeMode,
        palette: Vec<Color>,
        tokens: SemanticTokens,
        typography: Typography,
    ) -> ChartResult<Self> {
        let theme = Self {
            mode,
            palette,
            tokens,
            typography,
        };
        theme.validate()?;
        Ok(theme)
    }

    #[must_use]
    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            palette: default_palette(),
            tokens: SemanticTokens {
                background: Color::rgb8(0xff, 0xff, 0xff),
                text: Color::rgb8(0x1f, 0x29, 0x37),
                muted_text: Color::rgb8(0x6b, 0x72, 0x80),
                border: Color::rgb8(0xd1, 0xd5, 0xdb),
                grid: Color::rgb8(0xe5, 0xe7, 0xeb),
                accent: Color::rgb8(0x25, 0x63, 0xeb),
                tooltip_background: Color::rgb8(0xf9, 0xfa, 0xfb),
            },
            typography: Typography::default(),
        }
    }

    #[must_use]
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            palette: default_palette(),
            tokens: SemanticTokens {
                background: Color::rgb8(0x11, 0x18, 0x27),
                text: Color::rgb8(0xf3, 0xf4, 0xf6),
                muted_text: Color::rgb8(0x9c, 0xa3, 0xaf),
                border: Color::rgb8(0x37, 0x41, 0x51),
                grid: Color::rgb8(0x1f, 0x29, 0x37),
                accent: Color::rgb8(0x60, 0xa5, 0xfa),
                tooltip_background: Color::rgb8(0x1f, 0x29, 0x37),
            },
            typography: Typography::default(),
        }
    }

    #[must_use]
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let theme: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse theme json: {e}")))?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.palette.is_empty() {
            return Err(ChartError::InvalidData(
                "theme palette must not be empty".to_owned(),
            ));
        }
        for color in &self.palette {
            color.validate()?;
        }
        for size in [
            self.typography.title_size_px,
            self.typography.subtitle_size_px,
            self.typography.label_size_px,
            self.typography.tick_size_px,
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(ChartError::InvalidData(
                    "theme font sizes must be finite and > 0".to_owned(),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    #[must_use]
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    #[must_use]
    pub fn tokens(&self) -> SemanticTokens {
        self.tokens
    }

    #[must_use]
    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    /// Shared color rule for every chart type: `palette[i mod len]`.
    #[must_use]
    pub fn color_for_index(&self, index: usize) -> Color {
        match self.palette.len() {
            0 => self.tokens.accent,
            len => self.palette[index % len],
        }
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::light()
    }
}

fn default_palette() -> Vec<Color> {
    vec![
        Color::rgb8(0x4e, 0x79, 0xa7),
        Color::rgb8(0xf2, 0x8e, 0x2b),
        Color::rgb8(0xe1, 0x57, 0x59),
        Color::rgb8(0x76, 0xb7, 0xb2),
        Color::rgb8(0x59, 0xa1, 0x4f),
        Color::rgb8(0xed, 0xc9, 0x48),
        Color::rgb8(0xb0, 0x7a, 0xa1),
        Color::rgb8(0xff, 0x9d, 0xa7),
        Color::rgb8(0x9c, 0x75, 0x5f),
        Color::rgb8(0xba, 0xb0, 0xac),
    ]
}
