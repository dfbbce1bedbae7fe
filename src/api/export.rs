use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::StaticBackend;
use crate::core::format::format_value_with_precision;
use crate::core::{ChartSpec, ThemeContext, Viewport, format_value, resolve_visible_items};
use crate::error::{ChartError, ChartResult};
use crate::interaction::InteractionState;
use crate::render::frame_to_svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageFormat {
    /// PNG bytes. Needs the `cairo-backend` feature.
    Raster,
    /// SVG text.
    Vector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataFormat {
    /// Visible categories in display order: label, value, percent, rank.
    Csv,
    /// Versioned `ChartSpec` JSON contract.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportedImage {
    Png(Vec<u8>),
    Svg(String),
}

impl ExportedImage {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Png(bytes) => bytes,
            Self::Svg(svg) => svg.as_bytes(),
        }
    }

    #[must_use]
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Png(_) => "png",
            Self::Svg(_) => "svg",
        }
    }
}

/// Renders the chart without hover state and encodes it as `format`.
pub fn export_image(
    backend: &StaticBackend,
    spec: &ChartSpec,
    theme: &ThemeContext,
    state: &InteractionState,
    size: Viewport,
    format: ImageFormat,
) -> ChartResult<ExportedImage> {
    if !size.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: size.width,
            height: size.height,
        });
    }
    let mut state = state.clone();
    state.set_hover_index(None);
    let render = backend.render(spec, theme, &state, size);
    let image = match format {
        ImageFormat::Vector => ExportedImage::Svg(frame_to_svg(
            render.frame(),
            theme.tokens().background,
            &theme.typography().font_family,
        )),
        ImageFormat::Raster => ExportedImage::Png(encode_png(render.frame(), theme)?),
    };
    debug!(?format, bytes = image.as_bytes().len(), "chart image exported");
    Ok(image)
}

#[cfg(feature = "cairo-backend")]
fn encode_png(frame: &crate::render::RenderFrame, theme: &ThemeContext) -> ChartResult<Vec<u8>> {
    use crate::render::{CairoRenderer, Renderer};

    let width = i32::try_from(frame.viewport.width).map_err(|_| ChartError::InvalidViewport {
        width: frame.viewport.width,
        height: frame.viewport.height,
    })?;
    let height = i32::try_from(frame.viewport.height).map_err(|_| ChartError::InvalidViewport {
        width: frame.viewport.width,
        height: frame.viewport.height,
    })?;
    let mut renderer = CairoRenderer::new(width, height)?;
    renderer.set_clear_color(theme.tokens().background)?;
    renderer.set_font_family(theme.typography().font_family.clone());
    renderer.render(frame)?;
    renderer.encode_png()
}

#[cfg(not(feature = "cairo-backend"))]
fn encode_png(_frame: &crate::render::RenderFrame, _theme: &ThemeContext) -> ChartResult<Vec<u8>> {
    Err(ChartError::capability(
        "raster-export",
        "built without the cairo-backend feature",
    ))
}

pub fn export_data(
    spec: &ChartSpec,
    state: &InteractionState,
    format: DataFormat,
) -> ChartResult<String> {
    match format {
        DataFormat::Csv => Ok(visible_items_csv(spec, state)),
        DataFormat::Json => spec.to_json_contract_v1_pretty(),
    }
}

fn visible_items_csv(spec: &ChartSpec, state: &InteractionState) -> String {
    let mut csv = String::from("label,value,percent,rank\n");
    for item in resolve_visible_items(spec, state) {
        let _ = writeln!(
            csv,
            "{},{},{},{}",
            escape_csv(&item.label),
            format_value(item.value),
            format_value_with_precision(item.percent, 1),
            item.rank
        );
    }
    csv
}

fn escape_csv(value: &str) -> String {
    let needs_quotes = value.contains([',', '"', '\n', '\r']);
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::escape_csv;

    #[test]
    fn csv_fields_with_separators_are_quoted() {
        assert_eq!(escape_csv("North, East"), "\"North, East\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("plain"), "plain");
    }
}
