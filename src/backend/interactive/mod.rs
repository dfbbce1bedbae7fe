//! Declarative interactive backend.
//!
//! Generates one self-contained HTML artifact per chart: markup, inline style,
//! the runtime script and the chart payload. The only external references are
//! the d3 charting library and the theme's web font, both by name.

mod host;
mod payload;

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ChartSpec, DataSourceMetadata, ThemeContext, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{Easing, InteractionState, SortOrder};
use crate::render::escape_text;

use super::StaticRenderOptions;

pub use host::{BundleHost, MemoryBundleHost};
pub use payload::{
    BUNDLE_PAYLOAD_SCHEMA_V1, BundlePayload, PayloadAnimation, PayloadItem, PayloadSeries,
    PayloadTheme,
};

pub const CHARTING_LIBRARY_URL: &str = "https://cdn.jsdelivr.net/npm/d3@7";
const WEB_FONT_STYLESHEET_URL: &str = "https://fonts.googleapis.com/css2";
const RUNTIME_SCRIPT: &str = include_str!("assets/chart_bundle.js");
const RUNTIME_STYLE: &str = include_str!("assets/chart_bundle.css");
/// Element id of the embedded JSON payload.
pub const PAYLOAD_ELEMENT_ID: &str = "report-chart-payload";

/// One generated interactive artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    content: String,
    size_hint: Viewport,
}

impl Bundle {
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn into_content(self) -> String {
        self.content
    }

    #[must_use]
    pub fn size_hint(&self) -> Viewport {
        self.size_hint
    }

    pub fn write_to(&self, path: &Path) -> ChartResult<()> {
        std::fs::write(path, self.content.as_bytes())?;
        Ok(())
    }

    /// Writes the bundle to a kept temporary `.html` file and returns its path.
    pub fn persist_to_temp(&self) -> ChartResult<PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix("report-chart-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(self.content.as_bytes())?;
        file.flush()?;
        let (_, path) = file.keep().map_err(|err| ChartError::Io(err.error))?;
        debug!(path = %path.display(), bytes = self.content.len(), "bundle persisted");
        Ok(path)
    }
}

/// Message posted by a loaded bundle back to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BridgeMessage {
    Hover { index: Option<usize> },
    Toggle { key: String },
    Sort { order: SortOrder },
    Reset,
}

impl BridgeMessage {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|err| ChartError::InvalidData(format!("invalid bundle message: {err}")))
    }
}

/// Generates interactive bundles. Pure and synchronous.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveBackend {
    options: StaticRenderOptions,
    transition: Duration,
    easing: Easing,
}

impl Default for InteractiveBackend {
    fn default() -> Self {
        Self::new(StaticRenderOptions::default(), Duration::from_millis(300))
    }
}

impl InteractiveBackend {
    #[must_use]
    pub fn new(options: StaticRenderOptions, transition: Duration) -> Self {
        Self {
            options,
            transition,
            easing: Easing::default(),
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn transition(&self) -> Duration {
        self.transition
    }

    /// Payload for `spec` as the bundle runtime will receive it.
    #[must_use]
    pub fn payload(
        &self,
        spec: &ChartSpec,
        theme: &ThemeContext,
        state: &InteractionState,
        metadata: Option<&DataSourceMetadata>,
    ) -> BundlePayload {
        BundlePayload::build(
            spec,
            theme,
            state,
            metadata,
            &self.options,
            self.transition,
            self.easing,
        )
    }

    /// Renders `spec` (with the current hide/sort state) into a bundle.
    #[must_use]
    pub fn generate(
        &self,
        spec: &ChartSpec,
        theme: &ThemeContext,
        state: &InteractionState,
        metadata: Option<&DataSourceMetadata>,
        size_hint: Viewport,
    ) -> Bundle {
        let spec = spec.clone().sanitized();
        let payload = self.payload(&spec, theme, state, metadata);
        let title = if spec.title.trim().is_empty() {
            "Chart"
        } else {
            spec.title.trim()
        };
        let font = &theme.typography().font_family;

        let mut html = String::with_capacity(RUNTIME_SCRIPT.len() + RUNTIME_STYLE.len() + 4096);
        let _ = writeln!(html, "<!DOCTYPE html>");
        let _ = writeln!(html, "<html lang=\"en\">");
        let _ = writeln!(html, "<head>");
        let _ = writeln!(html, "<meta charset=\"utf-8\">");
        let _ = writeln!(
            html,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        );
        let _ = writeln!(html, "<title>{}</title>", escape_text(title));
        let _ = writeln!(
            html,
            "<link rel=\"stylesheet\" href=\"{WEB_FONT_STYLESHEET_URL}?family={}:wght@400;600&amp;display=swap\">",
            escape_text(&font.replace(' ', "+"))
        );
        let _ = writeln!(html, "<script src=\"{CHARTING_LIBRARY_URL}\"></script>");
        let _ = writeln!(html, "<style>\n{RUNTIME_STYLE}</style>");
        let _ = writeln!(html, "</head>");
        let _ = writeln!(
            html,
            "<body style=\"width:{}px;height:{}px\">",
            size_hint.width, size_hint.height
        );
        let _ = writeln!(html, "<div id=\"report-chart\" class=\"rc-root\"></div>");
        let _ = writeln!(
            html,
            "<script type=\"application/json\" id=\"{PAYLOAD_ELEMENT_ID}\">{}</script>",
            payload.to_embedded_json()
        );
        let _ = writeln!(html, "<script>\n{RUNTIME_SCRIPT}</script>");
        let _ = writeln!(html, "</body>");
        let _ = writeln!(html, "</html>");

        debug!(
            chart_type = spec.chart_type.as_str(),
            items = payload.items.len(),
            bytes = html.len(),
            "interactive bundle generated"
        );
        Bundle {
            content: html,
            size_hint,
        }
    }
}

/// Extracts the embedded payload back out of bundle content.
pub fn read_embedded_payload(content: &str) -> ChartResult<BundlePayload> {
    let marker = format!("id=\"{PAYLOAD_ELEMENT_ID}\">");
    let start = content
        .find(&marker)
        .map(|index| index + marker.len())
        .ok_or_else(|| ChartError::InvalidData("bundle has no embedded payload".to_owned()))?;
    let end = content[start..]
        .find("</script>")
        .map(|offset| start + offset)
        .ok_or_else(|| ChartError::InvalidData("unterminated bundle payload".to_owned()))?;
    serde_json::from_str(&content[start..end])
        .map_err(|err| ChartError::InvalidData(format!("invalid bundle payload: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{BridgeMessage, InteractiveBackend, read_embedded_payload};
    use crate::core::{ChartSpec, ChartType, ThemeContext, Viewport};
    use crate::interaction::{InteractionState, SortOrder};

    #[test]
    fn bridge_messages_parse_from_runtime_json() {
        assert_eq!(
            BridgeMessage::from_json_str(r#"{"type":"sort","order":"descending"}"#).expect("sort"),
            BridgeMessage::Sort {
                order: SortOrder::Descending
            }
        );
        assert_eq!(
            BridgeMessage::from_json_str(r#"{"type":"hover","index":null}"#).expect("hover"),
            BridgeMessage::Hover { index: None }
        );
        assert!(BridgeMessage::from_json_str(r#"{"type":"zoom"}"#).is_err());
    }

    #[test]
    fn closing_script_tags_in_titles_stay_escaped() {
        let spec = ChartSpec::categories(ChartType::Bar, &["A"], &[1.0]).with_title("</script><b>");
        let bundle = InteractiveBackend::default().generate(
            &spec,
            &ThemeContext::light(),
            &InteractionState::default(),
            None,
            Viewport::new(800, 600),
        );
        let payload = read_embedded_payload(bundle.content()).expect("payload");
        assert_eq!(payload.title, "</script><b>");
        assert!(!bundle.content().contains("<title></script>"));
    }
}
