use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::StaticRenderOptions;
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};

/// Public chart view configuration.
///
/// Serializable so host applications can persist and load view setup
/// alongside their report definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartViewConfig {
    #[serde(default = "default_compact_size")]
    pub compact_size: Viewport,
    #[serde(default = "default_expanded_size")]
    pub expanded_size: Viewport,
    #[serde(default = "default_redraw_interval_ms")]
    pub redraw_interval_ms: u64,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "default_donut_hole_ratio")]
    pub donut_hole_ratio: f64,
    #[serde(default = "default_true")]
    pub show_donut_total: bool,
    #[serde(default = "default_true")]
    pub show_value_labels: bool,
    /// When `false`, expanding always uses the enlarged static backend.
    #[serde(default = "default_true")]
    pub interactive_enabled: bool,
    #[serde(default = "default_true")]
    pub animate_static_sort: bool,
}

impl Default for ChartViewConfig {
    fn default() -> Self {
        Self {
            compact_size: default_compact_size(),
            expanded_size: default_expanded_size(),
            redraw_interval_ms: default_redraw_interval_ms(),
            transition_ms: default_transition_ms(),
            donut_hole_ratio: default_donut_hole_ratio(),
            show_donut_total: true,
            show_value_labels: true,
            interactive_enabled: true,
            animate_static_sort: true,
        }
    }
}

impl ChartViewConfig {
    #[must_use]
    pub fn with_compact_size(mut self, size: Viewport) -> Self {
        self.compact_size = size;
        self
    }

    #[must_use]
    pub fn with_expanded_size(mut self, size: Viewport) -> Self {
        self.expanded_size = size;
        self
    }

    #[must_use]
    pub fn with_redraw_interval(mut self, interval: Duration) -> Self {
        self.redraw_interval_ms = duration_ms(interval);
        self
    }

    #[must_use]
    pub fn with_transition(mut self, transition: Duration) -> Self {
        self.transition_ms = duration_ms(transition);
        self
    }

    #[must_use]
    pub fn with_donut_hole_ratio(mut self, ratio: f64) -> Self {
        self.donut_hole_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_show_donut_total(mut self, show: bool) -> Self {
        self.show_donut_total = show;
        self
    }

    #[must_use]
    pub fn with_show_value_labels(mut self, show: bool) -> Self {
        self.show_value_labels = show;
        self
    }

    #[must_use]
    pub fn with_interactive_enabled(mut self, enabled: bool) -> Self {
        self.interactive_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_animate_static_sort(mut self, animate: bool) -> Self {
        self.animate_static_sort = animate;
        self
    }

    #[must_use]
    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_interval_ms)
    }

    #[must_use]
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    #[must_use]
    pub fn render_options(&self) -> StaticRenderOptions {
        StaticRenderOptions {
            donut_hole_ratio: self.donut_hole_ratio,
            show_donut_total: self.show_donut_total,
            show_value_labels: self.show_value_labels,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        for size in [self.compact_size, self.expanded_size] {
            if !size.is_valid() {
                return Err(ChartError::InvalidViewport {
                    width: size.width,
                    height: size.height,
                });
            }
        }
        if self.redraw_interval_ms == 0 {
            return Err(ChartError::InvalidData(
                "redraw interval must be > 0 ms".to_owned(),
            ));
        }
        self.render_options().validate()
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON. Missing fields take defaults.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn default_compact_size() -> Viewport {
    Viewport::new(480, 300)
}

fn default_expanded_size() -> Viewport {
    Viewport::new(1200, 760)
}

fn default_redraw_interval_ms() -> u64 {
    50
}

fn default_transition_ms() -> u64 {
    300
}

fn default_donut_hole_ratio() -> f64 {
    0.65
}

fn default_true() -> bool {
    true
}
