pub mod chart_spec;
pub mod format;
pub mod metadata;
pub mod scale;
pub mod theme;
pub mod types;
pub mod visible;

pub use chart_spec::{CategoryValue, ChartSpec, ChartType, NamedSeries, SeriesData, ThemeMode};
pub use format::{format_percent, format_value, parse_value};
pub use metadata::DataSourceMetadata;
pub use scale::LinearScale;
pub use theme::{SemanticTokens, ThemeContext, Typography};
pub use types::{DataPoint, Viewport};
pub use visible::{VisibleItem, resolve_visible_items, resolve_visible_series};
