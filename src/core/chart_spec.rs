use serde::{Deserialize, Serialize};
use tracing::warn;

use super::DataPoint;

/// Chart family. Every backend dispatches on this exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    Bar,
    HorizontalBar,
    Donut,
    Line,
    Area,
}

impl ChartType {
    pub const ALL: [Self; 5] = [
        Self::Bar,
        Self::HorizontalBar,
        Self::Donut,
        Self::Line,
        Self::Area,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::HorizontalBar => "horizontalBar",
            Self::Donut => "donut",
            Self::Line => "line",
            Self::Area => "area",
        }
    }

    /// Bar-like and donut charts treat data as categories; line/area as series.
    #[must_use]
    pub const fn is_categorical(self) -> bool {
        matches!(self, Self::Bar | Self::HorizontalBar | Self::Donut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryValue {
    pub label: String,
    pub value: f64,
}

impl CategoryValue {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<DataPoint>,
}

impl NamedSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, points: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|point| point.y).sum()
    }
}

/// Chart data: ordered category/value pairs or several named `(x, y)` series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum SeriesData {
    Categories(Vec<CategoryValue>),
    Multi(Vec<NamedSeries>),
}

impl Default for SeriesData {
    fn default() -> Self {
        Self::Categories(Vec::new())
    }
}

impl SeriesData {
    /// Builds category data from parallel label/value slices, truncating to the shorter.
    #[must_use]
    pub fn from_pairs<L: AsRef<str>>(labels: &[L], values: &[f64]) -> Self {
        Self::Categories(
            labels
                .iter()
                .zip(values)
                .map(|(label, value)| CategoryValue::new(label.as_ref(), *value))
                .collect(),
        )
    }

    /// Keys addressable by hide/sort: category labels or series names.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Categories(categories) => categories
                .iter()
                .map(|category| category.label.as_str())
                .collect(),
            Self::Multi(series) => series.iter().map(|series| series.name.as_str()).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Categories(categories) => categories.len(),
            Self::Multi(series) => series.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Backend-independent description of a chart's type, data and titling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub chart_type: ChartType,
    pub series: SeriesData,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

impl ChartSpec {
    #[must_use]
    pub fn new(chart_type: ChartType, series: SeriesData) -> Self {
        Self {
            chart_type,
            series,
            title: String::new(),
            subtitle: None,
            theme_mode: ThemeMode::default(),
        }
    }

    /// Category chart from parallel label/value slices.
    #[must_use]
    pub fn categories<L: AsRef<str>>(chart_type: ChartType, labels: &[L], values: &[f64]) -> Self {
        Self::new(chart_type, SeriesData::from_pairs(labels, values))
    }

    /// Chart with no data; renders the placeholder.
    #[must_use]
    pub fn empty(chart_type: ChartType) -> Self {
        Self::new(chart_type, SeriesData::default())
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle;
        self
    }

    #[must_use]
    pub fn with_theme_mode(mut self, theme_mode: ThemeMode) -> Self {
        self.theme_mode = theme_mode;
        self
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.series.keys()
    }

    /// Drops non-finite values and empty series.
    ///
    /// Malformed data is a recoverable data error: offending entries are
    /// logged and removed, never surfaced to the caller.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        match &mut self.series {
            SeriesData::Categories(categories) => {
                let before = categories.len();
                categories.retain(|category| category.value.is_finite());
                let dropped = before - categories.len();
                if dropped > 0 {
                    warn!(dropped, "dropping non-finite category values");
                }
            }
            SeriesData::Multi(series) => {
                for named in series.iter_mut() {
                    let before = named.points.len();
                    named.points.retain(|point| point.is_finite());
                    let dropped = before - named.points.len();
                    if dropped > 0 {
                        warn!(series = %named.name, dropped, "dropping non-finite series points");
                    }
                }
                let before = series.len();
                series.retain(|named| !named.points.is_empty());
                if series.len() < before {
                    warn!(dropped = before - series.len(), "dropping empty series");
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartSpec, ChartType, DataPoint, NamedSeries, SeriesData};

    #[test]
    fn sanitize_drops_non_finite_entries() {
        let spec = ChartSpec::categories(ChartType::Bar, &["A", "B", "C"], &[1.0, f64::NAN, 2.0])
            .sanitized();
        assert_eq!(spec.keys(), vec!["A", "C"]);

        let multi = ChartSpec::new(
            ChartType::Line,
            SeriesData::Multi(vec![
                NamedSeries::new("ok", vec![DataPoint::new(0.0, 1.0)]),
                NamedSeries::new("bad", vec![DataPoint::new(0.0, f64::INFINITY)]),
            ]),
        )
        .sanitized();
        assert_eq!(multi.keys(), vec!["ok"]);
    }

    #[test]
    fn from_pairs_truncates_to_shorter_side() {
        let data = SeriesData::from_pairs(&["A", "B"], &[1.0]);
        assert_eq!(data.len(), 1);
    }
}
