use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::StaticRenderOptions;
use crate::core::{ChartSpec, ChartType, DataSourceMetadata, SeriesData, ThemeContext, resolve_visible_items};
use crate::interaction::{Easing, InteractionState, SortOrder, Timeline};

/// Version of the JSON document embedded in every bundle.
pub const BUNDLE_PAYLOAD_SCHEMA_V1: u32 = 1;

/// Everything the bundle runtime needs, embedded as one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlePayload {
    pub schema_version: u32,
    pub chart_type: ChartType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Every category in original order, hidden ones included.
    pub items: Vec<PayloadItem>,
    /// Named series for multi-series line/area charts; empty otherwise.
    #[serde(default)]
    pub series: Vec<PayloadSeries>,
    pub hidden: Vec<String>,
    pub sort_order: SortOrder,
    pub theme: PayloadTheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DataSourceMetadata>,
    pub animation: PayloadAnimation,
    pub donut_hole_ratio: f64,
    pub show_donut_total: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadItem {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub original_index: usize,
    /// `palette[original_index mod palette.len()]` as CSS.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadSeries {
    pub name: String,
    pub original_index: usize,
    pub color: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadTheme {
    pub palette: Vec<String>,
    pub background: String,
    pub text: String,
    pub muted_text: String,
    pub border: String,
    pub grid: String,
    pub accent: String,
    pub tooltip_background: String,
    pub font_family: String,
    pub title_size_px: f64,
    pub label_size_px: f64,
    pub tick_size_px: f64,
}

impl PayloadTheme {
    fn from_theme(theme: &ThemeContext) -> Self {
        let tokens = theme.tokens();
        let typography = theme.typography();
        Self {
            palette: theme.palette().iter().map(|color| color.to_css()).collect(),
            background: tokens.background.to_css(),
            text: tokens.text.to_css(),
            muted_text: tokens.muted_text.to_css(),
            border: tokens.border.to_css(),
            grid: tokens.grid.to_css(),
            accent: tokens.accent.to_css(),
            tooltip_background: tokens.tooltip_background.to_css(),
            font_family: typography.font_family.clone(),
            title_size_px: typography.title_size_px,
            label_size_px: typography.label_size_px,
            tick_size_px: typography.tick_size_px,
        }
    }
}

/// Per-element entrance plan, precomputed from the animation timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadAnimation {
    pub total_ms: u64,
    pub easing: String,
    pub delays_ms: Vec<u64>,
    pub duration_ms: u64,
}

impl PayloadAnimation {
    fn plan(count: usize, total: Duration, easing: Easing) -> Self {
        let timeline = Timeline::staggered(count, Duration::ZERO, total, easing);
        let duration = timeline
            .tracks()
            .first()
            .map_or(total, |track| track.duration);
        Self {
            total_ms: millis(total),
            easing: easing.css_name().to_owned(),
            delays_ms: timeline.tracks().iter().map(|track| millis(track.start)).collect(),
            duration_ms: millis(duration),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl BundlePayload {
    pub(super) fn build(
        spec: &ChartSpec,
        theme: &ThemeContext,
        state: &InteractionState,
        metadata: Option<&DataSourceMetadata>,
        options: &StaticRenderOptions,
        transition: Duration,
        easing: Easing,
    ) -> Self {
        // Percent/rank are recomputed by the runtime; only identity and color
        // come from here, so everything starts from the unfiltered order.
        let unfiltered = InteractionState::default();
        let items: Vec<PayloadItem> = resolve_visible_items(spec, &unfiltered)
            .into_iter()
            .map(|item| PayloadItem {
                color: theme.color_for_index(item.original_index).to_css(),
                key: item.key,
                label: item.label,
                value: item.value,
                original_index: item.original_index,
            })
            .collect();

        let series = match (&spec.series, spec.chart_type) {
            (SeriesData::Multi(series), ChartType::Line | ChartType::Area) => series
                .iter()
                .enumerate()
                .map(|(index, named)| PayloadSeries {
                    name: named.name.clone(),
                    original_index: index,
                    color: theme.color_for_index(index).to_css(),
                    points: named.points.iter().map(|point| [point.x, point.y]).collect(),
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            schema_version: BUNDLE_PAYLOAD_SCHEMA_V1,
            chart_type: spec.chart_type,
            title: spec.title.clone(),
            subtitle: spec.subtitle.clone(),
            animation: PayloadAnimation::plan(items.len(), transition, easing),
            items,
            series,
            hidden: state.hidden_items().iter().cloned().collect(),
            sort_order: state.sort_order(),
            theme: PayloadTheme::from_theme(theme),
            metadata: metadata.cloned(),
            donut_hole_ratio: options.donut_hole_ratio,
            show_donut_total: options.show_donut_total,
        }
    }

    /// Serialized for embedding inside a `<script>` element.
    pub(super) fn to_embedded_json(&self) -> String {
        // Plain data structs cannot fail to serialize.
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned());
        json.replace("</", "<\\/")
    }
}
