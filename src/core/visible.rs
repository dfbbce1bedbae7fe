use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::interaction::{InteractionState, SortOrder};

use super::{ChartSpec, ChartType, NamedSeries, SeriesData};

/// One visible category (or aggregated series) after hide/sort resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleItem {
    pub key: String,
    pub label: String,
    pub value: f64,
    /// Position in the unfiltered, unsorted data. Drives color and hit-test identity.
    pub original_index: usize,
    /// Share of the visible total, in percent.
    pub percent: f64,
    /// 1 = largest visible value; ties broken by original index.
    pub rank: usize,
}

/// Visible items in display order.
#[must_use]
pub fn resolve_visible_items(spec: &ChartSpec, state: &InteractionState) -> Vec<VisibleItem> {
    let mut items: Vec<VisibleItem> = match &spec.series {
        SeriesData::Categories(categories) => categories
            .iter()
            .enumerate()
            .filter(|(_, category)| !state.is_hidden(&category.label))
            .map(|(index, category)| {
                new_item(&category.label, category.value, index)
            })
            .collect(),
        SeriesData::Multi(series) => series
            .iter()
            .enumerate()
            .filter(|(_, named)| !state.is_hidden(&named.name))
            .map(|(index, named)| new_item(&named.name, named.total(), index))
            .collect(),
    };

    // Donuts only draw positive values; shares and ranks follow the drawn set.
    if spec.chart_type == ChartType::Donut {
        items.retain(|item| item.value > 0.0);
    }
    assign_percents(&mut items);

    let mut by_rank: Vec<usize> = (0..items.len()).collect();
    by_rank.sort_by(|left, right| descending(&items[*left], &items[*right]));
    for (rank, position) in by_rank.into_iter().enumerate() {
        items[position].rank = rank + 1;
    }

    match state.sort_order() {
        SortOrder::Original => {}
        SortOrder::Descending => items.sort_by(descending),
        SortOrder::Ascending => items.sort_by(|left, right| {
            OrderedFloat(left.value)
                .cmp(&OrderedFloat(right.value))
                .then(left.original_index.cmp(&right.original_index))
        }),
    }
    items
}

/// Shares of the visible total. Values are normalized by the largest
/// magnitude first so totals near `f64::MAX` do not overflow.
fn assign_percents(items: &mut [VisibleItem]) {
    let magnitude = items.iter().map(|item| item.value.abs()).fold(0.0, f64::max);
    if !(magnitude.is_finite() && magnitude > 0.0) {
        items.iter_mut().for_each(|item| item.percent = 0.0);
        return;
    }
    let total: f64 = items.iter().map(|item| item.value / magnitude).sum();
    for item in items.iter_mut() {
        item.percent = if total != 0.0 {
            item.value / magnitude / total * 100.0
        } else {
            0.0
        };
    }
}

/// Visible named series for line/area rendering, in display order.
///
/// Category data becomes one series named after the chart title (or
/// "Series"), with hidden categories removed.
#[must_use]
pub fn resolve_visible_series(spec: &ChartSpec, state: &InteractionState) -> Vec<(usize, NamedSeries)> {
    match &spec.series {
        SeriesData::Categories(_) => {
            let items = resolve_visible_items(spec, state);
            if items.is_empty() {
                return Vec::new();
            }
            let name = if spec.title.trim().is_empty() {
                "Series".to_owned()
            } else {
                spec.title.clone()
            };
            let points = items
                .iter()
                .enumerate()
                .map(|(position, item)| super::DataPoint::new(position as f64, item.value))
                .collect();
            vec![(0, NamedSeries::new(name, points))]
        }
        SeriesData::Multi(series) => {
            let order = resolve_visible_items(spec, state);
            order
                .iter()
                .filter_map(|item| {
                    series
                        .get(item.original_index)
                        .map(|named| (item.original_index, named.clone()))
                })
                .collect()
        }
    }
}

fn new_item(label: &str, value: f64, original_index: usize) -> VisibleItem {
    VisibleItem {
        key: label.to_owned(),
        label: label.to_owned(),
        value,
        original_index,
        percent: 0.0,
        rank: 0,
    }
}

fn descending(left: &VisibleItem, right: &VisibleItem) -> Ordering {
    OrderedFloat(right.value)
        .cmp(&OrderedFloat(left.value))
        .then(left.original_index.cmp(&right.original_index))
}

#[cfg(test)]
mod tests {
    use super::resolve_visible_items;
    use crate::core::{ChartSpec, ChartType};
    use crate::interaction::{InteractionState, SortOrder};

    #[test]
    fn ranks_break_ties_by_original_index() {
        let spec = ChartSpec::categories(ChartType::Bar, &["A", "B", "C"], &[5.0, 9.0, 5.0]);
        let items = resolve_visible_items(&spec, &InteractionState::default());
        let ranks: Vec<usize> = items.iter().map(|item| item.rank).collect();
        assert_eq!(ranks, vec![2, 1, 3]);
    }

    #[test]
    fn ascending_sort_is_stable_for_ties() {
        let spec = ChartSpec::categories(ChartType::Bar, &["A", "B", "C"], &[5.0, 1.0, 5.0]);
        let mut state = InteractionState::default();
        state.set_sort_order(SortOrder::Ascending);
        let labels: Vec<String> = resolve_visible_items(&spec, &state)
            .into_iter()
            .map(|item| item.label)
            .collect();
        assert_eq!(labels, vec!["B", "A", "C"]);
    }
}
