mod animation;
mod engine;
mod throttle;

use std::time::Duration;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

pub use animation::{AnimationDescriptor, Easing, SlotMove, Timeline, stagger_delays};
pub use engine::{EngineResponse, HitTest, InteractionEngine, TooltipModel};
pub use throttle::{RedrawThrottle, ThrottleDecision};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Original,
    Ascending,
    Descending,
}

impl SortOrder {
    /// Two-state sort toggle used by the static backend: anything but
    /// descending goes to descending, descending goes to ascending.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Descending => Self::Ascending,
            Self::Original | Self::Ascending => Self::Descending,
        }
    }
}

/// Result of a click-to-toggle request against `hidden_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Hidden,
    Shown,
    /// Hiding would leave no visible category; state unchanged.
    Rejected,
    UnknownKey,
}

impl ToggleOutcome {
    #[must_use]
    pub fn changed(self) -> bool {
        matches!(self, Self::Hidden | Self::Shown)
    }
}

/// Per-chart interaction record. Both backends are pure functions of
/// `(ChartSpec, ThemeContext, InteractionState)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    hidden_items: IndexSet<String>,
    sort_order: SortOrder,
    hover_index: Option<usize>,
    #[serde(skip)]
    last_redraw_timestamp: Option<Duration>,
}

impl InteractionState {
    #[must_use]
    pub fn hidden_items(&self) -> &IndexSet<String> {
        &self.hidden_items
    }

    #[must_use]
    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden_items.contains(key)
    }

    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    #[must_use]
    pub fn hover_index(&self) -> Option<usize> {
        self.hover_index
    }

    /// Returns `true` when the hover target changed.
    pub fn set_hover_index(&mut self, index: Option<usize>) -> bool {
        if self.hover_index == index {
            return false;
        }
        self.hover_index = index;
        true
    }

    #[must_use]
    pub fn last_redraw_timestamp(&self) -> Option<Duration> {
        self.last_redraw_timestamp
    }

    pub fn mark_redrawn(&mut self, now: Duration) {
        self.last_redraw_timestamp = Some(now);
    }

    /// Toggles `key` in the hidden set.
    ///
    /// `keys` is the full key list of the current chart. Hiding is rejected
    /// when it would leave zero visible keys.
    pub fn toggle_hidden(&mut self, key: &str, keys: &[&str]) -> ToggleOutcome {
        if !keys.contains(&key) {
            return ToggleOutcome::UnknownKey;
        }
        if self.hidden_items.shift_remove(key) {
            return ToggleOutcome::Shown;
        }
        let visible_after = keys
            .iter()
            .filter(|candidate| **candidate != key && !self.hidden_items.contains(**candidate))
            .count();
        if visible_after == 0 {
            return ToggleOutcome::Rejected;
        }
        self.hidden_items.insert(key.to_owned());
        if self.hover_index.is_some() {
            self.hover_index = None;
        }
        ToggleOutcome::Hidden
    }

    /// Clears hide/sort/hover, keeping the redraw clock.
    pub fn reset(&mut self) {
        self.hidden_items.clear();
        self.sort_order = SortOrder::Original;
        self.hover_index = None;
    }
}
