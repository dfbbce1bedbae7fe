use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{ChartSpec, format_percent, format_value, resolve_visible_items};

use super::{InteractionState, RedrawThrottle, SortOrder, ThrottleDecision, ToggleOutcome};

/// Resolves a pointer position on a live surface to an element's original index.
pub trait HitTest {
    fn hit_test(&self, x: f64, y: f64) -> Option<usize>;
}

/// Tooltip content for one hovered element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipModel {
    pub original_index: usize,
    pub label: String,
    pub value: f64,
    pub percent: f64,
    pub rank: usize,
    pub visible_count: usize,
}

impl TooltipModel {
    /// Builds the tooltip for `original_index` if that element is visible.
    #[must_use]
    pub fn for_index(
        spec: &ChartSpec,
        state: &InteractionState,
        original_index: usize,
    ) -> Option<Self> {
        let items = resolve_visible_items(spec, state);
        let visible_count = items.len();
        items
            .into_iter()
            .find(|item| item.original_index == original_index)
            .map(|item| Self {
                original_index,
                label: item.label,
                value: item.value,
                percent: item.percent,
                rank: item.rank,
                visible_count,
            })
    }

    /// Display lines: label, raw value, share of visible total, rank.
    #[must_use]
    pub fn lines(&self) -> [String; 4] {
        [
            self.label.clone(),
            format!("Value: {}", format_value(self.value)),
            format!("Share: {}", format_percent(self.percent)),
            format!("Rank: {} of {}", self.rank, self.visible_count),
        ]
    }
}

/// Outcome of one input event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineResponse {
    /// Throttle decision when the event requested a redraw.
    pub redraw: Option<ThrottleDecision>,
    pub toggle: Option<ToggleOutcome>,
    pub tooltip: Option<TooltipModel>,
}

impl EngineResponse {
    #[must_use]
    pub fn redraw_now(&self) -> bool {
        self.redraw.is_some_and(ThrottleDecision::redraw_now)
    }
}

/// Binds pointer/keyboard input on a live surface to `InteractionState`
/// mutations, and throttles the redraws they request.
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    throttle: RedrawThrottle,
}

impl InteractionEngine {
    #[must_use]
    pub fn new(redraw_interval: Duration) -> Self {
        Self {
            throttle: RedrawThrottle::new(redraw_interval),
        }
    }

    #[must_use]
    pub fn throttle(&self) -> &RedrawThrottle {
        &self.throttle
    }

    /// Hover: a redraw is requested only when the resolved index changes.
    pub fn pointer_move(
        &mut self,
        state: &mut InteractionState,
        spec: &ChartSpec,
        surface: &dyn HitTest,
        x: f64,
        y: f64,
        now: Duration,
    ) -> EngineResponse {
        let hit = surface.hit_test(x, y);
        let tooltip = hit.and_then(|index| TooltipModel::for_index(spec, state, index));
        let resolved = tooltip.as_ref().map(|tooltip| tooltip.original_index);
        if !state.set_hover_index(resolved) {
            return EngineResponse {
                tooltip,
                ..EngineResponse::default()
            };
        }
        trace!(hover = ?resolved, x, y, "hover target changed");
        EngineResponse {
            redraw: Some(self.request_redraw(state, now)),
            toggle: None,
            tooltip,
        }
    }

    pub fn pointer_leave(&mut self, state: &mut InteractionState, now: Duration) -> EngineResponse {
        if !state.set_hover_index(None) {
            return EngineResponse::default();
        }
        EngineResponse {
            redraw: Some(self.request_redraw(state, now)),
            ..EngineResponse::default()
        }
    }

    /// Click-to-toggle on whatever element lies under the pointer.
    pub fn click(
        &mut self,
        state: &mut InteractionState,
        spec: &ChartSpec,
        surface: &dyn HitTest,
        x: f64,
        y: f64,
        now: Duration,
    ) -> EngineResponse {
        let Some(index) = surface.hit_test(x, y) else {
            return EngineResponse::default();
        };
        let keys = spec.keys();
        let Some(key) = keys.get(index).map(|key| (*key).to_owned()) else {
            return EngineResponse::default();
        };
        self.toggle_key(state, spec, &key, now)
    }

    /// Toggles `key` in the hidden set; rejected if it would empty the chart.
    pub fn toggle_key(
        &mut self,
        state: &mut InteractionState,
        spec: &ChartSpec,
        key: &str,
        now: Duration,
    ) -> EngineResponse {
        let outcome = state.toggle_hidden(key, &spec.keys());
        debug!(key, ?outcome, "toggle category visibility");
        let redraw = outcome
            .changed()
            .then(|| self.request_redraw(state, now));
        EngineResponse {
            redraw,
            toggle: Some(outcome),
            tooltip: None,
        }
    }

    /// Two-state sort cycle {descending, ascending}.
    pub fn toggle_sort(&mut self, state: &mut InteractionState, now: Duration) -> EngineResponse {
        let next = state.sort_order().toggled();
        self.set_sort(state, next, now)
    }

    pub fn set_sort(
        &mut self,
        state: &mut InteractionState,
        order: SortOrder,
        now: Duration,
    ) -> EngineResponse {
        if state.sort_order() == order {
            return EngineResponse::default();
        }
        debug!(from = ?state.sort_order(), to = ?order, "sort order changed");
        state.set_sort_order(order);
        EngineResponse {
            redraw: Some(self.request_redraw(state, now)),
            ..EngineResponse::default()
        }
    }

    /// Clears hide/sort/hover back to the last data-load snapshot.
    pub fn reset(&mut self, state: &mut InteractionState, now: Duration) -> EngineResponse {
        state.reset();
        debug!("interaction state reset");
        EngineResponse {
            redraw: Some(self.request_redraw(state, now)),
            ..EngineResponse::default()
        }
    }

    pub fn request_redraw(&mut self, state: &mut InteractionState, now: Duration) -> ThrottleDecision {
        let decision = self.throttle.request(now);
        if decision.redraw_now() {
            state.mark_redrawn(now);
        }
        decision
    }

    /// Flushes a due trailing redraw. Returns `true` when the host must redraw.
    pub fn poll(&mut self, state: &mut InteractionState, now: Duration) -> bool {
        match self.throttle.poll(now) {
            Some(at) => {
                state.mark_redrawn(at);
                true
            }
            None => false,
        }
    }

    /// Drops a deferred redraw, e.g. when the surface it targeted is released.
    pub fn cancel_pending(&mut self) {
        self.throttle.cancel_pending();
    }

    /// Records a redraw that bypassed throttling (data, theme, surface rebuild).
    pub fn note_forced_redraw(&mut self, state: &mut InteractionState, now: Duration) {
        self.throttle.note_forced_redraw(now);
        state.mark_redrawn(now);
    }
}
