use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

const MAX_LABEL_PRECISION: u32 = 6;

/// Formats a chart value with at most two decimals and no trailing zeros.
#[must_use]
pub fn format_value(value: f64) -> String {
    format_value_with_precision(value, 2)
}

/// Formats `value` rounded to `precision` decimals, trimming trailing zeros.
///
/// Goes through `Decimal` so labels never show binary float noise such as
/// `0.30000000000000004`.
#[must_use]
pub fn format_value_with_precision(value: f64, precision: u32) -> String {
    if !value.is_finite() {
        return "–".to_owned();
    }
    match Decimal::from_f64(value) {
        Some(decimal) => {
            let rounded = decimal
                .round_dp_with_strategy(
                    precision.min(MAX_LABEL_PRECISION),
                    RoundingStrategy::MidpointAwayFromZero,
                )
                .normalize();
            if rounded.is_zero() {
                "0".to_owned()
            } else {
                rounded.to_string()
            }
        }
        None => format!("{value:.2}"),
    }
}

/// Decimal count needed to distinguish consecutive ticks of `step`.
#[must_use]
pub fn precision_for_step(step: f64) -> u32 {
    if !step.is_finite() || step <= 0.0 {
        return 2;
    }
    (0..MAX_LABEL_PRECISION)
        .find(|digits| {
            let scaled = step * 10f64.powi(*digits as i32);
            (scaled - scaled.round()).abs() <= 1e-6 * scaled.abs().max(1.0)
        })
        .unwrap_or(MAX_LABEL_PRECISION)
}

/// Share of a total as `33.3%`.
#[must_use]
pub fn format_percent(percent: f64) -> String {
    if !percent.is_finite() {
        return "–".to_owned();
    }
    format!("{percent:.1}%")
}

/// Parses labels produced by [`format_value`] back into numbers.
///
/// Accepts thousands separators and a trailing `%`.
#[must_use]
pub fn parse_value(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|ch| *ch != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .ok()
        .and_then(|decimal| decimal.to_f64())
}
