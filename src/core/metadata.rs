use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance of a chart's data, supplied by the query layer and shown
/// verbatim in the interactive click overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceMetadata {
    pub origin: String,
    pub table: String,
    pub last_update: DateTime<Utc>,
    pub record_count: u64,
}

impl DataSourceMetadata {
    #[must_use]
    pub fn new(
        origin: impl Into<String>,
        table: impl Into<String>,
        last_update: DateTime<Utc>,
        record_count: u64,
    ) -> Self {
        Self {
            origin: origin.into(),
            table: table.into(),
            last_update,
            record_count,
        }
    }

    /// `(label, value)` rows in overlay order.
    #[must_use]
    pub fn display_rows(&self) -> [(&'static str, String); 4] {
        [
            ("Origin", self.origin.clone()),
            ("Table", self.table.clone()),
            (
                "Last update",
                self.last_update.format("%Y-%m-%d %H:%M UTC").to_string(),
            ),
            ("Records", self.record_count.to_string()),
        ]
    }
}
