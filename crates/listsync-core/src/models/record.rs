//! Record model and the processed-view shaping rules

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One catalog entry as stored locally.
///
/// Records are replaced wholesale by identity on every successful fetch and
/// are never partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Unique identity
    pub id: i64,
    /// Group (list) the record belongs to
    pub group_id: i64,
    /// Optional display name; blank names are stored but never displayed
    pub display_name: Option<String>,
}

impl Record {
    /// Create a record with an optional display name
    #[must_use]
    pub const fn new(id: i64, group_id: i64, display_name: Option<String>) -> Self {
        Self {
            id,
            group_id,
            display_name,
        }
    }

    /// Create a record with a display name
    #[must_use]
    pub fn named(id: i64, group_id: i64, display_name: impl Into<String>) -> Self {
        Self::new(id, group_id, Some(display_name.into()))
    }

    /// Whether the record belongs in the processed view
    /// (absent, empty and whitespace-only names are excluded)
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        self.display_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

/// Build the processed view: drop undisplayable records, then sort by
/// `(group_id, display_name)`.
///
/// The sort is stable, so records with equal keys keep their input order.
#[must_use]
pub fn process_records(records: Vec<Record>) -> Vec<Record> {
    let mut processed: Vec<Record> = records
        .into_iter()
        .filter(Record::is_displayable)
        .collect();
    processed.sort_by(|a, b| {
        a.group_id
            .cmp(&b.group_id)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    processed
}

/// Distinct group ids in first-seen order
#[must_use]
pub fn distinct_group_ids(records: &[Record]) -> Vec<i64> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|record| record.group_id)
        .filter(|group_id| seen.insert(*group_id))
        .collect()
}

/// Subsequence of `records` belonging to `group_id` (empty when unset)
#[must_use]
pub fn records_in_group(records: &[Record], group_id: Option<i64>) -> Vec<Record> {
    let Some(group_id) = group_id else {
        return Vec::new();
    };
    records
        .iter()
        .filter(|record| record.group_id == group_id)
        .cloned()
        .collect()
}
