use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A recorded decision between two stakeholders whose goals pulled in
/// different directions.
///
/// Conflict resolutions are an append-only log: they are never edited or
/// removed through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub date: NaiveDate,
    pub stakeholder1: String,
    pub stakeholder2: String,
    /// What the two stakeholders disagreed about.
    pub conflict: String,
    pub decision: String,
    pub rationale: String,
}

impl ConflictResolution {
    /// Whether `name` is either party to the conflict (exact match).
    pub fn involves(&self, name: &str) -> bool {
        self.stakeholder1 == name || self.stakeholder2 == name
    }
}
