use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ConflictResolution, Stakeholder};

/// Version tag written to new stakeholder files.
pub const CURRENT_VERSION: &str = "1.0";

/// The aggregate root: everything stored in one project's stakeholder file.
///
/// The whole file is always read and written as a unit. Stakeholder names are
/// unique for files written through the store; a hand-edited file may contain
/// duplicates, in which case the first occurrence is the one lookups return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderFile {
    pub version: String,
    pub updated_at: DateTime<Utc>,
    pub stakeholders: Vec<Stakeholder>,
    pub conflict_resolutions: Vec<ConflictResolution>,
}

impl StakeholderFile {
    pub fn new() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            updated_at: Utc::now(),
            stakeholders: Vec::new(),
            conflict_resolutions: Vec::new(),
        }
    }

    /// Index of the first stakeholder named exactly `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.stakeholders.iter().position(|s| s.name == name)
    }

    pub fn stakeholder(&self, name: &str) -> Option<&Stakeholder> {
        self.stakeholders.iter().find(|s| s.name == name)
    }

    pub fn stakeholder_mut(&mut self, name: &str) -> Option<&mut Stakeholder> {
        self.stakeholders.iter_mut().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Whether any goal of any stakeholder links at least one issue.
    pub fn has_goal_links(&self) -> bool {
        self.stakeholders
            .iter()
            .any(|s| s.goals.iter().any(|g| g.is_linked()))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for StakeholderFile {
    fn default() -> Self {
        Self::new()
    }
}
