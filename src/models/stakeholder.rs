use serde::{Deserialize, Serialize};

/// A goal a stakeholder wants the project to achieve.
///
/// `linked_issues` is an ordered set: insertion order is kept and an issue
/// number appears at most once. It is the only place linkage lives in memory;
/// the "Goal-Issue Links" section on disk is regenerated from it on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderGoal {
    pub text: String,
    #[serde(default)]
    pub linked_issues: Vec<u64>,
}

impl StakeholderGoal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            linked_issues: Vec::new(),
        }
    }

    /// Adds `issue` unless already present. Returns whether it was added.
    pub fn link(&mut self, issue: u64) -> bool {
        if self.linked_issues.contains(&issue) {
            return false;
        }
        self.linked_issues.push(issue);
        true
    }

    /// Removes `issue` if present. Returns whether anything was removed.
    pub fn unlink(&mut self, issue: u64) -> bool {
        let before = self.linked_issues.len();
        self.linked_issues.retain(|&n| n != issue);
        self.linked_issues.len() != before
    }

    pub fn is_linked(&self) -> bool {
        !self.linked_issues.is_empty()
    }
}

/// A person or group with a stake in the project.
///
/// `name` is the record key and is unique within a stakeholder file.
/// Priorities are ranked by position: index 0 is the top priority.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stakeholder {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub goals: Vec<StakeholderGoal>,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<String>,
}

impl Stakeholder {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn goal(&self, text: &str) -> Option<&StakeholderGoal> {
        self.goals.iter().find(|g| g.text == text)
    }

    pub fn goal_mut(&mut self, text: &str) -> Option<&mut StakeholderGoal> {
        self.goals.iter_mut().find(|g| g.text == text)
    }

    /// Number of distinct issues linked across all goals.
    pub fn linked_issue_count(&self) -> usize {
        let mut seen: Vec<u64> = Vec::new();
        for issue in self.goals.iter().flat_map(|g| g.linked_issues.iter()) {
            if !seen.contains(issue) {
                seen.push(*issue);
            }
        }
        seen.len()
    }

    pub fn summary(&self) -> StakeholderSummary {
        StakeholderSummary {
            name: self.name.clone(),
            role: self.role.clone(),
            goal_count: self.goals.len(),
            pain_point_count: self.pain_points.len(),
            linked_issue_count: self.linked_issue_count(),
        }
    }
}

/// Read-only projection returned by listing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeholderSummary {
    pub name: String,
    pub role: String,
    pub goal_count: usize,
    pub pain_point_count: usize,
    pub linked_issue_count: usize,
}

/// Input for updating an existing stakeholder. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStakeholderInput {
    /// Rename the stakeholder. Fails if another stakeholder already has this name.
    pub name: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    /// Replaces the goal list. A goal supplied without linked issues keeps
    /// the links of an existing goal with the same text.
    pub goals: Option<Vec<StakeholderGoal>>,
    pub pain_points: Option<Vec<String>>,
    pub priorities: Option<Vec<String>>,
}

impl UpdateStakeholderInput {
    /// Merge the supplied fields over `target`.
    pub fn apply_to(self, target: &mut Stakeholder) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(role) = self.role {
            target.role = role;
        }
        if let Some(description) = self.description {
            target.description = description;
        }
        if let Some(goals) = self.goals {
            let previous = std::mem::take(&mut target.goals);
            target.goals = goals
                .into_iter()
                .map(|mut goal| {
                    if goal.linked_issues.is_empty() {
                        if let Some(old) = previous.iter().find(|g| g.text == goal.text) {
                            goal.linked_issues = old.linked_issues.clone();
                        }
                    }
                    goal
                })
                .collect();
        }
        if let Some(pain_points) = self.pain_points {
            target.pain_points = pain_points;
        }
        if let Some(priorities) = self.priorities {
            target.priorities = priorities;
        }
    }
}

/// A goal that references a given issue, used for reverse lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueGoalRef {
    pub stakeholder: String,
    pub goal: String,
}
