//! Request and response types for MCP tools.

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================
// Request Types
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ProjectRequest {
    #[schemars(description = "Project identifier (e.g. the repository name)")]
    pub project: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StakeholderNameRequest {
    #[schemars(description = "Project identifier (e.g. the repository name)")]
    pub project: String,
    #[schemars(description = "Exact stakeholder name (case-sensitive)")]
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindStakeholderRequest {
    #[schemars(description = "Project identifier (e.g. the repository name)")]
    pub project: String,
    #[schemars(
        description = "Full or partial stakeholder name. Case-insensitive; prefixes and substrings match."
    )]
    pub query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddStakeholderRequest {
    #[schemars(description = "Project identifier (e.g. the repository name)")]
    pub project: String,
    #[schemars(description = "Unique stakeholder name, e.g. 'End User' or 'Security Team'")]
    pub name: String,
    #[schemars(description = "The stakeholder's role in one short phrase")]
    #[serde(default)]
    pub role: String,
    #[schemars(description = "Who this stakeholder is")]
    #[serde(default)]
    pub description: String,
    #[schemars(description = "What this stakeholder wants the project to achieve")]
    #[serde(default)]
    pub goals: Vec<String>,
    #[schemars(description = "Problems this stakeholder currently has")]
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[schemars(description = "Priorities, most important first")]
    #[serde(default)]
    pub priorities: Vec<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateStakeholderRequest {
    #[schemars(description = "Project identifier (e.g. the repository name)")]
    pub project: String,
    #[schemars(description = "Exact name of the stakeholder to update")]
    pub name: String,
    #[schemars(description = "New name, if renaming")]
    #[serde(default)]
    pub new_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[schemars(
        description = "Replacement goal list. Goals whose text is unchanged keep their linked issues."
    )]
    #[serde(default)]
    pub goals: Option<Vec<String>>,
    #[schemars(description = "Replacement pain point list")]
    #[serde(default)]
    pub pain_points: Option<Vec<String>>,
    #[schemars(description = "Replacement priority list, most important first")]
    #[serde(default)]
    pub priorities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GoalIssueRequest {
    #[schemars(description = "Project identifier (e.g. the repository name)")]
    pub project: String,
    #[schemars(description = "Exact stakeholder name")]
    pub name: String,
    #[schemars(description = "Exact goal text as listed on the stakeholder")]
    pub goal: String,
    #[schemars(description = "Issue number, without the leading '#'")]
    pub issue_number: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct IssueRequest {
    #[schemars(description = "Project identifier (e.g. the repository name)")]
    pub project: String,
    #[schemars(description = "Issue number, without the leading '#'")]
    pub issue_number: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddConflictResolutionRequest {
    #[schemars(description = "Project identifier (e.g. the repository name)")]
    pub project: String,
    #[schemars(description = "Decision date as YYYY-MM-DD. Defaults to today.")]
    #[serde(default)]
    pub date: Option<String>,
    pub stakeholder1: String,
    pub stakeholder2: String,
    #[schemars(description = "What the two stakeholders disagreed about")]
    pub conflict: String,
    #[schemars(description = "What was decided")]
    pub decision: String,
    #[schemars(description = "Why it was decided that way")]
    pub rationale: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListConflictResolutionsRequest {
    #[schemars(description = "Project identifier (e.g. the repository name)")]
    pub project: String,
    #[schemars(description = "Only conflicts involving this exact stakeholder name")]
    #[serde(default)]
    pub stakeholder: Option<String>,
}

// ============================================================
// Response Types
// ============================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StakeholderMatchInfo {
    pub name: String,
    pub role: String,
    /// 4 = exact, 3 = case-insensitive, 2 = prefix, 1 = substring
    pub score: u8,
    pub match_type: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GoalLinkInfo {
    pub stakeholder: String,
    pub goal: String,
    pub linked_issues: Vec<u64>,
}
