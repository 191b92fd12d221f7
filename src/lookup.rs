//! Fuzzy stakeholder name resolution.
//!
//! Matching is tiered. From strongest to weakest: exact, case-insensitive
//! equality, case-insensitive prefix, case-insensitive substring. An empty
//! query matches nothing.

use serde::{Deserialize, Serialize};

use crate::models::Stakeholder;

/// How well a name matched a query. Ordered so that stronger matches compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Substring = 1,
    Prefix = 2,
    CaseInsensitive = 3,
    Exact = 4,
}

impl MatchTier {
    /// Strongest first.
    pub const ALL: [MatchTier; 4] = [
        MatchTier::Exact,
        MatchTier::CaseInsensitive,
        MatchTier::Prefix,
        MatchTier::Substring,
    ];

    pub fn score(self) -> u8 {
        self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::CaseInsensitive => "case_insensitive",
            Self::Prefix => "prefix",
            Self::Substring => "substring",
        }
    }

    fn satisfied_by(self, name: &str, query: &str) -> bool {
        match self {
            Self::Exact => name == query,
            Self::CaseInsensitive => name.to_lowercase() == query.to_lowercase(),
            Self::Prefix => name.to_lowercase().starts_with(&query.to_lowercase()),
            Self::Substring => name.to_lowercase().contains(&query.to_lowercase()),
        }
    }
}

/// The strongest tier `name` satisfies for `query`, if any.
pub fn match_tier(name: &str, query: &str) -> Option<MatchTier> {
    if query.is_empty() {
        return None;
    }
    MatchTier::ALL
        .into_iter()
        .find(|tier| tier.satisfied_by(name, query))
}

/// First stakeholder in the strongest non-empty tier. Within a tier, document
/// order decides.
pub fn find<'a>(stakeholders: &'a [Stakeholder], query: &str) -> Option<&'a Stakeholder> {
    if query.is_empty() {
        return None;
    }
    MatchTier::ALL.into_iter().find_map(|tier| {
        stakeholders
            .iter()
            .find(|s| tier.satisfied_by(&s.name, query))
    })
}

/// A stakeholder that matched a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub stakeholder: &'a Stakeholder,
    pub tier: MatchTier,
}

/// Every matching stakeholder, strongest tier first, ties broken by name ascending.
pub fn find_all<'a>(stakeholders: &'a [Stakeholder], query: &str) -> Vec<Match<'a>> {
    let mut matches: Vec<Match<'a>> = stakeholders
        .iter()
        .filter_map(|stakeholder| {
            match_tier(&stakeholder.name, query).map(|tier| Match { stakeholder, tier })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.tier
            .cmp(&a.tier)
            .then_with(|| a.stakeholder.name.cmp(&b.stakeholder.name))
    });
    matches
}
