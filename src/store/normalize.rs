//! Text normalisation applied before a record is persisted.
//!
//! The document grammar is line based, so a field containing a line break or
//! surrounding whitespace would not read back the same. Normalising on write
//! keeps every file the store produces round-trippable.

use crate::models::{ConflictResolution, Stakeholder, StakeholderGoal, UpdateStakeholderInput};

/// Collapse line breaks to single spaces and trim.
pub fn text(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalise each entry and drop the empty ones.
pub fn list(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .map(|v| text(v))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Normalise goal text, drop empty goals and merge goals with identical text.
/// The first position wins and linked issues are unioned in order.
pub fn goals(values: Vec<StakeholderGoal>) -> Vec<StakeholderGoal> {
    let mut out: Vec<StakeholderGoal> = Vec::with_capacity(values.len());
    for goal in values {
        let goal_text = text(&goal.text);
        if goal_text.is_empty() {
            continue;
        }
        let target = match out.iter().position(|g| g.text == goal_text) {
            Some(i) => &mut out[i],
            None => {
                out.push(StakeholderGoal::new(goal_text));
                let last = out.len() - 1;
                &mut out[last]
            }
        };
        for issue in goal.linked_issues {
            target.link(issue);
        }
    }
    out
}

pub fn stakeholder(s: Stakeholder) -> Stakeholder {
    Stakeholder {
        name: text(&s.name),
        role: text(&s.role),
        description: text(&s.description),
        goals: goals(s.goals),
        pain_points: list(s.pain_points),
        priorities: list(s.priorities),
    }
}

pub fn update(input: UpdateStakeholderInput) -> UpdateStakeholderInput {
    UpdateStakeholderInput {
        name: input.name.map(|v| text(&v)),
        role: input.role.map(|v| text(&v)),
        description: input.description.map(|v| text(&v)),
        goals: input.goals.map(goals),
        pain_points: input.pain_points.map(list),
        priorities: input.priorities.map(list),
    }
}

pub fn conflict(c: ConflictResolution) -> ConflictResolution {
    ConflictResolution {
        date: c.date,
        stakeholder1: text(&c.stakeholder1),
        stakeholder2: text(&c.stakeholder2),
        conflict: text(&c.conflict),
        decision: text(&c.decision),
        rationale: text(&c.rationale),
    }
}
