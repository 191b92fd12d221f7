//! ASCII tree rendering for stakeholders.

use crate::models::{Stakeholder, StakeholderGoal};

const LINKED: char = '●';
const UNLINKED: char = '○';

/// Get the marker for a goal.
fn goal_symbol(goal: &StakeholderGoal) -> char {
    if goal.is_linked() {
        LINKED
    } else {
        UNLINKED
    }
}

fn goal_label(goal: &StakeholderGoal) -> String {
    let mut label = format!("{} {}", goal_symbol(goal), goal.text);
    if goal.is_linked() {
        let refs = goal
            .linked_issues
            .iter()
            .map(|n| format!("#{}", n))
            .collect::<Vec<_>>()
            .join(", ");
        label.push_str(&format!(" [{}]", refs));
    }
    label
}

/// Render a stakeholder as ASCII art. Empty lists are omitted.
///
/// Example output:
/// ```text
/// End User (Daily user)
/// ├── Goals
/// │   ├── ● Complete tasks quickly [#42]
/// │   └── ○ Learn the basics alone
/// ├── Pain Points
/// │   └── Confusing onboarding
/// └── Priorities
///     └── 1. Ease of use
/// ```
pub fn render_stakeholder(stakeholder: &Stakeholder) -> String {
    let mut output = String::new();

    output.push_str(&stakeholder.name);
    if !stakeholder.role.is_empty() {
        output.push_str(&format!(" ({})", stakeholder.role));
    }
    output.push('\n');

    let mut branches: Vec<(&str, Vec<String>)> = Vec::new();
    if !stakeholder.goals.is_empty() {
        branches.push(("Goals", stakeholder.goals.iter().map(goal_label).collect()));
    }
    if !stakeholder.pain_points.is_empty() {
        branches.push(("Pain Points", stakeholder.pain_points.clone()));
    }
    if !stakeholder.priorities.is_empty() {
        branches.push((
            "Priorities",
            stakeholder
                .priorities
                .iter()
                .enumerate()
                .map(|(i, p)| format!("{}. {}", i + 1, p))
                .collect(),
        ));
    }

    for (i, (title, items)) in branches.iter().enumerate() {
        let is_last = i == branches.len() - 1;
        render_branch(&mut output, title, items, is_last);
    }

    output
}

/// Render one titled branch and its leaves.
fn render_branch(output: &mut String, title: &str, items: &[String], is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    output.push_str(branch);
    output.push_str(title);
    output.push('\n');

    let continuation = if is_last { "    " } else { "│   " };
    for (i, item) in items.iter().enumerate() {
        let leaf = if i == items.len() - 1 { "└── " } else { "├── " };
        output.push_str(continuation);
        output.push_str(leaf);
        output.push_str(item);
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only() {
        let s = Stakeholder::new("Auditor", "", "");
        assert_eq!(render_stakeholder(&s), "Auditor\n");
    }

    #[test]
    fn test_full_card() {
        let mut s = Stakeholder::new("End User", "Daily user", "Non-technical users");
        let mut linked = StakeholderGoal::new("Complete tasks quickly");
        linked.link(42);
        linked.link(7);
        s.goals = vec![linked, StakeholderGoal::new("Learn the basics alone")];
        s.pain_points = vec!["Confusing onboarding".to_string()];
        s.priorities = vec!["Ease of use".to_string()];

        let expected = "End User (Daily user)\n├── Goals\n│   ├── ● Complete tasks quickly [#42, #7]\n│   └── ○ Learn the basics alone\n├── Pain Points\n│   └── Confusing onboarding\n└── Priorities\n    └── 1. Ease of use\n";
        assert_eq!(render_stakeholder(&s), expected);
    }
}
