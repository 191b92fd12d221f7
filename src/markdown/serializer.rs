//! [`StakeholderFile`] → canonical markdown.
//!
//! Output re-parses to an equal file, except that `updated_at` is written with
//! millisecond precision. The Goal-Issue Links section is derived from the
//! goals on every write and is omitted entirely when nothing is linked; the
//! Conflict Resolutions section is omitted when the log is empty.

use super::escape::escape_goal_text;
use super::frontmatter;
use super::parser::{
    BASIC_INFO_HEADING, CONFLICTS_HEADING, CONFLICT_LABEL, DECISION_LABEL, DESCRIPTION_LABEL,
    GOALS_HEADING, GOAL_LINKS_HEADING, PAIN_POINTS_HEADING, PRIORITIES_HEADING, RATIONALE_LABEL,
    ROLE_LABEL, STAKEHOLDER_PREFIX,
};
use crate::models::{ConflictResolution, Stakeholder, StakeholderFile};

pub fn serialize_document(file: &StakeholderFile) -> String {
    let mut out = frontmatter::render(&file.version, file.updated_at);

    for stakeholder in &file.stakeholders {
        out.push('\n');
        write_stakeholder(&mut out, stakeholder);
    }

    if file.has_goal_links() {
        out.push('\n');
        write_goal_links(&mut out, &file.stakeholders);
    }

    if !file.conflict_resolutions.is_empty() {
        out.push('\n');
        write_conflicts(&mut out, &file.conflict_resolutions);
    }

    out
}

/// Push a line, dropping trailing whitespace left by empty values.
fn push_line(out: &mut String, line: &str) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn write_stakeholder(out: &mut String, s: &Stakeholder) {
    push_line(out, &format!("# {} {}", STAKEHOLDER_PREFIX, s.name));
    out.push('\n');

    push_line(out, &format!("## {}", BASIC_INFO_HEADING));
    push_line(out, &format!("- **{}**: {}", ROLE_LABEL, s.role));
    push_line(out, &format!("- **{}**: {}", DESCRIPTION_LABEL, s.description));
    out.push('\n');

    push_line(out, &format!("## {}", GOALS_HEADING));
    for goal in &s.goals {
        push_line(out, &format!("- {}", goal.text));
    }
    out.push('\n');

    push_line(out, &format!("## {}", PAIN_POINTS_HEADING));
    for pain in &s.pain_points {
        push_line(out, &format!("- {}", pain));
    }
    out.push('\n');

    push_line(out, &format!("## {}", PRIORITIES_HEADING));
    for (rank, priority) in s.priorities.iter().enumerate() {
        push_line(out, &format!("{}. {}", rank + 1, priority));
    }
    out.push('\n');

    push_line(out, "---");
}

fn write_goal_links(out: &mut String, stakeholders: &[Stakeholder]) {
    push_line(out, &format!("# {}", GOAL_LINKS_HEADING));

    for s in stakeholders {
        let linked: Vec<_> = s.goals.iter().filter(|g| g.is_linked()).collect();
        if linked.is_empty() {
            continue;
        }

        out.push('\n');
        push_line(out, &format!("## {}", s.name));
        for goal in linked {
            let refs = goal
                .linked_issues
                .iter()
                .map(|n| format!("#{}", n))
                .collect::<Vec<_>>()
                .join(", ");
            push_line(
                out,
                &format!("- **{}**: {}", escape_goal_text(&goal.text), refs),
            );
        }
    }
}

fn write_conflicts(out: &mut String, conflicts: &[ConflictResolution]) {
    push_line(out, &format!("# {}", CONFLICTS_HEADING));

    for c in conflicts {
        out.push('\n');
        push_line(
            out,
            &format!(
                "## {}: {} vs {}",
                c.date.format("%Y-%m-%d"),
                c.stakeholder1,
                c.stakeholder2
            ),
        );
        push_line(out, &format!("- **{}**: {}", CONFLICT_LABEL, c.conflict));
        push_line(out, &format!("- **{}**: {}", DECISION_LABEL, c.decision));
        push_line(out, &format!("- **{}**: {}", RATIONALE_LABEL, c.rationale));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_document;
    use crate::models::StakeholderGoal;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample() -> StakeholderFile {
        let mut user = Stakeholder::new("End User", "Daily user", "Non-technical users");
        let mut goal = StakeholderGoal::new("Complete tasks quickly");
        goal.link(42);
        user.goals = vec![goal, StakeholderGoal::new("Unlinked goal")];
        user.pain_points = vec!["Confusing onboarding".to_string()];
        user.priorities = vec!["Ease of use".to_string(), "Speed".to_string()];

        StakeholderFile {
            version: "1.0".to_string(),
            updated_at: Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap(),
            stakeholders: vec![user, Stakeholder::new("Developer", "", "")],
            conflict_resolutions: vec![ConflictResolution {
                date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                stakeholder1: "End User".to_string(),
                stakeholder2: "Developer".to_string(),
                conflict: "Defaults".to_string(),
                decision: "Keep them".to_string(),
                rationale: "Less to learn".to_string(),
            }],
        }
    }

    #[test]
    fn renders_canonical_layout() {
        let text = serialize_document(&sample());
        let expected_user = "# Stakeholder: End User\n\n## Basic Info\n- **Role**: Daily user\n- **Description**: Non-technical users\n\n## Goals\n- Complete tasks quickly\n- Unlinked goal\n\n## Pain Points\n- Confusing onboarding\n\n## Priorities\n1. Ease of use\n2. Speed\n\n---\n";
        assert!(text.starts_with("---\nversion: \"1.0\"\nupdated_at: \"2026-03-04T05:06:07.000Z\"\n---\n"));
        assert!(text.contains(expected_user));
        assert!(text.contains("# Goal-Issue Links\n\n## End User\n- **Complete tasks quickly**: #42\n"));
        assert!(!text.contains("Unlinked goal**"));
        assert!(!text.contains("## Developer"));
        assert!(text.contains("## 2026-03-01: End User vs Developer\n- **Conflict**: Defaults\n"));
    }

    #[test]
    fn round_trips() {
        let file = sample();
        assert_eq!(parse_document(&serialize_document(&file)), file);
    }

    #[test]
    fn empty_file_has_no_optional_sections() {
        let text = serialize_document(&StakeholderFile::new());
        assert!(!text.contains(GOAL_LINKS_HEADING));
        assert!(!text.contains(CONFLICTS_HEADING));
    }

    #[test]
    fn empty_values_round_trip() {
        let mut file = sample();
        file.stakeholders[1].role = String::new();
        let text = serialize_document(&file);
        assert!(text.contains("- **Role**:\n"));
        assert_eq!(parse_document(&text), file);
    }
}
