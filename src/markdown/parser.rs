//! Markdown → [`StakeholderFile`].
//!
//! Parsing never fails. Anything that does not fit the document grammar is
//! skipped: an unknown section, a link line with a bad issue reference, a
//! conflict missing one of its three bullets. Well-formed records elsewhere in
//! the file are still returned.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::escape::unescape_goal_text;
use super::frontmatter;
use super::lexer::{self, Section, Subsection};
use crate::models::{ConflictResolution, Stakeholder, StakeholderFile, StakeholderGoal};

pub(crate) const STAKEHOLDER_PREFIX: &str = "Stakeholder:";
pub(crate) const GOAL_LINKS_HEADING: &str = "Goal-Issue Links";
pub(crate) const CONFLICTS_HEADING: &str = "Conflict Resolutions";

pub(crate) const BASIC_INFO_HEADING: &str = "Basic Info";
pub(crate) const GOALS_HEADING: &str = "Goals";
pub(crate) const PAIN_POINTS_HEADING: &str = "Pain Points";
pub(crate) const PRIORITIES_HEADING: &str = "Priorities";

pub(crate) const ROLE_LABEL: &str = "Role";
pub(crate) const DESCRIPTION_LABEL: &str = "Description";
pub(crate) const CONFLICT_LABEL: &str = "Conflict";
pub(crate) const DECISION_LABEL: &str = "Decision";
pub(crate) const RATIONALE_LABEL: &str = "Rationale";

/// stakeholder name → goal text → linked issues, in file order.
type GoalLinks = HashMap<String, HashMap<String, Vec<u64>>>;

enum SectionKind<'a> {
    Stakeholder(&'a str),
    GoalLinks,
    Conflicts,
    Other,
}

fn classify(heading: &str) -> SectionKind<'_> {
    if let Some(name) = heading.strip_prefix(STAKEHOLDER_PREFIX) {
        SectionKind::Stakeholder(name.trim())
    } else if heading.eq_ignore_ascii_case(GOAL_LINKS_HEADING) {
        SectionKind::GoalLinks
    } else if heading.eq_ignore_ascii_case(CONFLICTS_HEADING) {
        SectionKind::Conflicts
    } else {
        SectionKind::Other
    }
}

/// Parse a complete stakeholder document.
pub fn parse_document(content: &str) -> StakeholderFile {
    let (header, body) = frontmatter::split(content);
    let fm = header.map(frontmatter::parse).unwrap_or_default();

    let sections = lexer::sections(body);

    // Links are collected first so every goal can be resolved against them,
    // wherever the section sits in the file.
    let mut links = GoalLinks::new();
    for section in &sections {
        if let SectionKind::GoalLinks = classify(section.heading) {
            parse_goal_links(section, &mut links);
        }
    }

    let mut stakeholders = Vec::new();
    let mut conflict_resolutions = Vec::new();
    for section in &sections {
        match classify(section.heading) {
            SectionKind::Stakeholder(name) => {
                let mut stakeholder = parse_stakeholder(name, section);
                apply_goal_links(&mut stakeholder, &links);
                stakeholders.push(stakeholder);
            }
            SectionKind::Conflicts => {
                conflict_resolutions.extend(parse_conflicts(section));
            }
            SectionKind::GoalLinks | SectionKind::Other => {}
        }
    }

    StakeholderFile {
        version: fm.version,
        updated_at: fm.updated_at,
        stakeholders,
        conflict_resolutions,
    }
}

/// Parse one `# Stakeholder: <name>` section. Linked issues are left empty.
pub fn parse_stakeholder(name: &str, section: &Section<'_>) -> Stakeholder {
    let mut stakeholder = Stakeholder::new(name, "", "");

    for sub in section.subsections() {
        let heading = sub.heading;
        if heading.eq_ignore_ascii_case(BASIC_INFO_HEADING) {
            for bullet in sub.bullets() {
                if let Some(role) = labelled_value(bullet, ROLE_LABEL) {
                    stakeholder.role = role.to_string();
                } else if let Some(description) = labelled_value(bullet, DESCRIPTION_LABEL) {
                    stakeholder.description = description.to_string();
                }
            }
        } else if heading.eq_ignore_ascii_case(GOALS_HEADING) {
            stakeholder
                .goals
                .extend(sub.bullets().map(StakeholderGoal::new));
        } else if heading.eq_ignore_ascii_case(PAIN_POINTS_HEADING) {
            stakeholder
                .pain_points
                .extend(sub.bullets().map(str::to_string));
        } else if heading.eq_ignore_ascii_case(PRIORITIES_HEADING) {
            stakeholder
                .priorities
                .extend(sub.list_items().map(str::to_string));
        }
    }

    stakeholder
}

/// The value of a `**Label**: value` bullet.
fn labelled_value<'a>(bullet: &'a str, label: &str) -> Option<&'a str> {
    bullet
        .strip_prefix("**")?
        .strip_prefix(label)?
        .strip_prefix("**:")
        .map(str::trim)
}

fn parse_goal_links(section: &Section<'_>, links: &mut GoalLinks) {
    for sub in section.subsections() {
        for bullet in sub.bullets() {
            let Some((goal, issues)) = parse_link_line(bullet) else {
                continue;
            };
            let merged = links
                .entry(sub.heading.to_string())
                .or_default()
                .entry(goal)
                .or_default();
            for issue in issues {
                if !merged.contains(&issue) {
                    merged.push(issue);
                }
            }
        }
    }
}

/// Parse the text of a `- **<goal>**: #1, #2` bullet into unescaped goal text
/// and issue numbers. The delimiter is the last `**: ` on the line, since
/// issue references can never contain one.
pub fn parse_link_line(bullet: &str) -> Option<(String, Vec<u64>)> {
    let rest = bullet.strip_prefix("**")?;
    let split = rest.rfind("**: ")?;
    let goal = unescape_goal_text(&rest[..split]);
    let issues = parse_issue_refs(&rest[split + 4..])?;
    Some((goal, issues))
}

/// `#1, #2, #3` → `[1, 2, 3]`. Any malformed reference rejects the whole list.
fn parse_issue_refs(refs: &str) -> Option<Vec<u64>> {
    let mut issues = Vec::new();
    for part in refs.split(',') {
        let number = part.trim().strip_prefix('#')?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let issue = number.parse::<u64>().ok()?;
        if !issues.contains(&issue) {
            issues.push(issue);
        }
    }
    Some(issues)
}

fn apply_goal_links(stakeholder: &mut Stakeholder, links: &GoalLinks) {
    let by_goal = links.get(&stakeholder.name);
    for goal in &mut stakeholder.goals {
        goal.linked_issues = by_goal
            .and_then(|goals| goals.get(&goal.text))
            .cloned()
            .unwrap_or_default();
    }
}

fn parse_conflicts(section: &Section<'_>) -> Vec<ConflictResolution> {
    section
        .subsections()
        .iter()
        .filter_map(parse_conflict)
        .collect()
}

/// `## <date>: <name1> vs <name2>` plus Conflict, Decision and Rationale bullets.
fn parse_conflict(sub: &Subsection<'_>) -> Option<ConflictResolution> {
    let (date, parties) = sub.heading.split_once(':')?;
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let (stakeholder1, stakeholder2) = split_parties(parties)?;

    let mut conflict = None;
    let mut decision = None;
    let mut rationale = None;
    for bullet in sub.bullets() {
        if let Some(v) = labelled_value(bullet, CONFLICT_LABEL) {
            conflict.get_or_insert_with(|| v.to_string());
        } else if let Some(v) = labelled_value(bullet, DECISION_LABEL) {
            decision.get_or_insert_with(|| v.to_string());
        } else if let Some(v) = labelled_value(bullet, RATIONALE_LABEL) {
            rationale.get_or_insert_with(|| v.to_string());
        }
    }

    Some(ConflictResolution {
        date,
        stakeholder1: stakeholder1.trim().to_string(),
        stakeholder2: stakeholder2.trim().to_string(),
        conflict: conflict?,
        decision: decision?,
        rationale: rationale?,
    })
}

/// `A vs B`, where either name may be empty and the heading has been trimmed
/// (`vs B`, `A vs`, `vs`).
fn split_parties(parties: &str) -> Option<(&str, &str)> {
    let parties = parties.trim();
    if let Some(pair) = parties.split_once(" vs ") {
        return Some(pair);
    }
    if parties == "vs" {
        return Some(("", ""));
    }
    if let Some(second) = parties.strip_prefix("vs ") {
        return Some(("", second));
    }
    parties.strip_suffix(" vs").map(|first| (first, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r"---
version: '1.0'
updated_at: 2026-02-01T09:30:00.000Z
---

# Stakeholder: End User

## Basic Info
- **Role**: Daily user
- **Description**: Non-technical users

## Goals
- Complete tasks quickly
- Goal with **bold** text

## Pain Points
- Confusing onboarding

## Priorities
3. Ease of use
1. Speed

---

# Goal-Issue Links

## End User
- **Complete tasks quickly**: #42, #7
- **Goal with \*\*bold\*\* text**: #1
- **Unknown goal**: #9
- **Broken refs**: 42

# Conflict Resolutions

## 2026-01-15: End User vs Developer
- **Conflict**: Simplicity vs configurability
- **Decision**: Ship defaults, hide advanced settings
- **Rationale**: Most users never change settings

## 2026-01-16: Missing vs Bullets
- **Conflict**: Only one bullet
";

    #[test]
    fn parses_full_document() {
        let file = parse_document(DOC);
        assert_eq!(file.version, "1.0");
        assert_eq!(file.stakeholders.len(), 1);

        let user = &file.stakeholders[0];
        assert_eq!(user.name, "End User");
        assert_eq!(user.role, "Daily user");
        assert_eq!(user.description, "Non-technical users");
        assert_eq!(user.goals.len(), 2);
        assert_eq!(user.goals[0].linked_issues, vec![42, 7]);
        assert_eq!(user.goals[1].text, "Goal with **bold** text");
        assert_eq!(user.goals[1].linked_issues, vec![1]);
        assert_eq!(user.pain_points, vec!["Confusing onboarding"]);
        assert_eq!(user.priorities, vec!["Ease of use", "Speed"]);
    }

    #[test]
    fn drops_incomplete_conflicts() {
        let file = parse_document(DOC);
        assert_eq!(file.conflict_resolutions.len(), 1);
        let c = &file.conflict_resolutions[0];
        assert_eq!(c.date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        assert_eq!(c.stakeholder1, "End User");
        assert_eq!(c.stakeholder2, "Developer");
        assert_eq!(c.decision, "Ship defaults, hide advanced settings");
    }

    #[test]
    fn stakeholder_without_lists_has_empty_sequences() {
        let file = parse_document("# Stakeholder: Lurker\n\n## Basic Info\n- **Role**: Observer\n");
        let lurker = &file.stakeholders[0];
        assert_eq!(lurker.role, "Observer");
        assert!(lurker.description.is_empty());
        assert!(lurker.goals.is_empty());
        assert!(lurker.pain_points.is_empty());
        assert!(lurker.priorities.is_empty());
    }

    #[test]
    fn missing_frontmatter_uses_defaults() {
        let file = parse_document("# Stakeholder: Ops\n");
        assert_eq!(file.version, "1.0");
        assert_eq!(file.stakeholders[0].name, "Ops");
    }

    #[test]
    fn garbage_yields_empty_file() {
        let file = parse_document("just some\nrandom text\n- with a bullet\n");
        assert!(file.stakeholders.is_empty());
        assert!(file.conflict_resolutions.is_empty());
    }

    #[test]
    fn link_lines_use_last_delimiter() {
        let (goal, issues) = parse_link_line(r"**a\*\****: #3").unwrap();
        assert_eq!(goal, "a***");
        assert_eq!(issues, vec![3]);

        assert!(parse_link_line("**goal**: #1, two").is_none());
        assert!(parse_link_line("**goal**:").is_none());
        assert!(parse_link_line("goal: #1").is_none());
    }

    #[test]
    fn conflict_parties_may_be_blank() {
        assert_eq!(split_parties("A vs B"), Some(("A", "B")));
        assert_eq!(split_parties(" vs B"), Some(("", "B")));
        assert_eq!(split_parties("A vs"), Some(("A", "")));
        assert_eq!(split_parties("vs"), Some(("", "")));
        assert_eq!(split_parties("A versus B"), None);
    }

    #[test]
    fn duplicate_names_are_kept() {
        let doc = "# Stakeholder: Ops\n## Basic Info\n- **Role**: A\n# Stakeholder: Ops\n## Basic Info\n- **Role**: B\n";
        let file = parse_document(doc);
        assert_eq!(file.stakeholders.len(), 2);
        assert_eq!(file.stakeholder("Ops").unwrap().role, "A");
    }
}
