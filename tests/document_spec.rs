use chrono::{NaiveDate, TimeZone, Utc};
use speculate2::speculate;
use stakeholder_store::lookup::{self, MatchTier};
use stakeholder_store::markdown::*;
use stakeholder_store::models::*;

fn goal(text: &str, issues: &[u64]) -> StakeholderGoal {
    StakeholderGoal {
        text: text.to_string(),
        linked_issues: issues.to_vec(),
    }
}

fn end_user() -> Stakeholder {
    Stakeholder {
        name: "End User".to_string(),
        role: "Daily user".to_string(),
        description: "Non-technical users".to_string(),
        goals: vec![goal("Complete tasks quickly", &[])],
        pain_points: vec!["Confusing onboarding".to_string()],
        priorities: vec!["Ease of use".to_string()],
    }
}

fn file_with(stakeholders: Vec<Stakeholder>) -> StakeholderFile {
    StakeholderFile {
        version: "1.0".to_string(),
        updated_at: Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
        stakeholders,
        conflict_resolutions: vec![],
    }
}

speculate! {
    describe "escaping" {
        it "escapes bold markers in goal text" {
            assert_eq!(
                escape_goal_text("Goal with **bold** text"),
                r"Goal with \*\*bold\*\* text"
            );
        }

        it "is inverted by unescape for text that already looks escaped" {
            for s in [r"\*\*", r"a\\b", "***", r"\", "plain"] {
                assert_eq!(unescape_goal_text(&escape_goal_text(s)), s);
            }
        }
    }

    describe "serialize_document" {
        it "omits the links section when nothing is linked" {
            let text = serialize_document(&file_with(vec![end_user()]));
            assert!(!text.contains("Goal-Issue Links"));
        }

        it "omits the conflicts section when the log is empty" {
            let text = serialize_document(&file_with(vec![end_user()]));
            assert!(!text.contains("Conflict Resolutions"));
        }

        it "lists only linked goals in the links section" {
            let mut user = end_user();
            user.goals.push(goal("Find help", &[3, 1]));
            let text = serialize_document(&file_with(vec![user, Stakeholder::new("Admin", "", "")]));

            let links = &text[text.find("# Goal-Issue Links").unwrap()..];
            assert_eq!(links, "# Goal-Issue Links\n\n## End User\n- **Find help**: #3, #1\n");
        }

        it "escapes bold goal text in the links section" {
            let mut user = end_user();
            user.goals = vec![goal("Goal with **bold** text", &[1])];
            let file = file_with(vec![user]);
            let text = serialize_document(&file);

            assert!(text.contains(r"- **Goal with \*\*bold\*\* text**: #1"));
            assert!(text.contains("- Goal with **bold** text\n"));

            let parsed = parse_document(&text);
            assert_eq!(parsed.stakeholders[0].goals[0].text, "Goal with **bold** text");
            assert_eq!(parsed.stakeholders[0].goals[0].linked_issues, vec![1]);
        }

        it "terminates each stakeholder with a rule" {
            let text = serialize_document(&file_with(vec![end_user(), Stakeholder::new("Admin", "", "")]));
            assert_eq!(text.matches("\n---\n").count(), 3);
        }
    }

    describe "parse_document" {
        it "round-trips a full file" {
            let mut user = end_user();
            user.goals = vec![
                goal("Complete tasks quickly", &[42]),
                goal(r"Odd \ chars ** and ***", &[5, 6]),
                goal("Unlinked", &[]),
            ];
            let mut file = file_with(vec![user, Stakeholder::new("Admin", "Ops", "")]);
            file.conflict_resolutions.push(ConflictResolution {
                date: NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
                stakeholder1: "End User".to_string(),
                stakeholder2: "Admin".to_string(),
                conflict: "Audit logging slows the UI".to_string(),
                decision: "Log asynchronously".to_string(),
                rationale: "Both needs are met".to_string(),
            });

            assert_eq!(parse_document(&serialize_document(&file)), file);
        }

        it "treats a present but empty links section like an absent one" {
            let text = "# Stakeholder: Ops\n## Goals\n- Uptime\n# Goal-Issue Links\n# Conflict Resolutions\n";
            let file = parse_document(text);
            assert!(file.stakeholders[0].goals[0].linked_issues.is_empty());
            assert!(file.conflict_resolutions.is_empty());
        }

        it "reads linkage only from the links section" {
            let text = "# Stakeholder: Ops\n## Goals\n- Uptime: #12\n";
            let file = parse_document(text);
            assert_eq!(file.stakeholders[0].goals[0].text, "Uptime: #12");
            assert!(file.stakeholders[0].goals[0].linked_issues.is_empty());
        }

        it "resolves links wherever the section appears" {
            let text = "# Goal-Issue Links\n## Ops\n- **Uptime**: #12\n# Stakeholder: Ops\n## Goals\n- Uptime\n";
            let file = parse_document(text);
            assert_eq!(file.stakeholders[0].goals[0].linked_issues, vec![12]);
        }

        it "ranks priorities by position rather than printed number" {
            let text = "# Stakeholder: Ops\n## Priorities\n5. Reliability\n2. Cost\n2. Speed\n";
            let file = parse_document(text);
            assert_eq!(file.stakeholders[0].priorities, vec!["Reliability", "Cost", "Speed"]);
        }

        it "ignores sections it does not know" {
            let text = "# Notes\n- scratch\n# Stakeholder: Ops\n## History\n- old\n## Goals\n- Uptime\n";
            let file = parse_document(text);
            assert_eq!(file.stakeholders.len(), 1);
            assert_eq!(file.stakeholders[0].goals.len(), 1);
        }

        it "drops conflicts with a bad date" {
            let text = "# Conflict Resolutions\n## yesterday: A vs B\n- **Conflict**: c\n- **Decision**: d\n- **Rationale**: r\n";
            assert!(parse_document(text).conflict_resolutions.is_empty());
        }
    }

    describe "fuzzy lookup" {
        before {
            let all = vec![
                Stakeholder::new("End User", "", ""),
                Stakeholder::new("Developer", "", ""),
            ];
        }

        it "matches case-insensitively" {
            assert_eq!(lookup::find(&all, "end user").unwrap().name, "End User");
        }

        it "matches prefixes" {
            assert_eq!(lookup::find(&all, "end").unwrap().name, "End User");
        }

        it "falls back to substrings" {
            assert_eq!(lookup::find(&all, "eve").unwrap().name, "Developer");
        }

        it "scores all matches" {
            let matches = lookup::find_all(&all, "e");
            let names: Vec<_> = matches.iter().map(|m| m.stakeholder.name.as_str()).collect();
            assert_eq!(names, vec!["End User", "Developer"]);
            assert_eq!(matches[0].tier, MatchTier::Prefix);
            assert_eq!(matches[1].tier, MatchTier::Substring);
        }
    }
}
