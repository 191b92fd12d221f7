//! The `---` delimited header at the top of a stakeholder file.
//!
//! Only two keys are meaningful, `version` and `updated_at`, so this is a
//! small `key: value` reader rather than a YAML parser. Unknown keys are ignored.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::CURRENT_VERSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub version: String,
    pub updated_at: DateTime<Utc>,
}

impl Default for Frontmatter {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            updated_at: Utc::now(),
        }
    }
}

/// Split content into (frontmatter, body). Returns `None` when the content
/// does not open with a `---` line that is later closed by another `---` line.
pub fn split(content: &str) -> (Option<&str>, &str) {
    let trimmed = content.trim_start_matches(['\u{feff}', '\n', '\r']);
    let Some(after_open) = strip_delimiter_line(trimmed) else {
        return (None, content);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let header = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (Some(header), body);
        }
        offset += line.len();
    }

    (None, content)
}

fn strip_delimiter_line(text: &str) -> Option<&str> {
    let first_end = text.find('\n')?;
    if text[..first_end].trim_end() == "---" {
        Some(&text[first_end + 1..])
    } else {
        None
    }
}

/// Read `version` and `updated_at`, defaulting whatever is missing or unparseable.
pub fn parse(header: &str) -> Frontmatter {
    let mut fm = Frontmatter::default();

    for line in header.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };

        match key.trim() {
            "version" => {
                let version = unquote(value);
                if !version.is_empty() {
                    fm.version = version;
                }
            }
            "updated_at" => {
                if let Ok(ts) = DateTime::parse_from_rfc3339(&unquote(value)) {
                    fm.updated_at = ts.with_timezone(&Utc);
                }
            }
            _ => {}
        }
    }

    fm
}

/// Render the header, including both `---` delimiter lines.
pub fn render(version: &str, updated_at: DateTime<Utc>) -> String {
    format!(
        "---\nversion: \"{}\"\nupdated_at: \"{}\"\n---\n",
        version.replace('\\', "\\\\").replace('"', "\\\""),
        updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Remove surrounding quotes from a value, undoing `\"` and `\\` inside double quotes.
fn unquote(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                    continue;
                }
            }
            out.push(c);
        }
        out
    } else if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn splits_header_from_body() {
        let content = "---\nversion: \"1.0\"\n---\n\n# Stakeholder: Ops\n";
        let (header, body) = split(content);
        assert_eq!(header, Some("version: \"1.0\"\n"));
        assert_eq!(body, "\n# Stakeholder: Ops\n");
    }

    #[test]
    fn missing_header_keeps_whole_body() {
        let content = "# Stakeholder: Ops\n---\n";
        let (header, body) = split(content);
        assert!(header.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn unterminated_header_is_not_a_header() {
        let content = "---\nversion: 2\n# Stakeholder: Ops\n";
        let (header, _) = split(content);
        assert!(header.is_none());
    }

    #[test]
    fn parses_and_defaults_fields() {
        let fm = parse("version: '2.1'\nupdated_at: 2025-03-01T10:00:00Z\nextra: x\n");
        assert_eq!(fm.version, "2.1");
        assert_eq!(fm.updated_at, Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());

        let fm = parse("updated_at: not a date\n");
        assert_eq!(fm.version, CURRENT_VERSION);
    }

    #[test]
    fn render_then_parse_keeps_values() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let rendered = render("1.0", ts);
        let (header, body) = split(&rendered);
        let fm = parse(header.unwrap());
        assert_eq!(fm.version, "1.0");
        assert_eq!(fm.updated_at, ts);
        assert!(body.is_empty());
    }
}
