//! Reversible escaping for goal text in the Goal-Issue Links section.
//!
//! Link lines look like `- **<goal>**: #1, #2`, so a literal `**` inside the
//! goal would close the bold delimiter early. Every `**` pair is written as
//! `\*\*`. Backslashes are doubled so that text which already looks escaped
//! survives the round trip.

/// Escape goal text for use between `**` delimiters.
pub fn escape_goal_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str("\\*\\*");
            }
            _ => out.push(c),
        }
    }

    out
}

/// Inverse of [`escape_goal_text`]. `\\` reads as `\`, `\*` as `*`; any other
/// backslash is kept as written.
pub fn unescape_goal_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&next @ ('\\' | '*')) => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_bold_markers() {
        assert_eq!(
            escape_goal_text("Goal with **bold** text"),
            r"Goal with \*\*bold\*\* text"
        );
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(escape_goal_text("Complete tasks quickly"), "Complete tasks quickly");
        assert_eq!(escape_goal_text("a * b"), "a * b");
    }

    #[test]
    fn unescapes_hand_written_sequences() {
        assert_eq!(unescape_goal_text(r"\*\*bold\*\*"), "**bold**");
        assert_eq!(unescape_goal_text(r"C:\temp"), r"C:\temp");
    }

    #[test]
    fn inverse_holds_for_tricky_inputs() {
        let cases = [
            "",
            "**",
            "***",
            "****",
            r"\*\*",
            r"already \*\* escaped",
            r"trailing\",
            r"\\",
            "*a*b**c***",
            "mixed \\** and *\\*",
        ];
        for case in cases {
            assert_eq!(unescape_goal_text(&escape_goal_text(case)), case, "case {case:?}");
        }
    }
}
