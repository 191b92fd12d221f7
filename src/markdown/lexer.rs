//! Line-oriented tokenizer for stakeholder documents.
//!
//! The parser never pattern-matches over raw text. Each line becomes a
//! [`Line`] token, tokens are grouped into top-level [`Section`]s by `# `
//! headings, and sections into [`Subsection`]s by `## ` headings. Records are
//! built from that structure.

/// A single classified line. Payloads are trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `# heading`
    Heading1(&'a str),
    /// `## heading`
    Heading2(&'a str),
    /// `- item` or `* item`
    Bullet(&'a str),
    /// `N. item`; the printed number is discarded.
    Numbered(&'a str),
    /// `---` (three or more dashes)
    Rule,
    Blank,
    Text(&'a str),
}

pub fn lex_line(raw: &str) -> Line<'_> {
    let line = raw.trim();

    if line.is_empty() {
        return Line::Blank;
    }
    if line.len() >= 3 && line.chars().all(|c| c == '-') {
        return Line::Rule;
    }
    if line == "##" {
        return Line::Heading2("");
    }
    if line == "#" {
        return Line::Heading1("");
    }
    if let Some(rest) = line.strip_prefix("## ") {
        return Line::Heading2(rest.trim());
    }
    if let Some(rest) = line.strip_prefix("# ") {
        return Line::Heading1(rest.trim());
    }
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Line::Bullet(rest.trim());
    }
    if let Some(rest) = strip_list_number(line) {
        return Line::Numbered(rest.trim());
    }

    Line::Text(line)
}

/// Strip a leading `N. ` marker.
fn strip_list_number(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

/// A `# ` heading and every line up to the next `# ` heading.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub heading: &'a str,
    pub lines: Vec<Line<'a>>,
}

/// A `## ` heading inside a section and the lines up to the next `## ` heading.
#[derive(Debug, Clone)]
pub struct Subsection<'a> {
    pub heading: &'a str,
    pub lines: Vec<Line<'a>>,
}

impl<'a> Section<'a> {
    /// Lines before the first `## ` heading are dropped.
    pub fn subsections(&self) -> Vec<Subsection<'a>> {
        let mut out: Vec<Subsection<'a>> = Vec::new();
        for line in &self.lines {
            match *line {
                Line::Heading2(heading) => out.push(Subsection {
                    heading,
                    lines: Vec::new(),
                }),
                other => {
                    if let Some(current) = out.last_mut() {
                        current.lines.push(other);
                    }
                }
            }
        }
        out
    }
}

impl<'a> Subsection<'a> {
    pub fn bullets(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().filter_map(|line| match *line {
            Line::Bullet(text) => Some(text),
            _ => None,
        })
    }

    /// Numbered items, falling back to bullets for hand-edited lists.
    pub fn list_items(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().filter_map(|line| match *line {
            Line::Numbered(text) | Line::Bullet(text) => Some(text),
            _ => None,
        })
    }
}

/// Split a document body into top-level sections. Text before the first
/// `# ` heading belongs to no section and is dropped.
pub fn sections(body: &str) -> Vec<Section<'_>> {
    let mut out: Vec<Section<'_>> = Vec::new();
    for raw in body.lines() {
        match lex_line(raw) {
            Line::Heading1(heading) => out.push(Section {
                heading,
                lines: Vec::new(),
            }),
            line => {
                if let Some(current) = out.last_mut() {
                    current.lines.push(line);
                }
            }
        }
    }
    out
}
