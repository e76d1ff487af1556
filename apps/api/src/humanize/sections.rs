//! Markdown sectionizer and reassembler.
//!
//! A section is a heading line plus the literal lines up to the next heading.
//! Lines before the first heading form a headingless preamble section.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::humanize::word_count;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// The heading line exactly as written, empty for the preamble.
    pub raw_heading: String,
    pub heading_text: String,
    /// 1-6, or 0 when there is no heading.
    pub level: u8,
    pub body: String,
}

impl Section {
    pub fn has_heading(&self) -> bool {
        !self.raw_heading.is_empty()
    }
}

/// Parses a heading line into `(level, heading_text)`.
/// Anything that fails the pattern (e.g. `#NoSpace`) is body text.
pub fn parse_heading(line: &str) -> Option<(u8, String)> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps[1].len() as u8;
    Some((level, caps[2].trim().to_string()))
}

/// Splits a markdown document into sections in document order.
pub fn sectionize(markdown: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = SectionBuilder::preamble();

    for line in markdown.lines() {
        match parse_heading(line) {
            Some((level, heading_text)) => {
                let finished = std::mem::replace(
                    &mut current,
                    SectionBuilder {
                        raw_heading: line.to_string(),
                        heading_text,
                        level,
                        lines: Vec::new(),
                    },
                );
                finished.finish_into(&mut sections);
            }
            None => current.lines.push(line),
        }
    }
    current.finish_into(&mut sections);

    sections
}

struct SectionBuilder<'a> {
    raw_heading: String,
    heading_text: String,
    level: u8,
    lines: Vec<&'a str>,
}

impl<'a> SectionBuilder<'a> {
    fn preamble() -> Self {
        Self {
            raw_heading: String::new(),
            heading_text: String::new(),
            level: 0,
            lines: Vec::new(),
        }
    }

    /// Headingless sections survive only when they carry content.
    fn finish_into(self, sections: &mut Vec<Section>) {
        let body = self.lines.join("\n");
        if self.raw_heading.is_empty() && body.trim().is_empty() {
            return;
        }
        sections.push(Section {
            raw_heading: self.raw_heading,
            heading_text: self.heading_text,
            level: self.level,
            body,
        });
    }
}

/// Rejoins sections into one document, heading then body, pieces separated by a blank line.
pub fn reassemble(sections: &[Section]) -> String {
    sections
        .iter()
        .flat_map(|s| [s.raw_heading.as_str(), trim_blank_lines(&s.body)])
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn trim_blank_lines(body: &str) -> &str {
    body.trim_matches(|c| c == '\n' || c == '\r')
}

/// Word count of a document's body text, heading lines excluded.
pub fn content_word_count(markdown: &str) -> usize {
    markdown
        .lines()
        .filter(|line| parse_heading(line).is_none())
        .map(word_count)
        .sum()
}
