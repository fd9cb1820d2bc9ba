// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Markdown normalization and section splitting for issue bodies

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};
use std::collections::BTreeMap;

/// Heading marker that starts a submission section
const SECTION_MARKER: &str = "### ";

/// A `### ` section of an issue body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text
    pub title: String,
    /// Non-empty body lines, trimmed and joined with single spaces
    pub body: String,
}

/// Collapse formatting irregularities so section splitting sees one heading style.
///
/// Line endings become `\n`, trailing whitespace is dropped, every top-level
/// heading the CommonMark parser recognizes (ATX or setext) is rewritten as
/// `<hashes> <title>`, blank-line runs collapse to one, and the result has no
/// leading blank lines and exactly one trailing newline. Other lines keep
/// their source text.
#[must_use]
pub fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let headings = headings(&text);

    let mut lines: Vec<String> = Vec::new();
    let mut consumed_until = 0;
    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        if number <= consumed_until {
            continue;
        }
        let line = match headings.get(&number) {
            Some(heading) => {
                consumed_until = heading.end_line;
                heading.render()
            }
            None => raw.trim_end().to_string(),
        };

        let blank = line.is_empty();
        if blank && lines.last().map_or(true, String::is_empty) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// A heading found by the parser, with the source lines it spans
#[derive(Debug)]
struct Heading {
    level: u8,
    title: String,
    end_line: usize,
}

impl Heading {
    fn render(&self) -> String {
        let hashes = "#".repeat(usize::from(self.level));
        if self.title.is_empty() {
            hashes
        } else {
            format!("{hashes} {}", self.title)
        }
    }
}

/// Top-level headings keyed by their 1-based start line
fn headings(text: &str) -> BTreeMap<usize, Heading> {
    let arena = Arena::new();
    let root = parse_document(&arena, text, &Options::default());

    let mut headings = BTreeMap::new();
    for node in root.children() {
        let ast = node.data.borrow();
        let NodeValue::Heading(ref heading) = ast.value else {
            continue;
        };
        headings.insert(
            ast.sourcepos.start.line,
            Heading {
                level: heading.level,
                title: inline_text(node),
                end_line: ast.sourcepos.end.line,
            },
        );
    }
    headings
}

/// Plain text of a node's inline content, line breaks read as spaces
fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for descendant in node.descendants() {
        match &descendant.data.borrow().value {
            NodeValue::Text(literal) => text.push_str(literal),
            NodeValue::Code(code) => text.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Split a normalized document into `### ` sections.
///
/// Text before the first heading is dropped. A section without body lines
/// gets an empty body.
#[must_use]
pub fn split_sections(document: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in document.lines() {
        if let Some(title) = line.strip_prefix(SECTION_MARKER) {
            if let Some((title, body)) = current.take() {
                sections.push(finish(title, &body));
            }
            current = Some((title.trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                body.push(trimmed);
            }
        }
    }
    if let Some((title, body)) = current {
        sections.push(finish(title, &body));
    }

    sections
}

fn finish(title: String, body: &[&str]) -> Section {
    Section {
        title,
        body: body.join(" "),
    }
}
