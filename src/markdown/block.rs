//! Line oriented block scanning.
//!
//! Each source line is classified once. Fenced code is captured verbatim
//! before any other rule can see it, checklist lines are recognised before
//! plain list items, and runs of list, quote, table, and text lines are
//! grouped into a single block.

use super::diagnostic::{Diagnostic, DiagnosticKind};
use super::inline::{Inline, parse_inline};

/// Shortest backtick run that opens or closes a fence.
const FENCE_WIDTH: usize = 3;

/// Inline content of one line or cell.
pub type Spans = Vec<Inline>;

/// Block level element of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, content: Spans },
    CodeBlock { language: Option<String>, code: String },
    Task { done: bool, content: Spans },
    BulletList(Vec<Spans>),
    OrderedList { start: u64, items: Vec<Spans> },
    Table { header: Vec<Vec<Spans>>, body: Vec<Vec<Spans>> },
    Blockquote(Vec<Spans>),
    Rule,
    Paragraph(Vec<Spans>),
}

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Fence { width: usize, language: Option<&'a str> },
    Heading(u8, &'a str),
    Task(bool, &'a str),
    Quote(&'a str),
    Rule,
    Bullet(&'a str),
    Ordered(u64, &'a str),
    TableRow(&'a str),
    Text(&'a str),
}

/// Parses source text into blocks.
///
/// Malformed constructs are pushed to `diagnostics` and rendered as literal
/// text; parsing itself never fails.
pub fn parse_blocks(source: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<Block> {
    BlockScanner {
        lines: source.lines().collect(),
        pos: 0,
        blocks: Vec::new(),
        diagnostics,
    }
    .scan()
}

struct BlockScanner<'a, 'd> {
    lines: Vec<&'a str>,
    pos: usize,
    blocks: Vec<Block>,
    diagnostics: &'d mut Vec<Diagnostic>,
}

impl<'a> BlockScanner<'a, '_> {
    fn scan(mut self) -> Vec<Block> {
        while self.pos < self.lines.len() {
            let line = classify(self.lines[self.pos]);
            match line {
                Line::Blank => self.pos += 1,
                Line::Fence { width, language } => self.code_block(width, language),
                Line::Heading(level, text) => {
                    let content = self.inline(text, self.pos);
                    self.blocks.push(Block::Heading { level, content });
                    self.pos += 1;
                }
                Line::Task(done, text) => {
                    let content = self.inline(text, self.pos);
                    self.blocks.push(Block::Task { done, content });
                    self.pos += 1;
                }
                Line::Rule => {
                    self.blocks.push(Block::Rule);
                    self.pos += 1;
                }
                Line::Quote(_) => {
                    let lines = self.collect(|line| match line {
                        Line::Quote(text) => Some(text),
                        _ => None,
                    });
                    self.blocks.push(Block::Blockquote(lines));
                }
                Line::Bullet(_) => {
                    let items = self.collect(|line| match line {
                        Line::Bullet(text) => Some(text),
                        _ => None,
                    });
                    self.blocks.push(Block::BulletList(items));
                }
                Line::Ordered(start, _) => {
                    let items = self.collect(|line| match line {
                        Line::Ordered(_, text) => Some(text),
                        _ => None,
                    });
                    self.blocks.push(Block::OrderedList { start, items });
                }
                Line::TableRow(_) => self.table(),
                Line::Text(_) => self.paragraph(),
            }
        }

        self.blocks
    }

    fn inline(&mut self, text: &str, index: usize) -> Spans {
        parse_inline(text, index + 1, self.diagnostics)
    }

    /// Consumes consecutive lines accepted by `select`, parsing each one.
    fn collect<F>(&mut self, select: F) -> Vec<Spans>
    where
        F: Fn(Line<'a>) -> Option<&'a str>,
    {
        let mut items = Vec::new();
        while let Some(&raw) = self.lines.get(self.pos) {
            let Some(text) = select(classify(raw)) else {
                break;
            };
            items.push(self.inline(text, self.pos));
            self.pos += 1;
        }
        items
    }

    fn code_block(&mut self, width: usize, language: Option<&str>) {
        let open = self.pos;
        let close = self.lines[open + 1..]
            .iter()
            .position(|line| is_closing_fence(line, width))
            .map(|offset| open + 1 + offset);

        match close {
            Some(close) => {
                let code = self.lines[open + 1..close].join("\n");
                self.blocks.push(Block::CodeBlock {
                    language: language.map(String::from),
                    code,
                });
                self.pos = close + 1;
            }
            None => {
                self.diagnostics
                    .push(Diagnostic::new(open + 1, DiagnosticKind::UnclosedFence));
                self.paragraph();
            }
        }
    }

    /// Consumes a paragraph starting at the current line, which is taken as
    /// text whatever its classification.
    fn paragraph(&mut self) {
        let first = self.lines[self.pos].trim_end();
        let mut lines = vec![self.inline(first, self.pos)];
        self.pos += 1;

        while let Some(&raw) = self.lines.get(self.pos) {
            let Line::Text(text) = classify(raw) else {
                break;
            };
            lines.push(self.inline(text, self.pos));
            self.pos += 1;
        }

        self.blocks.push(Block::Paragraph(lines));
    }

    fn table(&mut self) {
        let mut header = Vec::new();
        let mut body = Vec::new();
        let mut seen_separator = false;
        let mut columns = None;

        while let Some(&raw) = self.lines.get(self.pos) {
            let Line::TableRow(row) = classify(raw) else {
                break;
            };

            let cells = split_cells(row);
            let expected = *columns.get_or_insert(cells.len());
            if cells.len() != expected {
                self.diagnostics.push(Diagnostic::new(
                    self.pos + 1,
                    DiagnosticKind::RaggedTableRow {
                        expected,
                        found: cells.len(),
                    },
                ));
            }

            if is_separator_row(&cells) {
                if !seen_separator {
                    seen_separator = true;
                    header = std::mem::take(&mut body);
                }
            } else {
                let index = self.pos;
                let parsed: Vec<Spans> = cells
                    .into_iter()
                    .map(|cell| self.inline(cell, index))
                    .collect();
                body.push(parsed);
            }

            self.pos += 1;
        }

        // A lone separator row has nothing to show
        if !header.is_empty() || !body.is_empty() {
            self.blocks.push(Block::Table { header, body });
        }
    }
}

fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim_end();
    if line.trim_start().is_empty() {
        return Line::Blank;
    }

    // Prefixes are matched before trimming so `# ` alone is an empty heading
    for (prefix, level) in [("### ", 3), ("## ", 2), ("# ", 1)] {
        if let Some(text) = raw.strip_prefix(prefix) {
            return Line::Heading(level, text.trim_end());
        }
    }

    let indented = line.trim_start();

    if let Some((width, language)) = fence_opener(indented) {
        return Line::Fence { width, language };
    }

    if let Some((done, text)) = task_item(indented) {
        return Line::Task(done, text);
    }

    if let Some(text) = raw.strip_prefix("> ") {
        return Line::Quote(text.trim_end());
    }

    if line == "---" || line == "***" {
        return Line::Rule;
    }

    if let Some(text) = bullet_item(indented) {
        return Line::Bullet(text);
    }

    if let Some((number, text)) = ordered_item(indented) {
        return Line::Ordered(number, text);
    }

    if indented.len() >= 2 && indented.starts_with('|') && indented.ends_with('|') {
        return Line::TableRow(indented);
    }

    Line::Text(line)
}

/// Parses a run of at least three backticks and its info string.
///
/// An info string containing a backtick means the line is inline code, not
/// a fence.
fn fence_opener(line: &str) -> Option<(usize, Option<&str>)> {
    let width = line.bytes().take_while(|&b| b == b'`').count();
    if width < FENCE_WIDTH {
        return None;
    }
    let info = &line[width..];
    if info.contains('`') {
        return None;
    }
    Some((width, info.split_whitespace().next()))
}

/// A closer is a line of backticks only, at least as long as the opener.
fn is_closing_fence(line: &str, width: usize) -> bool {
    let line = line.trim();
    line.len() >= width && line.bytes().all(|b| b == b'`')
}

/// Splits `- [ ] text` or `N. [x] text` into its state and text.
fn task_item(line: &str) -> Option<(bool, &str)> {
    let rest = match line.strip_prefix("- ") {
        Some(rest) => rest,
        None => {
            let (_, rest) = ordered_marker(line)?;
            rest
        }
    };

    let (done, text) = if let Some(text) = rest.strip_prefix("[ ]") {
        (false, text)
    } else if let Some(text) = rest
        .strip_prefix("[x]")
        .or_else(|| rest.strip_prefix("[X]"))
    {
        (true, text)
    } else {
        return None;
    };

    match text.strip_prefix(' ') {
        Some(text) => Some((done, text)),
        None if text.is_empty() => Some((done, text)),
        None => None,
    }
}

fn bullet_item(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let marker = chars.next()?;
    if !matches!(marker, '-' | '*' | '+') {
        return None;
    }
    let rest = chars.as_str();
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start())
}

fn ordered_item(line: &str) -> Option<(u64, &str)> {
    let (number, rest) = ordered_marker(line)?;
    Some((number, rest.trim_start()))
}

/// Parses `N.` followed by whitespace, returning the number and the text
/// after the first whitespace character.
fn ordered_marker(line: &str) -> Option<(u64, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    // Digits only, so parsing fails on overflow alone
    let number = line[..digits].parse().unwrap_or(u64::MAX);
    let rest = line[digits..].strip_prefix('.')?;
    let mut chars = rest.chars();
    if !chars.next()?.is_whitespace() {
        return None;
    }
    Some((number, chars.as_str()))
}

fn split_cells(row: &str) -> Vec<&str> {
    row[1..row.len() - 1].split('|').map(str::trim).collect()
}

fn is_separator_row(cells: &[&str]) -> bool {
    cells.iter().all(|cell| {
        cell.contains('-') && cell.chars().all(|c| matches!(c, '-' | ':' | ' '))
    })
}
