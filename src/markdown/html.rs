//! HTML emission for parsed blocks.

use std::fmt::Write;

use super::block::{Block, Spans};
use super::inline::Inline;
use crate::util::{escape_html, escape_quotes, is_unsafe_url};

/// Treatment of HTML significant characters in note text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlPolicy {
    /// Escape plain text and neutralise script URLs.
    #[default]
    Escape,
    /// Pass plain text through untouched. Code is still escaped and
    /// attribute values still cannot break out of their quotes.
    Raw,
}

/// Inline style for completed checklist items, so fragments look right
/// without the bundled stylesheet.
const DONE_STYLE: &str = "text-decoration: line-through; opacity: 0.6";

/// Writes blocks as an HTML fragment, one block per line.
pub fn write_blocks(blocks: &[Block], policy: HtmlPolicy) -> String {
    let mut writer = HtmlWriter {
        out: String::new(),
        policy,
    };

    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            writer.out.push('\n');
        }
        writer.block(block);
    }

    writer.out
}

struct HtmlWriter {
    out: String,
    policy: HtmlPolicy,
}

impl HtmlWriter {
    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, content } => {
                let _ = write!(self.out, "<h{}>", level);
                self.spans(content);
                let _ = write!(self.out, "</h{}>", level);
            }
            Block::CodeBlock { language, code } => {
                match language {
                    Some(language) => {
                        let _ = write!(
                            self.out,
                            "<pre><code class=\"language-{}\">",
                            escape_html(language)
                        );
                    }
                    None => self.out.push_str("<pre><code>"),
                }
                self.out.push_str(&escape_html(code));
                self.out.push_str("</code></pre>");
            }
            Block::Task { done, content } => {
                if *done {
                    self.out.push_str(
                        "<div class=\"md-task md-task-done\">\
                         <input type=\"checkbox\" checked disabled> ",
                    );
                    let _ = write!(self.out, "<span style=\"{}\">", DONE_STYLE);
                } else {
                    self.out.push_str(
                        "<div class=\"md-task\"><input type=\"checkbox\" disabled> <span>",
                    );
                }
                self.spans(content);
                self.out.push_str("</span></div>");
            }
            Block::BulletList(items) => {
                self.out.push_str("<ul>");
                self.items(items);
                self.out.push_str("</ul>");
            }
            Block::OrderedList { start, items } => {
                if *start == 1 {
                    self.out.push_str("<ol>");
                } else {
                    let _ = write!(self.out, "<ol start=\"{}\">", start);
                }
                self.items(items);
                self.out.push_str("</ol>");
            }
            Block::Table { header, body } => {
                self.out.push_str("<table>");
                if !header.is_empty() {
                    self.out.push_str("<thead>");
                    self.rows(header, "th");
                    self.out.push_str("</thead>");
                }
                if !body.is_empty() {
                    self.out.push_str("<tbody>");
                    self.rows(body, "td");
                    self.out.push_str("</tbody>");
                }
                self.out.push_str("</table>");
            }
            Block::Blockquote(lines) => {
                self.out.push_str("<blockquote>");
                self.lines(lines);
                self.out.push_str("</blockquote>");
            }
            Block::Rule => self.out.push_str("<hr>"),
            Block::Paragraph(lines) => {
                self.out.push_str("<p>");
                self.lines(lines);
                self.out.push_str("</p>");
            }
        }
    }

    fn items(&mut self, items: &[Spans]) {
        for item in items {
            self.out.push_str("<li>");
            self.spans(item);
            self.out.push_str("</li>");
        }
    }

    fn rows(&mut self, rows: &[Vec<Spans>], cell_tag: &str) {
        for row in rows {
            self.out.push_str("<tr>");
            for cell in row {
                let _ = write!(self.out, "<{}>", cell_tag);
                self.spans(cell);
                let _ = write!(self.out, "</{}>", cell_tag);
            }
            self.out.push_str("</tr>");
        }
    }

    fn lines(&mut self, lines: &[Spans]) {
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                self.out.push_str("<br>");
            }
            self.spans(line);
        }
    }

    fn spans(&mut self, spans: &[Inline]) {
        for span in spans {
            self.inline(span);
        }
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => self.text(text),
            Inline::Code(code) => {
                self.out.push_str("<code>");
                self.out.push_str(&escape_html(code));
                self.out.push_str("</code>");
            }
            Inline::Emphasis(children) => self.wrap("em", children),
            Inline::Strong(children) => self.wrap("strong", children),
            Inline::StrongEmphasis(children) => {
                self.out.push_str("<strong><em>");
                self.spans(children);
                self.out.push_str("</em></strong>");
            }
            Inline::Strike(children) => self.wrap("del", children),
            Inline::Link { label, url } => {
                let href = self.url(url, false);
                let _ = write!(
                    self.out,
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">",
                    href
                );
                self.spans(label);
                self.out.push_str("</a>");
            }
            Inline::Image { alt, url } => {
                let src = self.url(url, true);
                let alt = self.attribute(alt);
                let _ = write!(self.out, "<img src=\"{}\" alt=\"{}\">", src, alt);
            }
        }
    }

    fn wrap(&mut self, tag: &str, children: &[Inline]) {
        let _ = write!(self.out, "<{}>", tag);
        self.spans(children);
        let _ = write!(self.out, "</{}>", tag);
    }

    fn text(&mut self, text: &str) {
        match self.policy {
            HtmlPolicy::Escape => self.out.push_str(&escape_html(text)),
            HtmlPolicy::Raw => self.out.push_str(text),
        }
    }

    fn attribute(&self, value: &str) -> String {
        match self.policy {
            HtmlPolicy::Escape => escape_html(value),
            HtmlPolicy::Raw => escape_quotes(value),
        }
    }

    fn url(&self, url: &str, is_image: bool) -> String {
        if self.policy == HtmlPolicy::Escape && is_unsafe_url(url, is_image) {
            return "#".to_string();
        }
        self.attribute(url)
    }
}
