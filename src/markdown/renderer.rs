//! Markdown preview rendering for notes.

use anyhow::{Context, Result};
use std::path::Path;

use super::block::{Block, parse_blocks};
use super::diagnostic::{Diagnostic, RenderError};
use super::html::{HtmlPolicy, write_blocks};
use crate::util::escape_html;

/// Text shown when a note has no content.
pub const DEFAULT_PLACEHOLDER: &str = "No content yet";

/// Renders restricted markdown notes to HTML fragments.
///
/// Supports headings (levels 1 to 3), fenced code, inline code, checklist
/// items, bold and italic emphasis, strikethrough, links, images,
/// blockquotes, horizontal rules, bullet and numbered lists, and pipe
/// tables. Rendering is pure: the same input and options always produce
/// byte identical output, and every input produces output.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    policy: HtmlPolicy,
    placeholder: String,
}

impl MarkdownRenderer {
    /// Creates renderer that escapes HTML in note text.
    pub fn new() -> Self {
        Self {
            policy: HtmlPolicy::Escape,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    /// Creates renderer that passes HTML in note text through untouched.
    ///
    /// Only suitable for notes whose author is the reader. Code content is
    /// still escaped.
    pub fn with_raw_html() -> Self {
        Self {
            policy: HtmlPolicy::Raw,
            ..Self::new()
        }
    }

    /// Replaces the text shown for empty notes.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Returns the HTML policy in effect.
    pub fn policy(&self) -> HtmlPolicy {
        self.policy
    }

    /// Renders markdown content to an HTML fragment.
    ///
    /// Empty or whitespace only content renders the placeholder paragraph.
    /// Malformed constructs are rendered as literal text.
    ///
    /// # Arguments
    ///
    /// * `content`: Markdown content to render
    ///
    /// # Returns
    ///
    /// Rendered HTML fragment
    pub fn render(&self, content: &str) -> String {
        let (blocks, _) = parse(content);
        self.emit(content, &blocks)
    }

    /// Lists malformed constructs in source order.
    pub fn diagnostics(&self, content: &str) -> Vec<Diagnostic> {
        parse(content).1
    }

    /// Renders markdown content, rejecting malformed constructs.
    ///
    /// # Errors
    ///
    /// Returns the first malformed construct found, with the total count
    pub fn render_strict(&self, content: &str) -> Result<String, RenderError> {
        let (blocks, diagnostics) = parse(content);
        let total = diagnostics.len();

        if let Some(diagnostic) = diagnostics.into_iter().next() {
            tracing::debug!(%diagnostic, total, "strict render rejected note");
            return Err(RenderError::Malformed { diagnostic, total });
        }

        Ok(self.emit(content, &blocks))
    }

    /// Renders markdown file at given path.
    ///
    /// Convenience method that reads file and renders content.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read as UTF-8
    pub fn render_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read markdown file: {}", path.display()))?;
        Ok(self.render(&content))
    }

    fn emit(&self, content: &str, blocks: &[Block]) -> String {
        if blocks.is_empty() {
            return format!(
                "<p class=\"md-placeholder\">{}</p>",
                escape_html(&self.placeholder)
            );
        }

        let html = write_blocks(blocks, self.policy);
        tracing::debug!(
            input_bytes = content.len(),
            blocks = blocks.len(),
            output_bytes = html.len(),
            "rendered markdown preview"
        );
        html
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders note content with the default renderer.
pub fn render_preview(content: &str) -> String {
    MarkdownRenderer::new().render(content)
}

fn parse(content: &str) -> (Vec<Block>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let blocks = parse_blocks(content, &mut diagnostics);
    (blocks, diagnostics)
}
