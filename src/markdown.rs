//! Restricted markdown rendering for note previews.
//!
//! Source text is scanned line by line into typed blocks, each block's text
//! is scanned into inline spans, and the result is written as HTML. No
//! stage ever re-reads HTML produced by an earlier one.

mod block;
mod diagnostic;
mod html;
mod inline;
mod renderer;

pub use block::{Block, Spans, parse_blocks};
pub use diagnostic::{Diagnostic, DiagnosticKind, RenderError};
pub use html::{HtmlPolicy, write_blocks};
pub use inline::{Inline, parse_inline};
pub use renderer::{DEFAULT_PLACEHOLDER, MarkdownRenderer, render_preview};
