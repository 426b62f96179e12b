//! Markdown preview rendering for personal notes.

mod assets;
pub mod components;
mod config;
mod markdown;
mod util;

pub use assets::{stylesheet, write_css_assets};
pub use config::Config;
pub use markdown::{
    Block, DEFAULT_PLACEHOLDER, Diagnostic, DiagnosticKind, HtmlPolicy, Inline, MarkdownRenderer,
    RenderError, Spans, parse_blocks, parse_inline, render_preview, write_blocks,
};
