//! Rendered note article component

use maud::{Markup, PreEscaped, html};

use super::layout::page_wrapper;

/// Builds a standalone document around a rendered fragment.
///
/// The fragment is inserted without escaping; it must come from
/// [`MarkdownRenderer`](crate::MarkdownRenderer).
pub fn preview_page(title: &str, fragment: &str) -> Markup {
    page_wrapper(
        title,
        html! {
            h1 class="page-title" { (title) }
            article class="markdown-body" {
                (PreEscaped(fragment))
            }
        },
    )
}
