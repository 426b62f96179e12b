//! Page layout wrapper component

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::assets::stylesheet;

/// Wraps page content with standard HTML structure
///
/// Provides DOCTYPE, charset, viewport configuration, and the bundled
/// stylesheet inlined in a `style` element so the document is a single
/// self contained file.
///
/// # Arguments
///
/// * `title`: Page title text (without suffix)
/// * `body`: Page-specific body markup
///
/// # Returns
///
/// Complete HTML document with wrapped content
pub fn page_wrapper(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Notemark" }
                style { (PreEscaped(stylesheet())) }
            }
            body {
                div class="container" {
                    (body)
                }
            }
        }
    }
}
