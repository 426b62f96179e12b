//! Utility functions for notemark

/// URL schemes that execute script or embed arbitrary payloads when used as
/// link or image targets.
const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Escapes HTML special characters.
///
/// Covers the five characters that can open a tag, start an entity, or
/// terminate a quoted attribute value.
///
/// # Arguments
///
/// * `text`: Plain text to escape
///
/// # Returns
///
/// HTML safe string
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escapes only the double quote so a value cannot break out of its
/// attribute. Used when raw HTML pass-through is enabled.
pub fn escape_quotes(text: &str) -> String {
    text.replace('"', "&quot;")
}

/// Returns true when a link or image target uses a scheme that must not
/// reach the document.
///
/// Inline `data:image/` sources are allowed for images only. Leading
/// whitespace and ASCII case are ignored, matching how browsers resolve
/// the scheme.
///
/// # Arguments
///
/// * `url`: Target as written in the source
/// * `is_image`: Whether the target is an image source
pub fn is_unsafe_url(url: &str, is_image: bool) -> bool {
    let normalized: String = url
        .trim_start()
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();

    if is_image && normalized.starts_with("data:image/") {
        return false;
    }

    UNSAFE_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}
