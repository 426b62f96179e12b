//! Inline span scanning.
//!
//! Turns the text of a single block line into a tree of [`Inline`] nodes.
//! Precedence at any position: code span, emphasis (triple, double, single
//! asterisk), strikethrough, image, link. All delimiters are ASCII, so the
//! scanner walks bytes and only ever slices at delimiter boundaries.

use super::diagnostic::{Diagnostic, DiagnosticKind};

/// Inline node of a rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    StrongEmphasis(Vec<Inline>),
    Strike(Vec<Inline>),
    Link { label: Vec<Inline>, url: String },
    Image { alt: String, url: String },
}

/// Result of attempting a construct at a position.
enum Step {
    /// Construct recognised, scanning resumes at the given offset.
    Node(Inline, usize),
    /// Not a construct; bytes up to the given offset are literal text.
    Literal(usize),
}

/// Parses inline spans of one line.
///
/// # Arguments
///
/// * `text`: Line content with any block marker already stripped
/// * `line`: 1-based source line, used for diagnostics
/// * `diagnostics`: Sink for malformed constructs
pub fn parse_inline(text: &str, line: usize, diagnostics: &mut Vec<Diagnostic>) -> Vec<Inline> {
    InlineScanner {
        src: text,
        bytes: text.as_bytes(),
        line,
        diagnostics,
        lookahead: [None; 3],
    }
    .scan()
}

/// Bytes whose forward searches are memoised per line.
const LOOKAHEAD: [u8; 3] = [b'`', b']', b')'];

struct InlineScanner<'a, 'd> {
    src: &'a str,
    bytes: &'a [u8],
    line: usize,
    diagnostics: &'d mut Vec<Diagnostic>,
    /// Last search per `LOOKAHEAD` byte: start offset and result.
    lookahead: [Option<(usize, Option<usize>)>; 3],
}

impl InlineScanner<'_, '_> {
    fn scan(mut self) -> Vec<Inline> {
        let mut nodes = Vec::new();
        let mut text_start = 0;
        let mut pos = 0;

        while pos < self.bytes.len() {
            let step = match self.bytes[pos] {
                b'`' => self.code_span(pos),
                b'*' => self.emphasis(pos),
                b'~' => self.strike(pos),
                b'!' => self.image(pos),
                b'[' => self.link(pos),
                _ => Step::Literal(pos + 1),
            };

            match step {
                Step::Node(node, end) => {
                    if text_start < pos {
                        nodes.push(Inline::Text(self.src[text_start..pos].to_string()));
                    }
                    nodes.push(node);
                    pos = end;
                    text_start = end;
                }
                Step::Literal(end) => pos = end,
            }
        }

        if text_start < self.bytes.len() {
            nodes.push(Inline::Text(self.src[text_start..].to_string()));
        }

        nodes
    }

    fn report(&mut self, kind: DiagnosticKind) {
        self.diagnostics.push(Diagnostic::new(self.line, kind));
    }

    fn nested(&mut self, start: usize, end: usize) -> Vec<Inline> {
        parse_inline(&self.src[start..end], self.line, self.diagnostics)
    }

    /// Finds the first `needle` at or after `from`.
    ///
    /// A search from `start` that found `p` answers every later search from
    /// `start..=p`, and one that found nothing answers every search from
    /// `start` on, so runs of unmatched brackets stay linear.
    fn next_byte(&mut self, from: usize, needle: u8) -> Option<usize> {
        let Some(slot) = LOOKAHEAD.iter().position(|&b| b == needle) else {
            return find_byte(self.bytes, from, needle);
        };

        if let Some((start, found)) = self.lookahead[slot]
            && start <= from
            && found.is_none_or(|p| from <= p)
        {
            return found;
        }

        let found = find_byte(self.bytes, from, needle);
        self.lookahead[slot] = Some((from, found));
        found
    }

    fn code_span(&mut self, pos: usize) -> Step {
        let run = run_length(self.bytes, pos, b'`');
        if run > 1 {
            return Step::Literal(pos + run);
        }

        match self.next_byte(pos + 1, b'`') {
            Some(close) => Step::Node(
                Inline::Code(self.src[pos + 1..close].to_string()),
                close + 1,
            ),
            None => {
                self.report(DiagnosticKind::UnclosedCodeSpan);
                Step::Literal(pos + 1)
            }
        }
    }

    fn emphasis(&mut self, pos: usize) -> Step {
        let run = run_length(self.bytes, pos, b'*');

        for width in (1..=run.min(3)).rev() {
            let open_end = pos + width;
            let Some(close) = find_closer(self.bytes, open_end, b'*', width, true) else {
                continue;
            };

            let children = self.nested(open_end, close);
            let node = match width {
                3 => Inline::StrongEmphasis(children),
                2 => Inline::Strong(children),
                _ => Inline::Emphasis(children),
            };
            return Step::Node(node, close + width);
        }

        // A lone asterisk is ordinary prose ("2 * 3"), only runs are suspicious
        if run >= 3 {
            self.report(DiagnosticKind::UnmatchedDelimiter("***"));
        } else if run == 2 {
            self.report(DiagnosticKind::UnmatchedDelimiter("**"));
        }
        Step::Literal(pos + run)
    }

    fn strike(&mut self, pos: usize) -> Step {
        let run = run_length(self.bytes, pos, b'~');
        if run < 2 {
            return Step::Literal(pos + run);
        }

        match find_closer(self.bytes, pos + 2, b'~', 2, false) {
            Some(close) => {
                let children = self.nested(pos + 2, close);
                Step::Node(Inline::Strike(children), close + 2)
            }
            None => {
                self.report(DiagnosticKind::UnmatchedDelimiter("~~"));
                Step::Literal(pos + run)
            }
        }
    }

    fn image(&mut self, pos: usize) -> Step {
        if self.bytes.get(pos + 1) != Some(&b'[') {
            return Step::Literal(pos + 1);
        }

        match self.target(pos + 1, true) {
            Some(target) => Step::Node(
                Inline::Image {
                    alt: self.src[target.label_start..target.label_end].to_string(),
                    url: self.src[target.url_start..target.url_end].trim().to_string(),
                },
                target.url_end + 1,
            ),
            // Any link at `pos + 1` would need a stricter target than the one
            // that just failed, so the bracket is literal as well.
            None => Step::Literal(pos + 2),
        }
    }

    fn link(&mut self, pos: usize) -> Step {
        match self.target(pos, false) {
            Some(target) => {
                let label = self.nested(target.label_start, target.label_end);
                Step::Node(
                    Inline::Link {
                        label,
                        url: self.src[target.url_start..target.url_end].trim().to_string(),
                    },
                    target.url_end + 1,
                )
            }
            None => Step::Literal(pos + 1),
        }
    }

    /// Locates `[label](url)` starting at the opening bracket.
    fn target(&mut self, bracket: usize, allow_empty_label: bool) -> Option<Target> {
        let label_start = bracket + 1;
        let label_end = self.next_byte(label_start, b']')?;
        if label_end == label_start && !allow_empty_label {
            return None;
        }
        if self.bytes.get(label_end + 1) != Some(&b'(') {
            return None;
        }

        let url_start = label_end + 2;
        let Some(url_end) = self.next_byte(url_start, b')') else {
            self.report(DiagnosticKind::MalformedLink);
            return None;
        };
        if self.src[url_start..url_end].trim().is_empty() {
            return None;
        }

        Some(Target {
            label_start,
            label_end,
            url_start,
            url_end,
        })
    }
}

struct Target {
    label_start: usize,
    label_end: usize,
    url_start: usize,
    url_end: usize,
}

fn run_length(bytes: &[u8], pos: usize, delim: u8) -> usize {
    bytes[pos..].iter().take_while(|&&b| b == delim).count()
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|offset| from + offset)
}

/// Finds the closing delimiter run for content starting at `from`.
///
/// Content must be non-empty. With `exact` the closing run must have
/// exactly `width` delimiters, otherwise at least `width`. Code spans are
/// skipped so delimiters inside them never close anything.
fn find_closer(bytes: &[u8], from: usize, delim: u8, width: usize, exact: bool) -> Option<usize> {
    let mut i = from;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'`' {
            i = skip_code_span(bytes, i);
        } else if b == delim {
            let run = run_length(bytes, i, delim);
            let fits = if exact { run == width } else { run >= width };
            if i > from && fits {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }

    None
}

fn skip_code_span(bytes: &[u8], pos: usize) -> usize {
    let run = run_length(bytes, pos, b'`');
    if run > 1 {
        return pos + run;
    }
    find_byte(bytes, pos + 1, b'`').map_or(pos + 1, |close| close + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Vec<Inline> {
        let mut diagnostics = Vec::new();
        parse_inline(text, 1, &mut diagnostics)
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_plain_text_single_node() {
        assert_eq!(parse("just words"), vec![text("just words")]);
    }

    #[test]
    fn test_emphasis_precedence() {
        // Arrange
        let source = "***both*** **bold** *it*";

        // Act
        let nodes = parse(source);

        // Assert
        assert_eq!(
            nodes,
            vec![
                Inline::StrongEmphasis(vec![text("both")]),
                text(" "),
                Inline::Strong(vec![text("bold")]),
                text(" "),
                Inline::Emphasis(vec![text("it")]),
            ]
        );
    }

    #[test]
    fn test_bold_does_not_swallow_neighbouring_text() {
        assert_eq!(
            parse("**bold** and *italic*"),
            vec![
                Inline::Strong(vec![text("bold")]),
                text(" and "),
                Inline::Emphasis(vec![text("italic")]),
            ]
        );
    }

    #[test]
    fn test_italic_wrapping_bold() {
        assert_eq!(
            parse("*a **b** c*"),
            vec![Inline::Emphasis(vec![
                text("a "),
                Inline::Strong(vec![text("b")]),
                text(" c"),
            ])]
        );
    }

    #[test]
    fn test_triple_opener_with_double_closer() {
        assert_eq!(
            parse("***a**"),
            vec![Inline::Strong(vec![text("*a")])]
        );
    }

    #[test]
    fn test_lone_asterisk_is_literal() {
        let mut diagnostics = Vec::new();
        let nodes = parse_inline("2 * 3 = 6", 1, &mut diagnostics);

        assert_eq!(nodes, vec![text("2 * 3 = 6")]);
        assert!(diagnostics.is_empty(), "Lone asterisk is not malformed");
    }

    #[test]
    fn test_empty_emphasis_not_recognised() {
        assert_eq!(parse("****"), vec![text("****")]);
    }

    #[test]
    fn test_code_span_is_opaque() {
        assert_eq!(
            parse("run `a **b** c` now"),
            vec![
                text("run "),
                Inline::Code("a **b** c".to_string()),
                text(" now"),
            ]
        );
    }

    #[test]
    fn test_emphasis_closer_skips_code_span() {
        assert_eq!(
            parse("*x `*` y*"),
            vec![Inline::Emphasis(vec![
                text("x "),
                Inline::Code("*".to_string()),
                text(" y"),
            ])]
        );
    }

    #[test]
    fn test_strikethrough_with_nested_bold() {
        assert_eq!(
            parse("~~old **news**~~"),
            vec![Inline::Strike(vec![
                text("old "),
                Inline::Strong(vec![text("news")]),
            ])]
        );
    }

    #[test]
    fn test_single_tilde_literal() {
        assert_eq!(parse("~approx~"), vec![text("~approx~")]);
    }

    #[test]
    fn test_link_with_formatted_label() {
        assert_eq!(
            parse("see [the **docs**](https://example.com) now"),
            vec![
                text("see "),
                Inline::Link {
                    label: vec![text("the "), Inline::Strong(vec![text("docs")])],
                    url: "https://example.com".to_string(),
                },
                text(" now"),
            ]
        );
    }

    #[test]
    fn test_image_takes_precedence_over_link() {
        assert_eq!(
            parse("![logo](img/logo.png)"),
            vec![Inline::Image {
                alt: "logo".to_string(),
                url: "img/logo.png".to_string(),
            }]
        );
    }

    #[test]
    fn test_image_with_empty_alt() {
        assert_eq!(
            parse("![](a.png)"),
            vec![Inline::Image {
                alt: String::new(),
                url: "a.png".to_string(),
            }]
        );
    }

    #[test]
    fn test_bracket_without_target_is_literal() {
        let mut diagnostics = Vec::new();
        let nodes = parse_inline("[todo] later", 1, &mut diagnostics);

        assert_eq!(nodes, vec![text("[todo] later")]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unicode_text_preserved() {
        assert_eq!(
            parse("héllo **wörld** ✓"),
            vec![
                text("héllo "),
                Inline::Strong(vec![text("wörld")]),
                text(" ✓"),
            ]
        );
    }

    #[test]
    fn test_diagnostics_for_unclosed_constructs() {
        // Arrange
        let mut diagnostics = Vec::new();

        // Act
        let nodes = parse_inline("**open `tick ~~gone [x](y", 4, &mut diagnostics);

        // Assert
        assert_eq!(nodes, vec![text("**open `tick ~~gone [x](y")]);
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::new(4, DiagnosticKind::UnmatchedDelimiter("**")),
                Diagnostic::new(4, DiagnosticKind::UnclosedCodeSpan),
                Diagnostic::new(4, DiagnosticKind::UnmatchedDelimiter("~~")),
                Diagnostic::new(4, DiagnosticKind::MalformedLink),
            ]
        );
    }

    #[test]
    fn test_malformed_image_reported_once() {
        let mut diagnostics = Vec::new();
        parse_inline("![alt](broken", 2, &mut diagnostics);

        assert_eq!(
            diagnostics,
            vec![Diagnostic::new(2, DiagnosticKind::MalformedLink)]
        );
    }

    #[test]
    fn test_unmatched_triple_asterisk_reported() {
        let mut diagnostics = Vec::new();
        let nodes = parse_inline("***open", 1, &mut diagnostics);

        assert_eq!(nodes, vec![text("***open")]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::new(1, DiagnosticKind::UnmatchedDelimiter("***"))]
        );
    }

    #[test]
    fn test_link_after_bracketed_text() {
        assert_eq!(
            parse("[a] then [b](c)"),
            vec![
                text("[a] then "),
                Inline::Link {
                    label: vec![text("b")],
                    url: "c".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_code_spans_after_closed_span() {
        // Arrange
        let mut diagnostics = Vec::new();

        // Act
        let nodes = parse_inline("`a` and `b` then ` lone", 1, &mut diagnostics);

        // Assert
        assert_eq!(
            nodes,
            vec![
                Inline::Code("a".to_string()),
                text(" and "),
                Inline::Code("b".to_string()),
                text(" then ` lone"),
            ]
        );
        assert_eq!(
            diagnostics,
            vec![Diagnostic::new(1, DiagnosticKind::UnclosedCodeSpan)]
        );
    }

    #[test]
    fn test_repeated_unclosed_targets_reported_each() {
        let mut diagnostics = Vec::new();
        let nodes = parse_inline("[a]([b](", 1, &mut diagnostics);

        assert_eq!(nodes, vec![text("[a]([b](")]);
        assert_eq!(
            diagnostics,
            vec![
                Diagnostic::new(1, DiagnosticKind::MalformedLink),
                Diagnostic::new(1, DiagnosticKind::MalformedLink),
            ]
        );
    }
}
