//! Command line configuration.

use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use crate::MarkdownRenderer;

/// Input path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Command line configuration for Notemark.
#[derive(Debug, Clone, Parser)]
#[command(name = "notemark", version, about, long_about = None)]
pub struct Config {
    /// Markdown note to render, `-` for standard input
    #[arg(default_value = STDIN_PATH)]
    pub input: PathBuf,

    /// Output file, standard output when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Wrap the fragment in a complete HTML document
    #[arg(short, long)]
    pub standalone: bool,

    /// Document title for standalone output
    #[arg(long)]
    pub title: Option<String>,

    /// Pass HTML in note text through without escaping
    #[arg(long)]
    pub raw_html: bool,

    /// Fail instead of rendering when the note has malformed constructs
    #[arg(long)]
    pub strict: bool,

    /// Report malformed constructs without rendering
    #[arg(long, conflicts_with = "strict")]
    pub check: bool,

    /// Also write the preview stylesheet to `markdown.css` in this directory
    #[arg(long, value_name = "DIR")]
    pub css_dir: Option<PathBuf>,

    /// Open the written output in the default browser
    #[arg(long)]
    pub open: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Parses configuration from command line arguments.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the input file does not exist, or if `--open` is
    /// requested without an output file.
    pub fn validate(&self) -> Result<()> {
        if !self.reads_stdin() && !self.input.exists() {
            bail!("Input file does not exist: {}", self.input.display());
        }

        if self.open && self.output.is_none() {
            bail!("--open requires --output");
        }

        Ok(())
    }

    /// Returns true when the note is read from standard input.
    pub fn reads_stdin(&self) -> bool {
        self.input == Path::new(STDIN_PATH)
    }

    /// Returns renderer configured for the requested HTML policy.
    pub fn renderer(&self) -> MarkdownRenderer {
        if self.raw_html {
            MarkdownRenderer::with_raw_html()
        } else {
            MarkdownRenderer::new()
        }
    }

    /// Returns document title from configuration or input file name.
    pub fn document_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }

        if self.reads_stdin() {
            return "Untitled note".to_string();
        }

        self.input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled note")
            .to_string()
    }

    /// Default log level for the requested verbosity.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmlPolicy;

    fn config(input: &str) -> Config {
        Config {
            input: PathBuf::from(input),
            output: None,
            standalone: false,
            title: None,
            raw_html: false,
            strict: false,
            check: false,
            css_dir: None,
            open: false,
            verbose: 0,
        }
    }

    #[test]
    fn test_parse_defaults_to_stdin() {
        // Arrange & Act
        let config = Config::try_parse_from(["notemark"]).expect("Defaults should parse");

        // Assert
        assert!(config.reads_stdin());
        assert!(config.output.is_none());
        assert_eq!(config.log_level(), LevelFilter::WARN);
    }

    #[test]
    fn test_parse_all_flags() {
        // Arrange & Act
        let config = Config::try_parse_from([
            "notemark",
            "notes.md",
            "-o",
            "out.html",
            "--standalone",
            "--title",
            "Interview prep",
            "--raw-html",
            "--css-dir",
            "site/assets",
            "--open",
            "-vv",
        ])
        .expect("Flags should parse");

        // Assert
        assert_eq!(config.input, PathBuf::from("notes.md"));
        assert_eq!(config.output, Some(PathBuf::from("out.html")));
        assert!(config.standalone);
        assert!(config.raw_html);
        assert!(config.open);
        assert_eq!(config.css_dir, Some(PathBuf::from("site/assets")));
        assert_eq!(config.document_title(), "Interview prep");
        assert_eq!(config.log_level(), LevelFilter::DEBUG);
        assert_eq!(config.renderer().policy(), HtmlPolicy::Raw);
    }

    #[test]
    fn test_check_conflicts_with_strict() {
        let result = Config::try_parse_from(["notemark", "--check", "--strict"]);

        assert!(result.is_err(), "--check and --strict are exclusive");
    }

    #[test]
    fn test_validate_stdin() {
        assert!(config(STDIN_PATH).validate().is_ok());
    }

    #[test]
    fn test_validate_missing_input() {
        let result = config("no/such/note.md").validate();

        assert!(result.is_err(), "Missing input should fail validation");
    }

    #[test]
    fn test_validate_open_requires_output() {
        // Arrange
        let mut config = config(STDIN_PATH);
        config.open = true;

        // Act
        let result = config.validate();

        // Assert
        let message = format!("{:#}", result.expect_err("Should fail"));
        assert!(message.contains("--output"), "{}", message);
    }

    #[test]
    fn test_document_title_from_file_name() {
        assert_eq!(config("notes/dsa.md").document_title(), "dsa.md");
        assert_eq!(config(STDIN_PATH).document_title(), "Untitled note");
    }

    #[test]
    fn test_renderer_escapes_by_default() {
        assert_eq!(config(STDIN_PATH).renderer().policy(), HtmlPolicy::Escape);
    }
}
