//! CSS asset bundling

use anyhow::{Context, Result};
use std::{fs, path::Path};

const BASE: &str = include_str!("../assets/base.css");
const MARKDOWN: &str = include_str!("../assets/markdown.css");

/// Returns the preview stylesheet with base and markdown rules joined.
pub fn stylesheet() -> String {
    [BASE, MARKDOWN].join("\n")
}

/// Writes the bundled preview stylesheet to `markdown.css` in `assets_dir`.
pub fn write_css_assets(assets_dir: &Path) -> Result<()> {
    fs::create_dir_all(assets_dir).with_context(|| {
        format!(
            "Failed to create assets directory: {}",
            assets_dir.display()
        )
    })?;
    fs::write(assets_dir.join("markdown.css"), stylesheet())
        .context("Failed to write CSS asset: markdown.css")?;
    Ok(())
}
