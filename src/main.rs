use anyhow::{Context, Result, bail};
use notemark::{Config, write_css_assets};
use notemark::components::preview::preview_page;
use std::fs;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config);
    config.validate().context("Invalid configuration")?;

    let content = read_input(&config)?;
    let renderer = config.renderer();

    if config.check {
        return check(&config, &renderer.diagnostics(&content));
    }

    let fragment = if config.strict {
        renderer
            .render_strict(&content)
            .with_context(|| format!("Strict render failed for {}", config.input.display()))?
    } else {
        for diagnostic in renderer.diagnostics(&content) {
            tracing::info!(%diagnostic, "rendering malformed construct as text");
        }
        renderer.render(&content)
    };

    if let Some(dir) = &config.css_dir {
        write_css_assets(dir)?;
        tracing::info!(dir = %dir.display(), "wrote stylesheet");
    }

    let html = if config.standalone {
        preview_page(&config.document_title(), &fragment).into_string()
    } else {
        fragment
    };

    match &config.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).context("Failed to create output directory")?;
            }
            fs::write(path, &html)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = html.len(), "wrote preview");

            if config.open
                && let Err(e) = open::that(path)
            {
                tracing::warn!("Failed to open {} in browser: {}", path.display(), e);
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", html).context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Installs a stderr subscriber so log lines never mix with HTML on stdout.
///
/// `RUST_LOG` takes precedence over the `-v` default.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::builder()
        .with_default_directive(config.log_level().into())
        .from_env_lossy();

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = installed {
        eprintln!("Warning: Failed to install log subscriber: {}", e);
    }
}

fn read_input(config: &Config) -> Result<String> {
    if config.reads_stdin() {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read note from stdin")?;
        return Ok(content);
    }

    fs::read_to_string(&config.input)
        .with_context(|| format!("Failed to read note: {}", config.input.display()))
}

/// Prints one line per diagnostic and fails when any were found.
fn check(config: &Config, diagnostics: &[notemark::Diagnostic]) -> Result<()> {
    let source = config.input.display();
    let mut stdout = io::stdout().lock();

    for diagnostic in diagnostics {
        writeln!(stdout, "{}:{}: {}", source, diagnostic.line, diagnostic.kind)
            .context("Failed to write to stdout")?;
    }

    if !diagnostics.is_empty() {
        bail!("{} malformed construct(s) in {}", diagnostics.len(), source);
    }

    tracing::info!("{}: no issues found", source);
    Ok(())
}
