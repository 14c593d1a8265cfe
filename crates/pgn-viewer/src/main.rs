//! PGN exercise viewer
//!
//! Loads exercises from a JSON catalogue or a PGN file and steps through
//! them from the keyboard.

use std::io::{self, BufRead, Write};

use pgn_viewer::app::{App, Outcome};
use pgn_viewer::commands::HELP;
use pgn_viewer::config::ViewerConfig;
use pgn_viewer::source::load_catalog;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = ViewerConfig::from_env(std::env::args().nth(1))?;
    info!(source = %config.source.display(), "Viewer starting");

    let catalog = load_catalog(&config.source)?;
    let mut app = App::new(catalog, &config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}\n", app.start(config.exercise.as_deref()))?;
    writeln!(out, "{HELP}")?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        match app.handle_line(&line) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Continue(text)) if text.is_empty() => {}
            Ok(Outcome::Continue(text)) => writeln!(out, "{text}")?,
            Err(e) => {
                warn!(error = %e, "Command failed");
                writeln!(out, "{e}")?;
            }
        }
        out.flush()?;
    }

    info!("Viewer stopped");
    Ok(())
}
