//! Logging utilities

use std::io::IsTerminal;

/// Initialize the tracing subscriber.
///
/// Priority: RUST_LOG > `--verbose` (DEBUG) > default (INFO). Colours are
/// only used when stdout is a terminal.
pub fn init_logging(verbose: bool) {
    let ansi = std::io::stdout().is_terminal();

    if std::env::var("RUST_LOG").is_ok() {
        // RUST_LOG env var takes precedence (for development/debugging)
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_ansi(ansi)
            .init();
    } else {
        let level = if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(ansi)
            .init();
    }
}
