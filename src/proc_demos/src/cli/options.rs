use clap::{Args, Parser};
use std::path::PathBuf;

/// Options shared by both demos
#[derive(Args, Clone, Debug, Default)]
pub struct CommonOptions {
    /// JSON configuration file (flags given on the command line take precedence)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug-level output (ignored when RUST_LOG is set)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Install SIGTERM/SIGINT handlers, fork two children that signal the parent,
/// and exit once both signals have arrived
#[derive(Parser, Debug, Default)]
#[command(name = "signal_demo")]
#[command(version)]
#[command(after_help = "Examples:\n  \
    signal_demo\n  \
    signal_demo --sigterm-delay 1 --sigint-delay 2 --heartbeat-interval 0.5\n  \
    signal_demo --config signal_demo.json")]
pub struct SignalDemoArgs {
    /// Seconds before child 1 sends SIGTERM [default: 5]
    #[arg(long, value_name = "SECS")]
    pub sigterm_delay: Option<f64>,

    /// Seconds before child 2 sends SIGINT [default: 10]
    #[arg(long, value_name = "SECS")]
    pub sigint_delay: Option<f64>,

    /// Seconds between progress lines while waiting [default: 2]
    #[arg(long, value_name = "SECS")]
    pub heartbeat_interval: Option<f64>,

    /// Seconds to keep retrying reaps of children still running at cleanup [default: 0]
    #[arg(long, value_name = "SECS")]
    pub cleanup_grace: Option<f64>,

    #[command(flatten)]
    pub common: CommonOptions,
}

/// Fork a batch of short-lived children and reap each one in creation order
#[derive(Parser, Debug, Default)]
#[command(name = "zombie_demo")]
#[command(version)]
#[command(after_help = "Examples:\n  \
    zombie_demo\n  \
    zombie_demo --children 3 --step-delay 0.2")]
pub struct ZombieDemoArgs {
    /// Number of children to fork [default: 5]
    #[arg(long, short = 'n', value_name = "N")]
    pub children: Option<usize>,

    /// Child i sleeps i * SECS before exiting [default: 1]
    #[arg(long, value_name = "SECS")]
    pub step_delay: Option<f64>,

    #[command(flatten)]
    pub common: CommonOptions,
}
