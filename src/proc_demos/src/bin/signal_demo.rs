use clap::Parser;
use proc_demos::{
    cli::options::SignalDemoArgs, commands::handle_signal_demo, util::logging::init_logging,
};

fn main() -> eyre::Result<()> {
    // Parse command-line options first (before initializing tracing)
    let args = SignalDemoArgs::parse();
    init_logging(args.common.verbose);

    handle_signal_demo(&args)
}
