use clap::Parser;
use proc_demos::{
    cli::options::ZombieDemoArgs, commands::handle_zombie_demo, util::logging::init_logging,
};

fn main() -> eyre::Result<()> {
    // Parse command-line options first (before initializing tracing)
    let args = ZombieDemoArgs::parse();
    init_logging(args.common.verbose);

    handle_zombie_demo(&args)
}
