//! Signal demo command

use crate::{
    cli::{config::load_signal_demo_config, options::SignalDemoArgs},
    process::ForkProcessOps,
    signals::{termination_signals, SignalCoordinator},
};
use eyre::WrapErr;
use nix::unistd::getpid;
use tracing::info;

pub fn handle_signal_demo(args: &SignalDemoArgs) -> eyre::Result<()> {
    let config = load_signal_demo_config(args)?;
    let parent = getpid();

    info!("=== Signal Handling Demonstration ===");
    info!("Parent Process PID: {}", parent);

    // Current-thread runtime: no worker threads, so forking below stays sound
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("Failed to build tokio runtime")?;

    // Handlers must be in place before any child can signal us
    let signals = {
        let _guard = runtime.enter();
        termination_signals()?
    };
    info!("Signal handlers installed:");
    info!("  - SIGTERM handler: Custom cleanup handler");
    info!("  - SIGINT handler: Custom exit preparation handler");

    let ops = ForkProcessOps;
    let mut coordinator = SignalCoordinator::new(&ops, &config);
    coordinator.spawn_senders(parent)?;

    info!("[PARENT] Running until both SIGTERM and SIGINT arrive...");
    info!("[PARENT] Press Ctrl+C or wait for child signals");

    runtime.block_on(async {
        let summary = coordinator.wait_for_signals(signals).await;
        info!(
            "[PARENT] Preparing for graceful exit after {} heartbeat(s)...",
            summary.heartbeats
        );
        coordinator.cleanup().await;
    });

    info!("[PARENT] Graceful exit complete. Goodbye!");
    info!("=== Program terminated successfully ===");
    Ok(())
}
