//! Zombie-prevention demo command

use crate::{
    cli::{config::load_zombie_demo_config, options::ZombieDemoArgs},
    process::ForkProcessOps,
    zombie::ZombieCoordinator,
};
use nix::unistd::getpid;
use tracing::{info, warn};

pub fn handle_zombie_demo(args: &ZombieDemoArgs) -> eyre::Result<()> {
    let config = load_zombie_demo_config(args)?;

    info!("=== Zombie Process Prevention Demo ===");
    info!("Parent Process PID: {}", getpid());

    let ops = ForkProcessOps;
    let mut coordinator = ZombieCoordinator::new(&ops, &config);
    coordinator.spawn_batch()?;

    let report = coordinator.reap_batch();
    if report.all_reaped() {
        info!("=== All children cleaned up successfully ===");
    } else {
        warn!(
            "=== {} of {} children could not be reaped ===",
            report.failures(),
            report.records.len()
        );
    }

    info!("Parent Process (PID {}): Exiting...", getpid());
    Ok(())
}
