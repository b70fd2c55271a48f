//! Demo configuration
//!
//! Every parameter has a documented default matching the classic demo
//! timings. Values are layered: defaults, then an optional JSON file given
//! with `--config`, then explicit command-line flags. Durations are stored as
//! seconds (`f64`).

use super::options::{SignalDemoArgs, ZombieDemoArgs};
use eyre::{bail, WrapErr};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, time::Duration};
use tracing::debug;

/// Largest batch whose slot numbers still fit in an exit status
pub const MAX_BATCH_CHILDREN: usize = 255;

/// Configuration for the signal demo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalDemoConfig {
    /// Seconds before child 1 sends SIGTERM to the parent (default 5)
    pub sigterm_delay: f64,
    /// Seconds before child 2 sends SIGINT to the parent (default 10)
    pub sigint_delay: f64,
    /// Seconds between "Working..." progress lines (default 2)
    pub heartbeat_interval: f64,
    /// Seconds to keep retrying non-blocking reaps of children that have
    /// not exited when cleanup starts (default 0: a single attempt)
    pub cleanup_grace: f64,
}

impl Default for SignalDemoConfig {
    fn default() -> Self {
        Self {
            sigterm_delay: 5.0,
            sigint_delay: 10.0,
            heartbeat_interval: 2.0,
            cleanup_grace: 0.0,
        }
    }
}

impl SignalDemoConfig {
    pub fn validate(&self) -> eyre::Result<()> {
        check_seconds("sigterm_delay", self.sigterm_delay)?;
        check_seconds("sigint_delay", self.sigint_delay)?;
        check_seconds("cleanup_grace", self.cleanup_grace)?;
        // Sub-nanosecond periods round down to zero, which an interval rejects
        if check_seconds("heartbeat_interval", self.heartbeat_interval)?.is_zero() {
            bail!(
                "heartbeat_interval must be at least one nanosecond, got {}",
                self.heartbeat_interval
            );
        }
        Ok(())
    }

    pub fn sigterm_delay(&self) -> Duration {
        Duration::from_secs_f64(self.sigterm_delay)
    }

    pub fn sigint_delay(&self) -> Duration {
        Duration::from_secs_f64(self.sigint_delay)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs_f64(self.heartbeat_interval)
    }

    pub fn cleanup_grace(&self) -> Duration {
        Duration::from_secs_f64(self.cleanup_grace)
    }
}

/// Configuration for the zombie-prevention demo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZombieDemoConfig {
    /// Number of children in the batch (default 5)
    pub children: usize,
    /// Child i sleeps `i * step_delay` seconds before exiting (default 1)
    pub step_delay: f64,
}

impl Default for ZombieDemoConfig {
    fn default() -> Self {
        Self {
            children: 5,
            step_delay: 1.0,
        }
    }
}

impl ZombieDemoConfig {
    pub fn validate(&self) -> eyre::Result<()> {
        if self.children == 0 || self.children > MAX_BATCH_CHILDREN {
            bail!(
                "children must be between 1 and {}, got {}",
                MAX_BATCH_CHILDREN,
                self.children
            );
        }
        check_seconds("step_delay", self.step_delay)?;
        // The last child sleeps the longest
        Duration::try_from_secs_f64(self.step_delay * self.children as f64).wrap_err_with(
            || {
                format!(
                    "step_delay {} is too large for a batch of {} children",
                    self.step_delay, self.children
                )
            },
        )?;
        Ok(())
    }

    /// Sleep duration of the child in 1-based `slot`
    pub fn delay_for(&self, slot: usize) -> Duration {
        Duration::from_secs_f64(self.step_delay * slot as f64)
    }
}

/// Convert `value` seconds to a `Duration`, rejecting values one cannot hold
fn check_seconds(name: &str, value: f64) -> eyre::Result<Duration> {
    if !value.is_finite() || value < 0.0 {
        bail!("{} must be a non-negative number of seconds, got {}", name, value);
    }
    Duration::try_from_secs_f64(value)
        .wrap_err_with(|| format!("{} is out of range, got {} seconds", name, value))
}

/// Load a configuration file, or the defaults when no path is given
pub fn load_config_file<T>(path: Option<&Path>) -> eyre::Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };

    let file = File::open(path)
        .wrap_err_with(|| format!("unable to open config file {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .wrap_err_with(|| format!("unable to parse config file {}", path.display()))?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Resolve the signal demo configuration from file and flags
pub fn load_signal_demo_config(args: &SignalDemoArgs) -> eyre::Result<SignalDemoConfig> {
    let mut config: SignalDemoConfig = load_config_file(args.common.config.as_deref())?;

    if let Some(value) = args.sigterm_delay {
        config.sigterm_delay = value;
    }
    if let Some(value) = args.sigint_delay {
        config.sigint_delay = value;
    }
    if let Some(value) = args.heartbeat_interval {
        config.heartbeat_interval = value;
    }
    if let Some(value) = args.cleanup_grace {
        config.cleanup_grace = value;
    }

    config.validate().wrap_err("invalid signal demo configuration")?;
    debug!("Signal demo configuration: {:?}", config);
    Ok(config)
}

/// Resolve the zombie demo configuration from file and flags
pub fn load_zombie_demo_config(args: &ZombieDemoArgs) -> eyre::Result<ZombieDemoConfig> {
    let mut config: ZombieDemoConfig = load_config_file(args.common.config.as_deref())?;

    if let Some(value) = args.children {
        config.children = value;
    }
    if let Some(value) = args.step_delay {
        config.step_delay = value;
    }

    config.validate().wrap_err("invalid zombie demo configuration")?;
    debug!("Zombie demo configuration: {:?}", config);
    Ok(config)
}
