//! Signal handler installation
//!
//! Handlers are registered through tokio's signal driver. The code that runs
//! in signal context only stores an atomic flag and writes to a self-pipe;
//! everything observable happens later on the main task when the stream
//! yields.

use super::latch::TerminationSignal;
use eyre::WrapErr;
use futures::stream::Stream;
use tracing::debug;

/// Install a handler for `signal`.
///
/// After this returns, delivery of `signal` no longer runs the default
/// disposition. Must be called inside a tokio runtime context.
pub fn install_handler(
    signal: TerminationSignal,
) -> eyre::Result<tokio::signal::unix::Signal> {
    let handle = tokio::signal::unix::signal(signal.kind())
        .wrap_err_with(|| format!("sigaction {} failed", signal))?;
    debug!("Installed handler for {}", signal);
    Ok(handle)
}

/// Install handlers for SIGTERM and SIGINT and merge them into one stream.
///
/// Registration failure of either handler is fatal to the caller.
pub fn termination_signals() -> eyre::Result<impl Stream<Item = TerminationSignal>> {
    let mut sigterm = install_handler(TerminationSignal::Term)?;
    let mut sigint = install_handler(TerminationSignal::Int)?;

    let sigterm_stream = async_stream::stream! {
        while let Some(()) = sigterm.recv().await {
            yield TerminationSignal::Term;
        }
    };
    let sigint_stream = async_stream::stream! {
        while let Some(()) = sigint.recv().await {
            yield TerminationSignal::Int;
        }
    };

    Ok(futures::stream::select(sigterm_stream, sigint_stream))
}

