//! Terminal interrupts during subcommand execution
//!
//! Once [`install_handler`] has run, the first Ctrl-C only raises a flag.
//! Handlers notice it by calling [`check`] in their long-running loops and
//! return the resulting [`Interrupted`] error. The dispatcher also looks at
//! the flag after the handler returns, so an interrupt the handler never
//! polled still ends the run with exit code 1. A second Ctrl-C exits
//! immediately with the same code.

use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::debug;

static HANDLER_INSTALLED: AtomicBool = AtomicBool::new(false);
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Process exit code after a user interrupt
pub const EXIT_CODE: i32 = 1;

/// Returned by a handler that stopped because the user interrupted it
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("interrupted by user")]
pub struct Interrupted;

/// Install the Ctrl-C handler; later calls do nothing
pub fn install_handler() {
    if HANDLER_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let installed = ctrlc::set_handler(|| {
        if INTERRUPTED.swap(true, Ordering::SeqCst) {
            std::process::exit(EXIT_CODE);
        }
    });
    if let Err(e) = installed {
        debug!("Could not install interrupt handler: {}", e);
    }
}

/// Whether an interrupt has arrived
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// `Err(Interrupted)` once an interrupt has arrived
pub fn check() -> Result<(), Interrupted> {
    if is_interrupted() {
        Err(Interrupted)
    } else {
        Ok(())
    }
}

/// Record an interrupt as if Ctrl-C had been pressed
pub fn raise() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Forget a recorded interrupt
pub fn reset() {
    INTERRUPTED.store(false, Ordering::SeqCst);
}

/// Whether an interrupt has arrived, clearing the flag
pub fn take() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}

/// Whether a handler's error chain contains [`Interrupted`]
pub fn is_interrupt(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| cause.is::<Interrupted>())
}

/// Serializes tests that touch the process-wide interrupt flag
#[cfg(test)]
pub(crate) fn serial() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
