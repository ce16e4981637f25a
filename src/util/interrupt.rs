//! Operator interrupt (Ctrl-C) tracking.
//!
//! The handler only records that an interrupt happened. The child process
//! receives the same signal and exits on its own; the pipeline notices the
//! flag and stops before the next stage.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the process-wide Ctrl-C handler. Call once, from `main`.
pub fn install_handler() -> Result<()> {
    ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst))
        .context("failed to install interrupt handler")
}

/// Whether an interrupt has been received during this run.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
