//! Process-wide run-mode state
//!
//! Two knobs shared by every component of a run: the verbosity level and
//! the dry-run flag. Both are set before targets are driven and only read
//! while they run. One driver at a time per process; a caller running two
//! drivers concurrently must serialize access itself.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::core::models::Verbosity;

static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Normal.priority());
static DRY_RUN: AtomicBool = AtomicBool::new(false);

/// Current verbosity level (defaults to [`Verbosity::Normal`])
#[must_use]
pub fn verbosity() -> Verbosity {
    Verbosity::from_priority(VERBOSITY.load(Ordering::SeqCst)).unwrap_or_default()
}

/// Set the verbosity level
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level.priority(), Ordering::SeqCst);
}

/// Whether task calls are traced instead of executed (defaults to `false`)
#[must_use]
pub fn dry_run() -> bool {
    DRY_RUN.load(Ordering::SeqCst)
}

/// Set the dry-run flag
pub fn set_dry_run(enabled: bool) {
    DRY_RUN.store(enabled, Ordering::SeqCst);
}

/// Restore both knobs to their defaults
pub fn reset() {
    set_verbosity(Verbosity::default());
    set_dry_run(false);
}
