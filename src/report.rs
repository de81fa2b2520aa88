//! One-time operational diagnostics.
//!
//! A message is emitted at most once per `(site, message)` pair for the
//! lifetime of the process, or until [`reset`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};

type Key = (&'static str, String);

fn reported() -> &'static Mutex<HashSet<Key>> {
    static REPORTED: OnceLock<Mutex<HashSet<Key>>> = OnceLock::new();
    REPORTED.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Emits `message` for `site` as a warning unless the same pair was reported before.
///
/// Returns `true` when the warning was emitted.
pub fn report(site: &'static str, message: &str) -> bool {
    let mut seen = reported().lock().unwrap_or_else(PoisonError::into_inner);
    if !seen.insert((site, message.to_owned())) {
        return false;
    }
    drop(seen);

    tracing::warn!(site, "`{}` {}", site, message);
    true
}

#[cfg(test)]
pub(crate) fn contains(site: &'static str, message: &str) -> bool {
    reported()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .contains(&(site, message.to_owned()))
}

/// Serializes tests that observe or reset the process-wide registry.
#[cfg(test)]
pub(crate) fn exclusive() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Forgets every reported pair.
pub fn reset() {
    reported()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}
