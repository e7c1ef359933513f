//! Per-worker session registry.
//!
//! The registry is the isolation boundary that makes parallel test
//! execution correct: each worker binds at most one live [`Session`] under
//! its own [`WorkerId`], and because no two workers ever address the same
//! key, workers never observe each other's sessions. This replaces hidden
//! thread-local session storage with explicit, injectable state: the
//! registry is created once per suite and shared by `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::driver::DriverResult;
use crate::result::DriverError;
use crate::session::Session;

/// Identity of one concurrent test worker
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkerId(String);

impl WorkerId {
    /// Create a worker identity from a stable label
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Derive a worker identity from the current thread: its name when set,
    /// otherwise its thread id
    #[must_use]
    pub fn from_current_thread() -> Self {
        let thread = std::thread::current();
        match thread.name() {
            Some(name) => Self(name.to_string()),
            None => Self(format!("{:?}", thread.id())),
        }
    }

    /// The worker's label
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps each worker to at most one live session
#[derive(Debug, Default)]
pub struct SessionRegistry {
    slots: Mutex<HashMap<WorkerId, Session>>,
}

impl SessionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `session` to `worker`.
    ///
    /// Binding over an occupied slot is a programming error and fails with
    /// `DoubleBind`: the prior binding stays intact and reclaimable, and the
    /// offered session is closed best-effort so the rejected launch does not
    /// leak a live browser.
    pub fn bind(&self, worker: &WorkerId, session: Session) -> DriverResult<()> {
        let mut slots = self.lock_slots();
        if slots.contains_key(worker) {
            // The map lock is not held while a browser shuts down.
            drop(slots);
            if let Err(error) = session.close() {
                tracing::warn!(worker = %worker, %error, "failed to close rejected session");
            }
            return Err(DriverError::DoubleBind {
                worker: worker.clone(),
            });
        }
        tracing::debug!(worker = %worker, session = %session.id(), "session bound");
        slots.insert(worker.clone(), session);
        Ok(())
    }

    /// The session bound to `worker`, if any
    #[must_use]
    pub fn current(&self, worker: &WorkerId) -> Option<Session> {
        self.lock_slots().get(worker).cloned()
    }

    /// Release `worker`'s binding.
    ///
    /// Idempotent: releasing an unbound worker is a no-op. The underlying
    /// session is closed best-effort, and the binding is cleared even when
    /// the close fails, so a hung browser cannot leak the registry slot.
    pub fn release(&self, worker: &WorkerId) {
        let removed = self.lock_slots().remove(worker);
        match removed {
            None => tracing::debug!(worker = %worker, "release with no bound session"),
            Some(session) => {
                if let Err(error) = session.close() {
                    tracing::warn!(
                        worker = %worker,
                        session = %session.id(),
                        %error,
                        "session close failed during release"
                    );
                } else {
                    tracing::debug!(worker = %worker, session = %session.id(), "session released");
                }
            }
        }
    }

    /// Whether `worker` currently has a bound session
    #[must_use]
    pub fn is_bound(&self, worker: &WorkerId) -> bool {
        self.lock_slots().contains_key(worker)
    }

    /// Number of live bindings across all workers
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.lock_slots().len()
    }

    // A panicking test must not wedge other workers' binds or teardown, so a
    // poisoned map is recovered rather than propagated.
    fn lock_slots(&self) -> MutexGuard<'_, HashMap<WorkerId, Session>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
