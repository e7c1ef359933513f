//! Bounded explicit waits over the engine boundary.
//!
//! Every DOM read in the harness funnels through [`WaitEngine::until`]: the
//! interaction layer never touches an element before its readiness condition
//! holds. The engine polls the session at a fixed interval until the
//! condition is satisfied or the deadline expires, whichever comes first.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::driver::WebElement;
use crate::locator::Locator;
use crate::result::{Result, WaitError};
use crate::session::Session;

// ============================================================================
// Constants
// ============================================================================

/// Default polling interval between condition probes (250ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

// ============================================================================
// Element conditions
// ============================================================================

/// Readiness conditions an element can be waited on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCondition {
    /// Element is rendered and visible
    Visible,
    /// Element is visible and enabled for input
    Clickable,
}

impl ElementCondition {
    /// Condition name as it appears in logs and timeout messages
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Clickable => "clickable",
        }
    }
}

impl std::fmt::Display for ElementCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Wait specification
// ============================================================================

/// What to wait for, and how patiently.
///
/// Created per call in builder style. When `timeout` is `None` the engine
/// falls back to the configured `explicitWait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSpec {
    /// Condition that must hold before the wait returns
    pub condition: ElementCondition,
    /// Deadline override; `None` means use the configured `explicitWait`
    pub timeout: Option<Duration>,
    /// Interval between condition probes
    pub poll_interval: Duration,
}

impl WaitSpec {
    /// Create a wait for the given condition with the configured deadline
    #[must_use]
    pub const fn new(condition: ElementCondition) -> Self {
        Self {
            condition,
            timeout: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Wait for the element to become visible
    #[must_use]
    pub const fn visible() -> Self {
        Self::new(ElementCondition::Visible)
    }

    /// Wait for the element to become visible and enabled
    #[must_use]
    pub const fn clickable() -> Self {
        Self::new(ElementCondition::Clickable)
    }

    /// Override the deadline for this wait only
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the interval between probes
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

// ============================================================================
// Wait engine
// ============================================================================

/// Polling wait engine bound to the suite configuration.
///
/// The configured `explicitWait` is read on every [`until`](Self::until)
/// call rather than captured at construction, so the deadline always
/// reflects the configuration the suite actually loaded.
#[derive(Debug, Clone)]
pub struct WaitEngine {
    config: Arc<Config>,
}

impl WaitEngine {
    /// Create a wait engine reading its default deadline from `config`
    #[must_use]
    pub const fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Block until `locator` satisfies the condition in `spec`, then return
    /// the element handle.
    ///
    /// The condition is probed at least once even if the deadline is zero or
    /// already elapsed: a satisfied condition wins over an expired clock.
    /// Probe failures from the backend (element lookup or state reads) count
    /// as "not ready yet" and polling continues. The sleep between probes is
    /// clamped to the remaining deadline, so an expired wait returns within
    /// one poll interval of the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError::Timeout`] when the deadline expires, or a
    /// configuration error when no timeout override is given and
    /// `explicitWait` is missing or malformed.
    pub fn until(
        &self,
        session: &Session,
        locator: &Locator,
        spec: &WaitSpec,
    ) -> Result<Box<dyn WebElement>> {
        let timeout = match spec.timeout {
            Some(timeout) => timeout,
            None => self.config.explicit_wait()?,
        };
        let start = Instant::now();

        loop {
            if let Some(element) = probe(session, locator, spec.condition) {
                return Ok(element);
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                tracing::debug!(
                    %locator,
                    condition = %spec.condition,
                    ?elapsed,
                    "wait expired"
                );
                return Err(WaitError::Timeout {
                    locator: locator.clone(),
                    condition: spec.condition,
                    elapsed,
                }
                .into());
            }
            std::thread::sleep(spec.poll_interval.min(timeout - elapsed));
        }
    }
}

/// One condition probe against the live session.
///
/// Any backend failure during the probe reads as "condition not yet true";
/// the caller's deadline still bounds the wait.
fn probe(
    session: &Session,
    locator: &Locator,
    condition: ElementCondition,
) -> Option<Box<dyn WebElement>> {
    let element = session.find_element(locator).ok().flatten()?;
    let ready = match condition {
        ElementCondition::Visible => element.is_visible().unwrap_or(false),
        ElementCondition::Clickable => {
            element.is_visible().unwrap_or(false) && element.is_enabled().unwrap_or(false)
        }
    };
    ready.then_some(element)
}
