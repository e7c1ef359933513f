//! Result and error types for Selenio.
//!
//! The taxonomy mirrors the three failure domains of the harness:
//! [`ConfigError`] (fatal at startup), [`DriverError`] (fatal to the current
//! test, never to the suite), and [`WaitError`] (fails the current step;
//! convertible to a boolean only by the documented visibility probe).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::driver::BrowserKind;
use crate::locator::Locator;
use crate::registry::WorkerId;
use crate::wait::ElementCondition;

/// Result type for Selenio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving or reading configuration.
///
/// All of these are fatal at startup: the harness must not proceed with
/// partial or invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment name outside the closed set
    #[error("Unknown environment: {name}")]
    UnknownEnvironment {
        /// The value that failed to resolve
        name: String,
    },

    /// Configuration file missing or unreadable
    #[error("Configuration source unavailable: {path}")]
    SourceUnavailable {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Configuration file content is not the flat key=value dialect
    #[error("Malformed configuration at {path}:{line}: expected key=value")]
    ParseFailure {
        /// File containing the bad line
        path: PathBuf,
        /// 1-based line number
        line: usize,
    },

    /// Required key absent from the merged map
    #[error("Property not found: {key}")]
    MissingKey {
        /// The key that was looked up
        key: String,
    },

    /// Value present but not parseable as the requested type
    #[error("Property {key} has value {value:?}, expected {expected}")]
    TypeMismatch {
        /// The key that was looked up
        key: String,
        /// The raw string value found
        value: String,
        /// Human-readable expected type
        expected: &'static str,
    },
}

/// Errors raised while launching, binding, or addressing browser sessions.
///
/// Fatal to the current test; the registry slot involved stays reclaimable
/// so subsequent tests on the same worker are unaffected.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Browser name outside the closed set
    #[error("Browser not supported: {name}")]
    UnsupportedBrowser {
        /// The configured value that failed to parse
        name: String,
    },

    /// Session construction failed (binary missing, port exhaustion, ...)
    #[error("Failed to launch {kind} session: {message}")]
    LaunchFailed {
        /// Browser kind being launched
        kind: BrowserKind,
        /// Backend-reported reason
        message: String,
    },

    /// A worker tried to bind a second session without releasing the first
    #[error("Worker {worker} already has a bound session; release it first")]
    DoubleBind {
        /// The worker whose slot was occupied
        worker: WorkerId,
    },

    /// An interaction ran before any session was bound for the worker
    #[error("No active session for worker {worker}")]
    NoActiveSession {
        /// The worker with no binding
        worker: WorkerId,
    },

    /// Opaque failure reported by the automation backend
    #[error("Browser backend error: {message}")]
    Backend {
        /// Backend-reported reason
        message: String,
    },
}

/// Errors raised by the bounded-wait engine.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The condition never became true within the deadline.
    ///
    /// An element that never matched the locator at all reports the same
    /// timeout: from the caller's perspective both are "condition never
    /// became true in time".
    #[error("Timed out after {elapsed:?} waiting for {locator} to become {condition}")]
    Timeout {
        /// Locator that was polled
        locator: Locator,
        /// Condition that never held
        condition: ElementCondition,
        /// Wall-clock time actually spent polling
        elapsed: Duration,
    },
}

/// Umbrella error for Selenio operations
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration resolution or access failed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Session lifecycle or addressing failed
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A bounded wait expired
    #[error(transparent)]
    Wait(#[from] WaitError),
}

impl Error {
    /// True when this error is an expired element wait.
    ///
    /// The visibility probe uses this to convert exactly one failure kind
    /// into `false`; every other error keeps propagating.
    #[must_use]
    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, Self::Wait(WaitError::Timeout { .. }))
    }
}
