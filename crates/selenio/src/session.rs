//! Browser sessions and the factory that launches them.
//!
//! A [`Session`] is a handle to one live browser instance. The
//! [`SessionFactory`] is the only component that creates them: it reads the
//! configured browser kind and mode, builds the per-kind launch options, and
//! hands the launch to the injected engine. Binding the result to a worker
//! is the registry's job, and retrying a failed launch is the caller's;
//! this layer does neither.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::config::Config;
use crate::driver::{BrowserEngine, BrowserKind, DriverResult, WebElement, WebSession};
use crate::locator::Locator;
use crate::result::Result;

/// Unique identity of one launched session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to one live browser instance.
///
/// Cloning is cheap and yields a handle to the same underlying browser;
/// identity comparisons go through [`Session::id`]. One-worker exclusivity
/// is enforced structurally by the registry's key partitioning, not by this
/// type.
#[derive(Clone)]
pub struct Session {
    id: SessionId,
    kind: BrowserKind,
    backend: Arc<dyn WebSession>,
}

impl Session {
    /// Wrap an engine-launched backend.
    ///
    /// Normally obtained from [`SessionFactory::create`]; direct
    /// construction exists for custom engines and tests.
    #[must_use]
    pub fn new(kind: BrowserKind, backend: Arc<dyn WebSession>) -> Self {
        Self {
            id: SessionId::new(),
            kind,
            backend,
        }
    }

    /// This session's unique identity
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Browser kind the session was launched as
    #[must_use]
    pub const fn kind(&self) -> BrowserKind {
        self.kind
    }

    /// Load `url` in the browser
    pub fn navigate(&self, url: &str) -> DriverResult<()> {
        self.backend.navigate(url)
    }

    /// Find the first element matching `locator`; `None` when nothing matches
    pub fn find_element(&self, locator: &Locator) -> DriverResult<Option<Box<dyn WebElement>>> {
        self.backend.find_element(locator)
    }

    /// Shut the browser down; teardown callers treat failures as
    /// best-effort and log rather than propagate
    pub fn close(&self) -> DriverResult<()> {
        tracing::debug!(session = %self.id, "closing session");
        self.backend.close()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Launches sessions according to configuration
pub struct SessionFactory {
    engine: Arc<dyn BrowserEngine>,
}

impl SessionFactory {
    /// Create a factory that launches through `engine`
    #[must_use]
    pub fn new(engine: Arc<dyn BrowserEngine>) -> Self {
        Self { engine }
    }

    /// Launch a new session for the configured browser and mode.
    ///
    /// Reads `browser` and `headless` from `config`; an unknown browser name
    /// fails with `UnsupportedBrowser`, an engine refusal with
    /// `LaunchFailed`. Neither is retried here.
    pub fn create(&self, config: &Config) -> Result<Session> {
        let kind: BrowserKind = config.browser()?.parse()?;
        let headless = config.headless()?;
        let options = kind.launch_options(headless);
        tracing::info!(browser = %kind, headless, "launching browser session");
        let backend = self.engine.launch(kind, &options)?;
        let session = Session::new(kind, backend);
        tracing::debug!(session = %session.id(), browser = %kind, "session launched");
        Ok(session)
    }
}

impl fmt::Debug for SessionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionFactory").finish_non_exhaustive()
    }
}
