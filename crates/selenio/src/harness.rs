//! Suite-level harness: configuration, session factory, and registry wired
//! together.
//!
//! A [`Harness`] is built once per suite. Each test asks it for a
//! [`TestSession`], an RAII guard that binds a fresh browser to the calling
//! worker, opens the configured base URL, and releases the binding when the
//! guard drops. Releasing on drop is what keeps teardown honest: a panicking
//! test unwinds through the guard and still gives its browser back.

use std::sync::Arc;

use crate::config::Config;
use crate::driver::BrowserEngine;
use crate::page::BasePage;
use crate::registry::{SessionRegistry, WorkerId};
use crate::result::Result;
use crate::session::SessionFactory;

/// Shared entry point for a test suite run.
///
/// Holds the frozen configuration, the factory that launches browsers, and
/// the registry that maps workers to their sessions. Cheap to share behind
/// an `Arc` across worker threads.
#[derive(Debug)]
pub struct Harness {
    config: Arc<Config>,
    factory: SessionFactory,
    registry: Arc<SessionRegistry>,
}

impl Harness {
    /// Wire a harness from a loaded configuration and a browser engine
    #[must_use]
    pub fn new(config: Config, engine: Arc<dyn BrowserEngine>) -> Self {
        let config = Arc::new(config);
        tracing::info!(
            environment = %config.environment(),
            browser = config.browser().ok(),
            base_url = config.base_url().ok(),
            "harness initialized"
        );
        Self {
            config,
            factory: SessionFactory::new(engine),
            registry: Arc::new(SessionRegistry::new()),
        }
    }

    /// The suite configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The worker-to-session registry
    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Launch a browser for `worker`, bind it, and open the base URL.
    ///
    /// The binding is guarded: once `bind` has succeeded, any later failure
    /// in this function (or in the test that follows) releases the worker's
    /// slot and closes the browser through the guard's drop.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is incomplete, the browser cannot be
    /// launched, the worker already holds a session, or the base URL cannot
    /// be opened. The worker's slot is free again after any failure.
    pub fn start_session(&self, worker: WorkerId) -> Result<TestSession> {
        let session = self.factory.create(&self.config)?;
        self.registry.bind(&worker, session)?;

        let page = BasePage::new(
            worker.clone(),
            Arc::clone(&self.registry),
            Arc::clone(&self.config),
        );
        let guard = TestSession {
            worker,
            registry: Arc::clone(&self.registry),
            page,
        };
        guard.page.navigate(self.config.base_url()?)?;
        Ok(guard)
    }
}

/// RAII guard for one test's browser session.
///
/// Created by [`Harness::start_session`]. While alive, the worker's session
/// stays bound and [`page`](Self::page) interacts with it. Dropping the
/// guard releases the binding and closes the browser, on success, failure,
/// and panic alike.
#[derive(Debug)]
pub struct TestSession {
    worker: WorkerId,
    registry: Arc<SessionRegistry>,
    page: BasePage,
}

impl TestSession {
    /// Interaction layer bound to this session's worker
    #[must_use]
    pub const fn page(&self) -> &BasePage {
        &self.page
    }

    /// Worker that owns this session
    #[must_use]
    pub const fn worker(&self) -> &WorkerId {
        &self.worker
    }

    /// End the session now, releasing the worker's binding.
    ///
    /// Dropping the guard does the same; this form names the intent at the
    /// end of a test body.
    pub fn end(self) {
        drop(self);
    }
}

impl Drop for TestSession {
    fn drop(&mut self) {
        self.registry.release(&self.worker);
    }
}
