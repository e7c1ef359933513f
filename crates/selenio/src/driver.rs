//! Browser engine boundary.
//!
//! The harness never talks to a browser directly; it drives an external
//! automation engine through three object-safe traits:
//!
//! - [`BrowserEngine`] launches sessions for a [`BrowserKind`],
//! - [`WebSession`] navigates and locates elements,
//! - [`WebElement`] exposes the element-level probes and actions the wait
//!   engine and interaction layer are built on.
//!
//! Swapping the engine (CDP client, WebDriver protocol client, in-process
//! double) is a matter of implementing these traits. [`MockEngine`]
//! implements the whole boundary in-process with a scriptable DOM and is
//! exported so downstream crates can unit-test their page objects without a
//! browser.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::locator::Locator;
use crate::result::DriverError;

/// Result alias for engine-boundary operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

// ============================================================================
// Browser kinds and launch options
// ============================================================================

/// Supported browser kinds (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome / Chromium
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Microsoft Edge
    Edge,
    /// Apple Safari
    Safari,
}

impl BrowserKind {
    /// Browser name as it appears in configuration and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
            Self::Safari => "safari",
        }
    }

    /// Build the startup arguments for this kind in the requested mode.
    ///
    /// Chromium-family browsers always start maximized and use the modern
    /// `--headless=new` mode; Firefox uses `-headless`. Safari has no
    /// headless mode, so the flag carries no argument there.
    #[must_use]
    pub fn launch_options(self, headless: bool) -> LaunchOptions {
        let mut options = LaunchOptions::new(headless);
        match self {
            Self::Chrome | Self::Edge => {
                if headless {
                    options = options.with_arg("--headless=new");
                }
                options = options.with_arg("--start-maximized");
            }
            Self::Firefox => {
                if headless {
                    options = options.with_arg("-headless");
                }
            }
            Self::Safari => {
                if headless {
                    tracing::debug!("safari has no headless mode; flag has no effect");
                }
            }
        }
        options
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = DriverError;

    /// Case-insensitive parse over the closed browser set
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("chrome") {
            Ok(Self::Chrome)
        } else if trimmed.eq_ignore_ascii_case("firefox") {
            Ok(Self::Firefox)
        } else if trimmed.eq_ignore_ascii_case("edge") {
            Ok(Self::Edge)
        } else if trimmed.eq_ignore_ascii_case("safari") {
            Ok(Self::Safari)
        } else {
            Err(DriverError::UnsupportedBrowser {
                name: name.to_string(),
            })
        }
    }
}

/// Startup mode and arguments handed to the engine at launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    headless: bool,
    args: Vec<String>,
}

impl LaunchOptions {
    /// Create options with no arguments
    #[must_use]
    pub const fn new(headless: bool) -> Self {
        Self {
            headless,
            args: Vec::new(),
        }
    }

    /// Append a command-line argument
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Whether the session runs headless
    #[must_use]
    pub const fn headless(&self) -> bool {
        self.headless
    }

    /// Arguments in the order they were added
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

// ============================================================================
// Engine boundary traits
// ============================================================================

/// Launches browser sessions; the entry point of the engine boundary
pub trait BrowserEngine: Send + Sync {
    /// Launch a new session of `kind` with `options`
    fn launch(&self, kind: BrowserKind, options: &LaunchOptions)
        -> DriverResult<Arc<dyn WebSession>>;
}

/// One live browser instance as the harness sees it
pub trait WebSession: Send + Sync + fmt::Debug {
    /// Load `url`
    fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Find the first element matching `locator`; `None` when nothing matches
    fn find_element(&self, locator: &Locator) -> DriverResult<Option<Box<dyn WebElement>>>;

    /// Shut the browser down; the session is unusable afterwards
    fn close(&self) -> DriverResult<()>;
}

/// Handle to one located DOM element
pub trait WebElement: fmt::Debug {
    /// Whether the element is rendered and visible
    fn is_visible(&self) -> DriverResult<bool>;

    /// Whether the element accepts interaction
    fn is_enabled(&self) -> DriverResult<bool>;

    /// Click the element
    fn click(&self) -> DriverResult<()>;

    /// Clear the element's current value
    fn clear(&self) -> DriverResult<()>;

    /// Append `text` to the element's value
    fn send_text(&self, text: &str) -> DriverResult<()>;

    /// Rendered text content
    fn text(&self) -> DriverResult<String>;
}

// ============================================================================
// Mock engine
// ============================================================================

/// One scriptable element in a [`MockDom`].
///
/// Cheap to clone; all clones share state, so a test can keep a handle and
/// mutate visibility while a wait polls the same element through the
/// session. Actions are strict the way a real engine is: clicking a hidden
/// or disabled element fails, typing into a hidden one fails.
#[derive(Debug, Clone)]
pub struct MockElement {
    state: Arc<Mutex<ElementState>>,
}

#[derive(Debug, Default)]
struct ElementState {
    visible: bool,
    enabled: bool,
    text: String,
    value: String,
    clicks: usize,
}

impl MockElement {
    /// Create a visible, enabled element with no text
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ElementState {
                visible: true,
                enabled: true,
                ..ElementState::default()
            })),
        }
    }

    /// Create an element that is present in the DOM but not visible
    #[must_use]
    pub fn hidden() -> Self {
        let element = Self::new();
        element.set_visible(false);
        element
    }

    /// Create a visible element that rejects interaction
    #[must_use]
    pub fn disabled() -> Self {
        let element = Self::new();
        element.set_enabled(false);
        element
    }

    /// Set rendered text content
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.lock().text = text.into();
        self
    }

    /// Pre-populate the element's value (a filled form field)
    #[must_use]
    pub fn with_value(self, value: impl Into<String>) -> Self {
        self.lock().value = value.into();
        self
    }

    /// Flip visibility (observable through live session handles)
    pub fn set_visible(&self, visible: bool) {
        self.lock().visible = visible;
    }

    /// Flip interactability
    pub fn set_enabled(&self, enabled: bool) {
        self.lock().enabled = enabled;
    }

    /// Number of clicks received
    #[must_use]
    pub fn click_count(&self) -> usize {
        self.lock().clicks
    }

    /// Current value (what typing and clearing act on)
    #[must_use]
    pub fn value(&self) -> String {
        self.lock().value.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ElementState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for MockElement {
    fn default() -> Self {
        Self::new()
    }
}

impl WebElement for MockElement {
    fn is_visible(&self) -> DriverResult<bool> {
        Ok(self.lock().visible)
    }

    fn is_enabled(&self) -> DriverResult<bool> {
        Ok(self.lock().enabled)
    }

    fn click(&self) -> DriverResult<()> {
        let mut state = self.lock();
        if !state.visible || !state.enabled {
            return Err(DriverError::Backend {
                message: "element not interactable".to_string(),
            });
        }
        state.clicks += 1;
        Ok(())
    }

    fn clear(&self) -> DriverResult<()> {
        let mut state = self.lock();
        if !state.visible {
            return Err(DriverError::Backend {
                message: "element not interactable".to_string(),
            });
        }
        state.value.clear();
        Ok(())
    }

    fn send_text(&self, text: &str) -> DriverResult<()> {
        let mut state = self.lock();
        if !state.visible {
            return Err(DriverError::Backend {
                message: "element not interactable".to_string(),
            });
        }
        state.value.push_str(text);
        Ok(())
    }

    fn text(&self) -> DriverResult<String> {
        Ok(self.lock().text.clone())
    }
}

/// Scriptable in-process DOM shared by every session a [`MockEngine`] launches
#[derive(Debug, Default)]
pub struct MockDom {
    elements: Mutex<HashMap<Locator, MockElement>>,
    navigations: Mutex<Vec<String>>,
}

impl MockDom {
    /// Register an element under `locator`
    pub fn insert(&self, locator: Locator, element: MockElement) {
        self.lock_elements().insert(locator, element);
    }

    /// Remove the element under `locator`
    pub fn remove(&self, locator: &Locator) -> Option<MockElement> {
        self.lock_elements().remove(locator)
    }

    /// URLs navigated to, in order, across all sessions
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn find(&self, locator: &Locator) -> Option<MockElement> {
        self.lock_elements().get(locator).cloned()
    }

    fn record_navigation(&self, url: &str) {
        self.navigations
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(url.to_string());
    }

    fn lock_elements(&self) -> std::sync::MutexGuard<'_, HashMap<Locator, MockElement>> {
        self.elements
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Session produced by [`MockEngine::launch`]
#[derive(Debug)]
pub struct MockSession {
    dom: Arc<MockDom>,
    closed: AtomicBool,
    close_calls: AtomicUsize,
    fail_close: bool,
}

impl MockSession {
    fn new(dom: Arc<MockDom>, fail_close: bool) -> Self {
        Self {
            dom,
            closed: AtomicBool::new(false),
            close_calls: AtomicUsize::new(0),
            fail_close,
        }
    }

    /// Whether `close` has completed successfully
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of times `close` was attempted
    #[must_use]
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> DriverResult<()> {
        if self.is_closed() {
            return Err(DriverError::Backend {
                message: "session already closed".to_string(),
            });
        }
        Ok(())
    }
}

impl WebSession for MockSession {
    fn navigate(&self, url: &str) -> DriverResult<()> {
        self.ensure_open()?;
        self.dom.record_navigation(url);
        Ok(())
    }

    fn find_element(&self, locator: &Locator) -> DriverResult<Option<Box<dyn WebElement>>> {
        self.ensure_open()?;
        Ok(self
            .dom
            .find(locator)
            .map(|element| Box::new(element) as Box<dyn WebElement>))
    }

    fn close(&self) -> DriverResult<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            // Simulates a hung browser: the attempt is recorded but the
            // session never reaches the closed state.
            return Err(DriverError::Backend {
                message: "browser did not shut down".to_string(),
            });
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// In-process engine double with a scriptable DOM.
///
/// All sessions it launches share one [`MockDom`], so a test scripts the
/// page once, starts a session through the normal factory path, and then
/// asserts on navigation history, click counts, and typed values. Launch
/// and close failures can be injected to exercise error paths.
#[derive(Debug, Default)]
pub struct MockEngine {
    dom: Arc<MockDom>,
    launches: Mutex<Vec<(BrowserKind, LaunchOptions)>>,
    sessions: Mutex<Vec<Arc<MockSession>>>,
    fail_launch: Mutex<Option<String>>,
    fail_close: AtomicBool,
}

impl MockEngine {
    /// Create an engine with an empty DOM
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The DOM every launched session reads
    #[must_use]
    pub fn dom(&self) -> Arc<MockDom> {
        Arc::clone(&self.dom)
    }

    /// Make every subsequent launch fail with `message`
    pub fn fail_launches_with(&self, message: impl Into<String>) {
        *self
            .fail_launch
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(message.into());
    }

    /// Make sessions launched from now on fail their `close`
    pub fn fail_session_close(&self) {
        self.fail_close.store(true, Ordering::SeqCst);
    }

    /// Recorded launches (kind and options), in order
    #[must_use]
    pub fn launches(&self) -> Vec<(BrowserKind, LaunchOptions)> {
        self.launches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of sessions launched
    #[must_use]
    pub fn launch_count(&self) -> usize {
        self.launches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// The most recently launched session, if any
    #[must_use]
    pub fn last_session(&self) -> Option<Arc<MockSession>> {
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl BrowserEngine for MockEngine {
    fn launch(
        &self,
        kind: BrowserKind,
        options: &LaunchOptions,
    ) -> DriverResult<Arc<dyn WebSession>> {
        if let Some(message) = self
            .fail_launch
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
        {
            return Err(DriverError::LaunchFailed { kind, message });
        }
        self.launches
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((kind, options.clone()));
        let session = Arc::new(MockSession::new(
            Arc::clone(&self.dom),
            self.fail_close.load(Ordering::SeqCst),
        ));
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Arc::clone(&session));
        Ok(session)
    }
}
