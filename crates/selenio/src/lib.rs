//! Selenio: session-managed browser UI test harness.
//!
//! Selenio runs UI suites against a real or simulated browser with strict
//! per-worker session isolation. One configuration load drives the whole
//! run; every browser belongs to exactly one worker; every DOM interaction
//! waits for its readiness condition before touching the element.
//!
//! # Architecture
//!
//! ```text
//! config.properties + <env>.properties
//!              │
//!              ▼
//!           Config ───► SessionFactory ───► BrowserEngine
//!              │               │          (real or MockEngine)
//!              ▼               ▼
//!         WaitEngine    SessionRegistry (worker → session)
//!              │               │
//!              └──► BasePage ◄─┘
//!                      │
//!                      ▼
//!            page objects (LoginPage)
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use selenio::{
//!     Config, Environment, Harness, Locator, MockElement, MockEngine, WorkerId,
//! };
//!
//! // Script the page the suite will see.
//! let engine = Arc::new(MockEngine::new());
//! engine
//!     .dom()
//!     .insert(Locator::id("inventory"), MockElement::new().with_text("Products"));
//!
//! let config = Config::from_pairs(
//!     Environment::Dev,
//!     [
//!         ("browser", "chrome"),
//!         ("headless", "true"),
//!         ("baseURL", "https://shop.example.test"),
//!         ("explicitWait", "5"),
//!     ],
//! );
//!
//! let harness = Harness::new(config, engine);
//! let test = harness.start_session(WorkerId::new("worker-1"))?;
//! assert_eq!(test.page().read_text(&Locator::id("inventory"))?, "Products");
//! test.end();
//! # Ok::<(), selenio::Error>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod config;
pub mod driver;
pub mod harness;
pub mod locator;
pub mod logging;
pub mod page;
pub mod registry;
pub mod result;
pub mod session;
pub mod wait;

pub use config::{keys, Config, ConfigLoader, Environment, BASE_FILE};
pub use driver::{
    BrowserEngine, BrowserKind, DriverResult, LaunchOptions, MockDom, MockElement, MockEngine,
    MockSession, WebElement, WebSession,
};
pub use harness::{Harness, TestSession};
pub use locator::{Locator, Strategy};
pub use page::{BasePage, LoginPage};
pub use registry::{SessionRegistry, WorkerId};
pub use result::{ConfigError, DriverError, Error, Result, WaitError};
pub use session::{Session, SessionFactory, SessionId};
pub use wait::{ElementCondition, WaitEngine, WaitSpec, DEFAULT_POLL_INTERVAL_MS};
