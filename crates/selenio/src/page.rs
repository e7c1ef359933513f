//! Interaction layer and page objects.
//!
//! [`BasePage`] is the only place test code touches the DOM: every action
//! resolves the calling worker's session through the registry, waits for the
//! target element's readiness condition, and only then interacts. Page
//! objects such as [`LoginPage`] compose these primitives into
//! intention-revealing steps.

use std::sync::Arc;

use crate::config::Config;
use crate::driver::WebElement;
use crate::locator::Locator;
use crate::registry::{SessionRegistry, WorkerId};
use crate::result::{DriverError, Result};
use crate::session::Session;
use crate::wait::{WaitEngine, WaitSpec};

// ============================================================================
// Base page
// ============================================================================

/// Session-aware interaction primitives shared by all page objects.
///
/// Cheap to clone; clones share the registry and configuration. A page is
/// pinned to one [`WorkerId`] and always acts on whatever session that
/// worker currently has bound, so a test that tears down and relaunches a
/// browser keeps using the same page object.
#[derive(Debug, Clone)]
pub struct BasePage {
    worker: WorkerId,
    registry: Arc<SessionRegistry>,
    wait: WaitEngine,
}

impl BasePage {
    /// Create an interaction layer for `worker` over `registry`
    #[must_use]
    pub fn new(worker: WorkerId, registry: Arc<SessionRegistry>, config: Arc<Config>) -> Self {
        Self {
            worker,
            registry,
            wait: WaitEngine::new(config),
        }
    }

    /// Worker this page acts on behalf of
    #[must_use]
    pub const fn worker(&self) -> &WorkerId {
        &self.worker
    }

    /// Wait for the element to be clickable, then click it.
    ///
    /// # Errors
    ///
    /// Fails when no session is bound, the wait expires, or the backend
    /// rejects the click.
    pub fn click(&self, locator: &Locator) -> Result<()> {
        tracing::info!(%locator, "clicking element");
        let element = self.wait_for_clickable(locator)?;
        element.click()?;
        Ok(())
    }

    /// Wait for the element to be visible, clear it, then type `text`.
    ///
    /// Clearing first is part of the contract: typing always replaces the
    /// field content, never appends to it. The log line carries the text
    /// length, never the text, which may be a credential.
    ///
    /// # Errors
    ///
    /// Fails when no session is bound, the wait expires, or the backend
    /// rejects the clear or the keystrokes.
    pub fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        tracing::info!(%locator, chars = text.len(), "typing into element");
        let element = self.wait_for_visible(locator)?;
        element.clear()?;
        element.send_text(text)?;
        Ok(())
    }

    /// Wait for the element to be visible and return its rendered text.
    ///
    /// # Errors
    ///
    /// Fails when no session is bound, the wait expires, or the backend
    /// cannot read the text.
    pub fn read_text(&self, locator: &Locator) -> Result<String> {
        let element = self.wait_for_visible(locator)?;
        Ok(element.text()?)
    }

    /// Probe whether the element becomes visible within the deadline.
    ///
    /// This is the one place a wait timeout converts into a boolean:
    /// `Ok(false)` means "did not appear in time". Configuration and driver
    /// failures still propagate as errors, so a missing session or a broken
    /// deadline never reads as "not displayed".
    ///
    /// # Errors
    ///
    /// Fails for any reason other than the wait expiring.
    pub fn is_displayed(&self, locator: &Locator) -> Result<bool> {
        match self.wait_for_visible(locator) {
            Ok(_) => Ok(true),
            Err(err) if err.is_wait_timeout() => {
                tracing::debug!(%locator, "element not displayed within deadline");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Point the worker's session at `url`. No load wait is implied; callers
    /// wait on the element they need next.
    ///
    /// # Errors
    ///
    /// Fails when no session is bound or the backend rejects the navigation.
    pub fn navigate(&self, url: &str) -> Result<()> {
        tracing::info!(url, "navigating");
        self.session()?.navigate(url)?;
        Ok(())
    }

    /// Wait for visibility and hand back the element.
    ///
    /// # Errors
    ///
    /// Fails when no session is bound or the wait expires.
    pub fn wait_for_visible(&self, locator: &Locator) -> Result<Box<dyn WebElement>> {
        let session = self.session()?;
        self.wait.until(&session, locator, &WaitSpec::visible())
    }

    /// Wait for clickability and hand back the element.
    ///
    /// # Errors
    ///
    /// Fails when no session is bound or the wait expires.
    pub fn wait_for_clickable(&self, locator: &Locator) -> Result<Box<dyn WebElement>> {
        let session = self.session()?;
        self.wait.until(&session, locator, &WaitSpec::clickable())
    }

    fn session(&self) -> Result<Session> {
        self.registry
            .current(&self.worker)
            .ok_or_else(|| {
                DriverError::NoActiveSession {
                    worker: self.worker.clone(),
                }
                .into()
            })
    }
}

// ============================================================================
// Login page
// ============================================================================

/// Page object for the standard login form.
///
/// Locators mirror the form's DOM: name-keyed credential inputs, a submit
/// button, and the brand logo whose visibility marks the page as loaded.
#[derive(Debug, Clone)]
pub struct LoginPage {
    page: BasePage,
    username_input: Locator,
    password_input: Locator,
    login_button: Locator,
    brand_logo: Locator,
}

impl LoginPage {
    /// Bind the login page to an interaction layer
    #[must_use]
    pub fn new(page: BasePage) -> Self {
        Self {
            page,
            username_input: Locator::name("username"),
            password_input: Locator::name("password"),
            login_button: Locator::css("button[type='submit']"),
            brand_logo: Locator::css("img[alt='company-branding']"),
        }
    }

    /// Fill the username field
    ///
    /// # Errors
    ///
    /// Propagates interaction failures from the underlying page.
    pub fn enter_username(&self, username: &str) -> Result<&Self> {
        self.page.type_text(&self.username_input, username)?;
        Ok(self)
    }

    /// Fill the password field
    ///
    /// # Errors
    ///
    /// Propagates interaction failures from the underlying page.
    pub fn enter_password(&self, password: &str) -> Result<&Self> {
        self.page.type_text(&self.password_input, password)?;
        Ok(self)
    }

    /// Click the submit button
    ///
    /// # Errors
    ///
    /// Propagates interaction failures from the underlying page.
    pub fn submit(&self) -> Result<()> {
        self.page.click(&self.login_button)
    }

    /// Full login flow: username, password, submit
    ///
    /// # Errors
    ///
    /// Propagates the first interaction failure.
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        self.enter_username(username)?
            .enter_password(password)?
            .submit()
    }

    /// Whether the branded login form is on screen
    ///
    /// # Errors
    ///
    /// Fails for any reason other than the logo not appearing in time.
    pub fn is_login_page_displayed(&self) -> Result<bool> {
        self.page.is_displayed(&self.brand_logo)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{keys, Environment};
    use crate::driver::{BrowserEngine, BrowserKind, MockElement, MockEngine};
    use crate::result::Error;

    fn page_fixture(explicit_wait_secs: u64) -> (MockEngine, Arc<SessionRegistry>, BasePage) {
        let engine = MockEngine::new();
        let registry = Arc::new(SessionRegistry::new());
        let config = Arc::new(Config::from_pairs(
            Environment::Dev,
            [(keys::EXPLICIT_WAIT, explicit_wait_secs.to_string())],
        ));
        let page = BasePage::new(
            WorkerId::new("page-worker"),
            Arc::clone(&registry),
            config,
        );
        (engine, registry, page)
    }

    fn bind_session(engine: &MockEngine, registry: &SessionRegistry, worker: &WorkerId) {
        let options = BrowserKind::Chrome.launch_options(true);
        let backend = engine.launch(BrowserKind::Chrome, &options).unwrap();
        registry
            .bind(worker, Session::new(BrowserKind::Chrome, backend))
            .unwrap();
    }

    mod base_page_tests {
        use super::*;

        #[test]
        fn test_click_reaches_the_element() {
            let (engine, registry, page) = page_fixture(2);
            bind_session(&engine, &registry, page.worker());
            let locator = Locator::id("go");
            let button = MockElement::new();
            engine.dom().insert(locator.clone(), button.clone());

            page.click(&locator).unwrap();
            assert_eq!(button.click_count(), 1);
        }

        #[test]
        fn test_click_waits_for_clickable() {
            let (engine, registry, page) = page_fixture(1);
            bind_session(&engine, &registry, page.worker());
            let locator = Locator::id("frozen");
            let button = MockElement::disabled();
            engine.dom().insert(locator.clone(), button.clone());

            let err = page.click(&locator).unwrap_err();
            assert!(err.is_wait_timeout());
            assert_eq!(button.click_count(), 0);
        }

        #[test]
        fn test_type_text_replaces_existing_content() {
            let (engine, registry, page) = page_fixture(2);
            bind_session(&engine, &registry, page.worker());
            let locator = Locator::name("city");
            let field = MockElement::new().with_value("old text");
            engine.dom().insert(locator.clone(), field.clone());

            page.type_text(&locator, "Valparaiso").unwrap();
            assert_eq!(field.value(), "Valparaiso");
        }

        #[test]
        fn test_type_text_waits_for_visible() {
            let (engine, registry, page) = page_fixture(1);
            bind_session(&engine, &registry, page.worker());
            let locator = Locator::name("hidden-field");
            let field = MockElement::hidden();
            engine.dom().insert(locator.clone(), field.clone());

            let err = page.type_text(&locator, "nope").unwrap_err();
            assert!(err.is_wait_timeout());
            assert_eq!(field.value(), "");
        }

        #[test]
        fn test_read_text_returns_rendered_text() {
            let (engine, registry, page) = page_fixture(2);
            bind_session(&engine, &registry, page.worker());
            let locator = Locator::css(".flash");
            engine
                .dom()
                .insert(locator.clone(), MockElement::new().with_text("Welcome back"));

            assert_eq!(page.read_text(&locator).unwrap(), "Welcome back");
        }

        #[test]
        fn test_is_displayed_true_when_visible() {
            let (engine, registry, page) = page_fixture(2);
            bind_session(&engine, &registry, page.worker());
            let locator = Locator::id("banner");
            engine.dom().insert(locator.clone(), MockElement::new());

            assert!(page.is_displayed(&locator).unwrap());
        }

        #[test]
        fn test_is_displayed_false_on_wait_timeout() {
            let (engine, registry, page) = page_fixture(1);
            bind_session(&engine, &registry, page.worker());
            let locator = Locator::id("banner");
            engine.dom().insert(locator.clone(), MockElement::hidden());

            assert!(!page.is_displayed(&locator).unwrap());
        }

        #[test]
        fn test_is_displayed_false_when_absent() {
            let (engine, registry, page) = page_fixture(1);
            bind_session(&engine, &registry, page.worker());

            assert!(!page.is_displayed(&Locator::id("ghost")).unwrap());
        }

        #[test]
        fn test_is_displayed_propagates_non_timeout_errors() {
            // Broken deadline configuration must not read as "not displayed".
            let engine = MockEngine::new();
            let registry = Arc::new(SessionRegistry::new());
            let config = Arc::new(Config::from_pairs(Environment::Dev, [("browser", "chrome")]));
            let page = BasePage::new(
                WorkerId::new("page-worker"),
                Arc::clone(&registry),
                config,
            );
            bind_session(&engine, &registry, page.worker());

            let err = page.is_displayed(&Locator::id("banner")).unwrap_err();
            assert!(matches!(err, Error::Config(_)));
        }

        #[test]
        fn test_navigate_reaches_the_session() {
            let (engine, registry, page) = page_fixture(2);
            bind_session(&engine, &registry, page.worker());

            page.navigate("https://example.test/inventory").unwrap();
            assert_eq!(
                engine.dom().navigations(),
                vec!["https://example.test/inventory".to_string()]
            );
        }

        #[test]
        fn test_actions_fail_without_a_bound_session() {
            let (engine, _registry, page) = page_fixture(2);
            engine.dom().insert(Locator::id("go"), MockElement::new());

            let err = page.click(&Locator::id("go")).unwrap_err();
            assert!(matches!(
                err,
                Error::Driver(DriverError::NoActiveSession { ref worker })
                    if worker.as_str() == "page-worker"
            ));
        }

        #[test]
        fn test_navigate_fails_without_a_bound_session() {
            let (_engine, _registry, page) = page_fixture(2);

            let err = page.navigate("https://example.test").unwrap_err();
            assert!(matches!(
                err,
                Error::Driver(DriverError::NoActiveSession { .. })
            ));
        }

        #[test]
        fn test_wait_passthroughs_hand_back_the_element() {
            let (engine, registry, page) = page_fixture(2);
            bind_session(&engine, &registry, page.worker());
            let locator = Locator::id("panel");
            engine
                .dom()
                .insert(locator.clone(), MockElement::new().with_text("ready"));

            let visible = page.wait_for_visible(&locator).unwrap();
            assert_eq!(visible.text().unwrap(), "ready");
            let clickable = page.wait_for_clickable(&locator).unwrap();
            assert!(clickable.is_enabled().unwrap());
        }

        #[test]
        fn test_page_follows_a_rebound_session() {
            let (engine, registry, page) = page_fixture(2);
            let worker = page.worker().clone();
            bind_session(&engine, &registry, &worker);

            page.navigate("https://example.test/first").unwrap();
            registry.release(&worker);
            bind_session(&engine, &registry, &worker);
            page.navigate("https://example.test/second").unwrap();

            assert_eq!(engine.dom().navigations().len(), 2);
        }
    }

    mod login_page_tests {
        use super::*;

        struct LoginForm {
            username: MockElement,
            password: MockElement,
            submit: MockElement,
            logo: MockElement,
        }

        fn install_login_form(engine: &MockEngine) -> LoginForm {
            let form = LoginForm {
                username: MockElement::new(),
                password: MockElement::new(),
                submit: MockElement::new(),
                logo: MockElement::new(),
            };
            let dom = engine.dom();
            dom.insert(Locator::name("username"), form.username.clone());
            dom.insert(Locator::name("password"), form.password.clone());
            dom.insert(Locator::css("button[type='submit']"), form.submit.clone());
            dom.insert(
                Locator::css("img[alt='company-branding']"),
                form.logo.clone(),
            );
            form
        }

        #[test]
        fn test_login_fills_credentials_and_submits() {
            let (engine, registry, page) = page_fixture(2);
            bind_session(&engine, &registry, page.worker());
            let form = install_login_form(&engine);
            let login = LoginPage::new(page);

            login.login("standard_user", "secret_sauce").unwrap();

            assert_eq!(form.username.value(), "standard_user");
            assert_eq!(form.password.value(), "secret_sauce");
            assert_eq!(form.submit.click_count(), 1);
        }

        #[test]
        fn test_fluent_entry_chains() {
            let (engine, registry, page) = page_fixture(2);
            bind_session(&engine, &registry, page.worker());
            let form = install_login_form(&engine);
            let login = LoginPage::new(page);

            login
                .enter_username("alice")
                .unwrap()
                .enter_password("wonderland")
                .unwrap();

            assert_eq!(form.username.value(), "alice");
            assert_eq!(form.password.value(), "wonderland");
            assert_eq!(form.submit.click_count(), 0);
        }

        #[test]
        fn test_login_reentry_replaces_previous_credentials() {
            let (engine, registry, page) = page_fixture(2);
            bind_session(&engine, &registry, page.worker());
            let form = install_login_form(&engine);
            let login = LoginPage::new(page);

            login.enter_username("first_try").unwrap();
            login.enter_username("second_try").unwrap();

            assert_eq!(form.username.value(), "second_try");
        }

        #[test]
        fn test_login_page_displayed_tracks_the_logo() {
            let (engine, registry, page) = page_fixture(1);
            bind_session(&engine, &registry, page.worker());
            let form = install_login_form(&engine);
            let login = LoginPage::new(page);

            assert!(login.is_login_page_displayed().unwrap());
            form.logo.set_visible(false);
            assert!(!login.is_login_page_displayed().unwrap());
        }

        #[test]
        fn test_login_without_form_times_out() {
            let (engine, registry, page) = page_fixture(1);
            bind_session(&engine, &registry, page.worker());
            let login = LoginPage::new(page);

            let err = login.login("user", "pass").unwrap_err();
            assert!(err.is_wait_timeout());
        }
    }
}
