//! Element locators.
//!
//! A [`Locator`] is an immutable, serializable description of how to find one
//! DOM element: a lookup [`Strategy`] plus a selector string. Page objects
//! define their locators once and hand them to the interaction layer; wait
//! timeouts and action logs print them verbatim, so the `Display` output is
//! the `strategy=selector` form a test author can paste into devtools.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lookup strategy for resolving a locator against the DOM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// CSS selector (e.g. `button.primary`)
    Css,
    /// XPath expression
    XPath,
    /// `id` attribute value
    Id,
    /// `name` attribute value
    Name,
}

impl Strategy {
    /// Strategy name as it appears in logs and serialized locators
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Id => "id",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of how to find one DOM element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    selector: String,
}

impl Locator {
    /// Create a locator with an explicit strategy
    #[must_use]
    pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: selector.into(),
        }
    }

    /// Create a CSS selector locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(expression: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, expression)
    }

    /// Create a locator matching an `id` attribute
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// Create a locator matching a `name` attribute
    #[must_use]
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Strategy::Name, value)
    }

    /// Lookup strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Raw selector string
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.selector)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod strategy_tests {
        use super::*;

        #[test]
        fn test_strategy_names() {
            assert_eq!(Strategy::Css.as_str(), "css");
            assert_eq!(Strategy::XPath.as_str(), "xpath");
            assert_eq!(Strategy::Id.as_str(), "id");
            assert_eq!(Strategy::Name.as_str(), "name");
        }

        #[test]
        fn test_strategy_display_matches_as_str() {
            assert_eq!(Strategy::Css.to_string(), "css");
            assert_eq!(Strategy::Name.to_string(), "name");
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_constructor_shorthands() {
            assert_eq!(
                Locator::css("button.primary"),
                Locator::new(Strategy::Css, "button.primary")
            );
            assert_eq!(
                Locator::name("username"),
                Locator::new(Strategy::Name, "username")
            );
            assert_eq!(
                Locator::xpath("//div[@id='a']"),
                Locator::new(Strategy::XPath, "//div[@id='a']")
            );
            assert_eq!(Locator::id("logo"), Locator::new(Strategy::Id, "logo"));
        }

        #[test]
        fn test_display_is_strategy_equals_selector() {
            let locator = Locator::css("button[type='submit']");
            assert_eq!(locator.to_string(), "css=button[type='submit']");
        }

        #[test]
        fn test_accessors() {
            let locator = Locator::name("password");
            assert_eq!(locator.strategy(), Strategy::Name);
            assert_eq!(locator.selector(), "password");
        }

        #[test]
        fn test_usable_as_hash_map_key() {
            use std::collections::HashMap;

            let mut table = HashMap::new();
            table.insert(Locator::css("#main"), 1);
            table.insert(Locator::css("#side"), 2);
            assert_eq!(table.get(&Locator::css("#main")), Some(&1));
            assert_eq!(table.get(&Locator::xpath("#main")), None);
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_locator_serializes_with_lowercase_strategy() {
            let locator = Locator::name("username");
            let json = serde_json::to_string(&locator).unwrap();
            assert_eq!(json, r#"{"strategy":"name","selector":"username"}"#);
        }

        #[test]
        fn test_locator_round_trips_through_json() {
            let locator = Locator::xpath("//input[@name='q']");
            let json = serde_json::to_string(&locator).unwrap();
            let back: Locator = serde_json::from_str(&json).unwrap();
            assert_eq!(back, locator);
        }
    }
}
