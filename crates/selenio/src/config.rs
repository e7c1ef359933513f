//! Layered key-value configuration.
//!
//! Configuration is resolved once, explicitly, at suite startup: the caller
//! builds a [`ConfigLoader`], points it at a directory holding flat
//! `key=value` files, and receives an immutable [`Config`] snapshot. There is
//! no lazy global state; components that need configuration take the value
//! (usually as `Arc<Config>`) from whoever loaded it.
//!
//! Resolution happens in two steps:
//!
//! 1. The active [`Environment`] is chosen: explicit override >
//!    `env` key in the base file > `DEV` default. Names are matched
//!    case-insensitively against the closed set.
//! 2. The base file `config.properties` is merged with the overlay file named
//!    after the environment (`dev.properties`, `qa.properties`,
//!    `prod.properties`); overlay values win on key collision.
//!
//! Both files are mandatory. A missing file is [`ConfigError::SourceUnavailable`]
//! and a malformed line is [`ConfigError::ParseFailure`]: configuration is
//! not optional at startup and never silently partial.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::result::ConfigError;

/// Name of the base configuration file
pub const BASE_FILE: &str = "config.properties";

/// Well-known configuration keys
pub mod keys {
    /// Browser kind to launch (chrome | firefox | edge | safari)
    pub const BROWSER: &str = "browser";
    /// Headless mode toggle ("true" / "false")
    pub const HEADLESS: &str = "headless";
    /// Application root URL that fresh sessions navigate to
    pub const BASE_URL: &str = "baseURL";
    /// Explicit wait budget in seconds for element conditions
    pub const EXPLICIT_WAIT: &str = "explicitWait";
    /// Environment selector understood by the base file and the
    /// process-level override
    pub const ENV: &str = "env";
}

// ============================================================================
// Environment
// ============================================================================

/// A named deployment target selecting which configuration overlay applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development target (the default)
    #[default]
    Dev,
    /// QA / staging target
    Qa,
    /// Production target
    Prod,
}

impl Environment {
    /// Environment name as used in file names and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Qa => "qa",
            Self::Prod => "prod",
        }
    }

    /// Name of this environment's overlay file
    #[must_use]
    pub fn properties_file(self) -> String {
        format!("{}.properties", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    /// Case-insensitive parse over the closed environment set
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        if trimmed.eq_ignore_ascii_case("dev") {
            Ok(Self::Dev)
        } else if trimmed.eq_ignore_ascii_case("qa") {
            Ok(Self::Qa)
        } else if trimmed.eq_ignore_ascii_case("prod") {
            Ok(Self::Prod)
        } else {
            Err(ConfigError::UnknownEnvironment {
                name: name.to_string(),
            })
        }
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Builder for the one-time configuration load
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
    env_override: Option<String>,
}

impl ConfigLoader {
    /// Create a loader reading from `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            env_override: None,
        }
    }

    /// Create a loader whose environment override comes from the `env`
    /// process variable (falling back to `ENV`)
    #[must_use]
    pub fn from_process_env(dir: impl Into<PathBuf>) -> Self {
        let env_override = std::env::var(keys::ENV)
            .or_else(|_| std::env::var("ENV"))
            .ok();
        Self {
            dir: dir.into(),
            env_override,
        }
    }

    /// Set an explicit environment override (beats the base file's `env` key)
    #[must_use]
    pub fn with_env_override(mut self, name: impl Into<String>) -> Self {
        self.env_override = Some(name.into());
        self
    }

    /// Load, merge, and freeze the configuration.
    ///
    /// The environment is resolved from the base file before the overlay is
    /// merged, so an overlay redefining `env` does not change the resolved
    /// environment.
    pub fn load(self) -> Result<Config, ConfigError> {
        let base_path = self.dir.join(BASE_FILE);
        let base = read_properties(&base_path)?;

        let environment = match self.env_override.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.parse()?,
            _ => match base.get(keys::ENV) {
                Some(name) => name.parse()?,
                None => Environment::default(),
            },
        };

        let overlay_path = self.dir.join(environment.properties_file());
        let overlay = read_properties(&overlay_path)?;

        let values = merge_maps(base, overlay);
        tracing::debug!(
            environment = %environment,
            entries = values.len(),
            dir = %self.dir.display(),
            "configuration loaded"
        );
        Ok(Config {
            environment,
            values,
        })
    }
}

fn read_properties(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| ConfigError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
    parse_properties(path, &content)
}

/// Parse the flat `key=value` dialect: `#`/`!` comments, blank lines
/// ignored, split on the first `=`, both sides trimmed. Later duplicates
/// of a key win, matching merge semantics.
fn parse_properties(path: &Path, content: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut values = HashMap::new();
    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(ConfigError::ParseFailure {
                path: path.to_path_buf(),
                line: index + 1,
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::ParseFailure {
                path: path.to_path_buf(),
                line: index + 1,
            });
        }
        values.insert(key.to_string(), value.trim().to_string());
    }
    Ok(values)
}

fn merge_maps(
    base: HashMap<String, String>,
    overlay: HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = base;
    merged.extend(overlay);
    merged
}

// ============================================================================
// Config
// ============================================================================

/// Immutable configuration snapshot with typed accessors.
///
/// Values never change after the load; sharing a `Config` across worker
/// threads (typically via `Arc`) needs no synchronization.
#[derive(Debug, Clone)]
pub struct Config {
    environment: Environment,
    values: HashMap<String, String>,
}

impl Config {
    /// Build a snapshot from in-memory pairs (embedding and tests)
    pub fn from_pairs<K, V, I>(environment: Environment, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            environment,
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The environment this snapshot was resolved for
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Raw string value for `key`
    pub fn get_string(&self, key: &str) -> Result<&str, ConfigError> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey {
                key: key.to_string(),
            })
    }

    /// Strictly parsed boolean for `key` (exactly "true" or "false")
    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        let value = self.get_string(key)?;
        value
            .parse()
            .map_err(|_| ConfigError::TypeMismatch {
                key: key.to_string(),
                value: value.to_string(),
                expected: "boolean literal \"true\" or \"false\"",
            })
    }

    /// Strictly parsed non-negative integer for `key`
    pub fn get_int(&self, key: &str) -> Result<u64, ConfigError> {
        let value = self.get_string(key)?;
        value.parse().map_err(|_| ConfigError::TypeMismatch {
            key: key.to_string(),
            value: value.to_string(),
            expected: "unsigned integer",
        })
    }

    /// Configured browser name (`browser` key, unparsed)
    pub fn browser(&self) -> Result<&str, ConfigError> {
        self.get_string(keys::BROWSER)
    }

    /// Headless mode toggle (`headless` key)
    pub fn headless(&self) -> Result<bool, ConfigError> {
        self.get_bool(keys::HEADLESS)
    }

    /// Application root URL (`baseURL` key)
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        self.get_string(keys::BASE_URL)
    }

    /// Explicit wait budget (`explicitWait` key, seconds)
    pub fn explicit_wait(&self) -> Result<Duration, ConfigError> {
        Ok(Duration::from_secs(self.get_int(keys::EXPLICIT_WAIT)?))
    }
}
