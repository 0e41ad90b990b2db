// src/evaluation/configuration.rs

//! Build configurations and group scopes
//!
//! A configuration is a `Name|Platform` pair such as `Debug|AnyCPU`. Property
//! and item groups in the legacy document are usually conditioned on one of
//! these, and every diff lookup is keyed by it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// Platform assumed when a configuration key does not name one
pub const DEFAULT_PLATFORM: &str = "AnyCPU";

/// A named build variant, compared without regard to case
///
/// Platform spelling is normalized so that the solution-style `Any CPU` and the
/// project-style `AnyCPU` refer to the same configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Configuration {
    name: String,
    platform: String,
}

impl Configuration {
    pub fn new(name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            platform: platform.into().trim().to_string(),
        }
    }

    /// Parse a `Name|Platform` key; a bare `Name` gets the default platform
    pub fn parse(key: &str) -> Self {
        match key.split_once('|') {
            Some((name, platform)) => Self::new(name, platform),
            None => Self::new(key, DEFAULT_PLATFORM),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Global property overrides that select this configuration
    pub fn global_properties(&self) -> BTreeMap<String, String> {
        let mut props = BTreeMap::new();
        props.insert("Configuration".to_string(), self.name.clone());
        props.insert("Platform".to_string(), self.platform.clone());
        props
    }

    fn key(&self) -> (String, String) {
        (
            self.name.to_ascii_lowercase(),
            self.platform.replace(' ', "").to_ascii_lowercase(),
        )
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Configuration {}

impl Hash for Configuration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for Configuration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Configuration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.name, self.platform)
    }
}

impl From<String> for Configuration {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Configuration> for String {
    fn from(value: Configuration) -> Self {
        value.to_string()
    }
}

/// Which configurations a conditioned group applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationSelector {
    pub name: String,
    /// `None` when the condition only tests `$(Configuration)`
    pub platform: Option<String>,
}

impl ConfigurationSelector {
    pub fn matches(&self, configuration: &Configuration) -> bool {
        if !self.name.eq_ignore_ascii_case(configuration.name()) {
            return false;
        }
        match &self.platform {
            Some(platform) => {
                Configuration::new(&self.name, platform.as_str()) == *configuration
            }
            None => true,
        }
    }
}

impl fmt::Display for ConfigurationSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.platform {
            Some(platform) => write!(f, "{}|{}", self.name, platform),
            None => f.write_str(&self.name),
        }
    }
}

/// The scope a property or item group applies to, derived from its condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupScope {
    /// No condition; the group applies to every configuration
    Unconditioned,
    /// A configuration (or configuration name) test
    Configured(ConfigurationSelector),
    /// Any other condition; diff-driven passes leave such groups alone
    Opaque,
}

static CONFIG_AND_PLATFORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*'\s*\$\(\s*Configuration\s*\)\s*\|\s*\$\(\s*Platform\s*\)\s*'\s*==\s*'\s*([^'|]+?)\s*\|\s*([^']+?)\s*'\s*$",
    )
    .expect("valid configuration condition regex")
});

static CONFIG_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*'\s*\$\(\s*Configuration\s*\)\s*'\s*==\s*'\s*([^'|]+?)\s*'\s*$")
        .expect("valid configuration condition regex")
});

impl GroupScope {
    /// Classify a group condition
    pub fn from_condition(condition: Option<&str>) -> Self {
        let condition = match condition.map(str::trim) {
            None | Some("") => return Self::Unconditioned,
            Some(c) => c,
        };

        if let Some(caps) = CONFIG_AND_PLATFORM_RE.captures(condition) {
            return Self::Configured(ConfigurationSelector {
                name: caps[1].to_string(),
                platform: Some(caps[2].to_string()),
            });
        }

        if let Some(caps) = CONFIG_ONLY_RE.captures(condition) {
            return Self::Configured(ConfigurationSelector {
                name: caps[1].to_string(),
                platform: None,
            });
        }

        Self::Opaque
    }

    /// The configuration name this scope pins, if any
    pub fn configuration_name(&self) -> Option<&str> {
        match self {
            Self::Configured(selector) => Some(&selector.name),
            _ => None,
        }
    }

    /// The platform this scope pins, if any
    pub fn platform_name(&self) -> Option<&str> {
        match self {
            Self::Configured(selector) => selector.platform.as_deref(),
            _ => None,
        }
    }
}
