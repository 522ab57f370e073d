//! Distribution model
//!
//! A [`Distribution`] is one release of one of the three families that
//! packaging tools target:
//!
//! ```text
//! f33        Fedora 33
//! el6        EPEL 6   (releases up to 6 use the "el" prefix)
//! epel8      EPEL 8
//! rhel-9.2   RHEL 9.2
//! ```
//!
//! The text form above is the only format this crate defines. Parsing and
//! formatting are exact inverses.

mod resolver;

pub use resolver::{
    allows_overrides, branch_name, build_root_config_name, build_tool_name,
    container_image_name, package_release_tag_suffix, packaging_tool_name, repo_name,
    updates_repo_name, version_string, DistributionNames, Resolver,
};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseDistributionError;

/// Last EPEL release published under the "el" prefix
const LAST_EL_PREFIXED_EPEL: u32 = 6;

static DISTRIBUTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:f(?P<fedora>[0-9]+)",
        r"|(?:epel|el)(?P<epel>[0-9]+)",
        r"|rhel-(?P<rhel>[0-9]+(?:\.[0-9]+)*))$",
    ))
    .expect("distribution pattern compiles")
});

/// A distribution release targeted by packaging tools
///
/// Variants are ordered by declaration, then by their version, so the
/// derived `Ord` is total. Comparing two different families carries no
/// product meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Distribution {
    /// Fedora numbered release (`f33`)
    Fedora(u32),

    /// EPEL release (`el6`, `epel8`)
    Epel(u32),

    /// RHEL dotted release (`rhel-9.2`)
    Rhel(RhelVersion),
}

impl Distribution {
    /// Fedora release number, if this is a Fedora release
    pub fn fedora_number(&self) -> Option<u32> {
        match self {
            Distribution::Fedora(n) => Some(*n),
            Distribution::Epel(_) | Distribution::Rhel(_) => None,
        }
    }

    /// Family name used in the release feed and repo names
    pub fn family(&self) -> &'static str {
        match self {
            Distribution::Fedora(_) => "fedora",
            Distribution::Epel(_) => "epel",
            Distribution::Rhel(_) => "rhel",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Fedora(n) => write!(f, "f{n}"),
            Distribution::Epel(n) if *n > LAST_EL_PREFIXED_EPEL => write!(f, "epel{n}"),
            Distribution::Epel(n) => write!(f, "el{n}"),
            Distribution::Rhel(version) => write!(f, "rhel-{version}"),
        }
    }
}

impl FromStr for Distribution {
    type Err = ParseDistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = DISTRIBUTION_PATTERN
            .captures(s)
            .ok_or_else(|| ParseDistributionError::new(s))?;

        if let Some(n) = captures.name("fedora") {
            return parse_number(n.as_str(), s).map(Distribution::Fedora);
        }
        if let Some(n) = captures.name("epel") {
            return parse_number(n.as_str(), s).map(Distribution::Epel);
        }
        if let Some(version) = captures.name("rhel") {
            return version
                .as_str()
                .parse()
                .map(Distribution::Rhel)
                .map_err(|_| ParseDistributionError::new(s));
        }

        Err(ParseDistributionError::new(s))
    }
}

impl TryFrom<String> for Distribution {
    type Error = ParseDistributionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Distribution> for String {
    fn from(value: Distribution) -> Self {
        value.to_string()
    }
}

fn parse_number(digits: &str, input: &str) -> Result<u32, ParseDistributionError> {
    digits
        .parse()
        .map_err(|_| ParseDistributionError::new(input))
}

/// Dotted RHEL version such as `9.2`
///
/// Components compare numerically from left to right, so `9.10` sorts
/// after `9.2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RhelVersion {
    components: Vec<u32>,
}

impl RhelVersion {
    /// Build a version from its components; `None` when empty
    pub fn new(components: Vec<u32>) -> Option<Self> {
        if components.is_empty() {
            None
        } else {
            Some(Self { components })
        }
    }

    /// Major release number (`9` for `9.2`)
    pub fn major(&self) -> u32 {
        self.components[0]
    }

    pub fn components(&self) -> &[u32] {
        &self.components
    }
}

impl fmt::Display for RhelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.components.iter();
        if let Some(first) = parts.next() {
            write!(f, "{first}")?;
        }
        for part in parts {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}

impl FromStr for RhelVersion {
    type Err = ParseDistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ParseDistributionError::new(s));
                }
                part.parse::<u32>()
                    .map_err(|_| ParseDistributionError::new(s))
            })
            .collect::<Result<Vec<_>, _>>()?;

        RhelVersion::new(components).ok_or_else(|| ParseDistributionError::new(s))
    }
}
