//! Snapshot compatibility checks and reader selection.

use crate::config::ScannerConfig;
use crate::error::{ImportError, Result};
use crate::models::{ImportSnapshot, VersionTag};
use crate::readers::ReaderStrategy;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

lazy_static! {
    static ref BUILD_VERSION_RE: Regex =
        Regex::new(r"^v?(\d+)\.(\d+)\.(\d+)(?:-([0-9A-Za-z.-]+))?").unwrap();
}

/// Build assumed for snapshots that do not declare one.
pub const DEFAULT_BUILD: &str = "0.0.0";

/// `major.minor.patch[-pre]` of a scanner build, ordered by semver
/// precedence. Build metadata after `+` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl BuildVersion {
    pub fn parse(value: &str) -> Option<Self> {
        let caps = BUILD_VERSION_RE.captures(value.trim())?;
        Some(Self {
            major: caps.get(1)?.as_str().parse().ok()?,
            minor: caps.get(2)?.as_str().parse().ok()?,
            patch: caps.get(3)?.as_str().parse().ok()?,
            pre: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }
}

/// Numeric identifiers sort numerically and below alphanumeric ones; a
/// shorter identifier list sorts first when it is a prefix of the other.
fn compare_pre_release(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

impl Ord for BuildVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                // A pre-release precedes its release.
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => compare_pre_release(a, b),
            })
    }
}

impl PartialOrd for BuildVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchemaVersion {
    V3,
    V4,
}

impl SchemaVersion {
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            3 => Some(Self::V3),
            4 => Some(Self::V4),
            _ => None,
        }
    }

    pub fn tag(&self) -> i64 {
        match self {
            Self::V3 => 3,
            Self::V4 => 4,
        }
    }
}

/// Non-fatal notice that the snapshot came from an outdated scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StaleVersionAdvisory {
    OutputVersion {
        found: i64,
        latest: i64,
        releases: String,
    },
    Build {
        found: String,
        latest: String,
        releases: String,
    },
}

impl fmt::Display for StaleVersionAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutputVersion { found, latest, releases } => write!(
                f,
                "Your scanner output version {} is out of date (latest {}) and may result in incorrect imports! Please update to the latest version: {}",
                found, latest, releases
            ),
            Self::Build { found, latest, releases } => write!(
                f,
                "Your scanner version {} is out of date (latest {}) and may result in incorrect imports! Please update to the latest version: {}",
                found, latest, releases
            ),
        }
    }
}

/// Outcome of routing a compatible snapshot.
#[derive(Debug, Clone)]
pub struct Route {
    pub strategy: ReaderStrategy,
    pub advisories: Vec<StaleVersionAdvisory>,
}

pub struct VersionRouter<'a> {
    config: &'a ScannerConfig,
}

impl<'a> VersionRouter<'a> {
    pub fn new(config: &'a ScannerConfig) -> Self {
        Self { config }
    }

    /// Check the snapshot signature and version and pick its reader.
    ///
    /// Signature and schema mismatches are fatal; outdated scanners only
    /// produce advisories.
    pub fn route(&self, snapshot: &ImportSnapshot) -> Result<Route> {
        if snapshot.source != self.config.source {
            return Err(ImportError::SignatureMismatch {
                found: snapshot.source.clone(),
                expected: self.config.source.clone(),
            });
        }

        let tag = match &snapshot.version {
            None => 0,
            Some(VersionTag::Integer(tag)) => *tag,
            Some(other) => {
                return Err(ImportError::UnsupportedVersion {
                    found: other.to_string(),
                })
            }
        };
        let schema = SchemaVersion::from_tag(tag).ok_or_else(|| ImportError::UnsupportedVersion {
            found: tag.to_string(),
        })?;

        let mut advisories = Vec::new();

        if tag != self.config.latest_output_version {
            advisories.push(StaleVersionAdvisory::OutputVersion {
                found: tag,
                latest: self.config.latest_output_version,
                releases: self.config.releases.clone(),
            });
        }

        let build = snapshot
            .build
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(DEFAULT_BUILD);
        let found = BuildVersion::parse(build).unwrap_or_default();
        match BuildVersion::parse(&self.config.latest_build_version) {
            Some(latest) if found < latest => {
                tracing::debug!("Current build: {}, latest: {}", found, latest);
                advisories.push(StaleVersionAdvisory::Build {
                    found: build.to_string(),
                    latest: self.config.latest_build_version.clone(),
                    releases: self.config.releases.clone(),
                });
            }
            Some(_) => {}
            None => tracing::warn!(
                "Configured latest build '{}' is not a semantic version, skipping build check",
                self.config.latest_build_version
            ),
        }

        Ok(Route {
            strategy: ReaderStrategy::for_version(schema),
            advisories,
        })
    }
}
