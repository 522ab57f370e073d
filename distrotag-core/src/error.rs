//! Error types for the release catalog and distribution parsing

use std::path::PathBuf;
use thiserror::Error;

/// Release catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The cache directory could not be created or resolved
    #[error("Release cache is unavailable at {path}")]
    CacheUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Downloading the release feed failed
    #[error("Failed to fetch release feed from {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// The cache file is missing, unreadable or not a valid feed
    #[error("Failed to decode release feed at {path}: {reason}")]
    DecodeFailed { path: PathBuf, reason: String },

    /// A maximum or head query ran over an empty release list
    #[error("No releases available for {query}")]
    EmptyResultSet { query: &'static str },

    /// A numbered release carries a version that is not a number
    #[error("Release {id} has a malformed version: '{version}'")]
    MalformedVersion { id: String, version: String },
}

/// Text that is none of the accepted distribution forms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown distribution: '{input}'. Expected f<N>, el<N>, epel<N> or rhel-<X.Y>")]
pub struct ParseDistributionError {
    pub input: String,
}

impl ParseDistributionError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

/// Result alias for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
