//! Release records and the feed decoder
//!
//! The feed is the PDC "product versions" listing. Each record names a
//! product (`fedora`, `epel`), its version and a unique id such as
//! `fedora-33` or `fedora-rawhide`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CatalogError, CatalogResult};

/// One active product version from the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Product family (`fedora`, `epel`)
    #[serde(rename = "short")]
    pub product: String,

    /// Numeric for released versions, `rawhide` for the development entry
    pub version: String,

    /// Unique id, e.g. `fedora-33`
    pub product_version_id: String,
}

impl Release {
    pub fn new(product: &str, version: &str, product_version_id: &str) -> Self {
        Self {
            product: product.to_string(),
            version: version.to_string(),
            product_version_id: product_version_id.to_string(),
        }
    }
}

/// Turns the cached feed file into release records
pub trait ReleaseDecoder {
    /// Decode `path` into releases in feed order
    fn decode(&self, path: &Path) -> CatalogResult<Vec<Release>>;
}

/// The feed as served: a paginated envelope, or a bare list
#[derive(Deserialize)]
#[serde(untagged)]
enum FeedPayload {
    Paginated { results: Vec<Release> },
    Bare(Vec<Release>),
}

/// Decodes the JSON feed with `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFeedDecoder;

impl ReleaseDecoder for JsonFeedDecoder {
    fn decode(&self, path: &Path) -> CatalogResult<Vec<Release>> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::DecodeFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let payload: FeedPayload =
            serde_json::from_str(&content).map_err(|e| CatalogError::DecodeFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let releases = match payload {
            FeedPayload::Paginated { results } => results,
            FeedPayload::Bare(releases) => releases,
        };

        tracing::debug!("Decoded {} releases from {}", releases.len(), path.display());
        Ok(releases)
    }
}
