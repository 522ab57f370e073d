//! Distributions derived from a release list
//!
//! Everything here is a pure function of one snapshot of the feed. The
//! development release carries no number in the feed; it is always one
//! ahead of the newest numbered Fedora release in the same snapshot.

use super::Release;
use crate::distribution::Distribution;
use crate::error::{CatalogError, CatalogResult};

/// Product name of Fedora releases in the feed
pub const STABLE_PRODUCT: &str = "fedora";

/// Product name of EPEL releases in the feed
pub const EXTENDED_PRODUCT: &str = "epel";

/// Id the feed uses for the in-development Fedora release
pub const DEVELOPMENT_VERSION_ID: &str = "fedora-rawhide";

/// Releases of one product, order preserved
pub fn releases_for_product<'a>(releases: &'a [Release], product: &str) -> Vec<&'a Release> {
    releases.iter().filter(|r| r.product == product).collect()
}

fn is_development(release: &Release) -> bool {
    release.product_version_id == DEVELOPMENT_VERSION_ID
}

fn malformed(release: &Release) -> CatalogError {
    CatalogError::MalformedVersion {
        id: release.product_version_id.clone(),
        version: release.version.clone(),
    }
}

/// Plain ASCII digits only; `u32::from_str` alone would take `+33`
fn numeric_version(release: &Release) -> CatalogResult<u32> {
    let version = &release.version;
    if version.is_empty() || !version.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(release));
    }
    version.parse().map_err(|_| malformed(release))
}

/// Highest Fedora number among the numbered releases
fn max_stable_number(releases: &[Release]) -> CatalogResult<u32> {
    let mut max: Option<u32> = None;
    for release in releases_for_product(releases, STABLE_PRODUCT) {
        if is_development(release) {
            continue;
        }
        let n = numeric_version(release)?;
        max = Some(max.map_or(n, |current| current.max(n)));
    }
    max.ok_or(CatalogError::EmptyResultSet {
        query: "latest stable distribution",
    })
}

/// Map a Fedora release to its distribution
///
/// The development entry becomes one past the newest numbered release in
/// `releases`. A newest release of `u32::MAX` leaves no number for it and
/// is reported as a malformed development version.
pub fn stable_distribution(
    release: &Release,
    releases: &[Release],
) -> CatalogResult<Distribution> {
    if is_development(release) {
        let next = max_stable_number(releases)?
            .checked_add(1)
            .ok_or_else(|| malformed(release))?;
        return Ok(Distribution::Fedora(next));
    }
    numeric_version(release).map(Distribution::Fedora)
}

/// All Fedora releases as distributions, order preserved
pub fn stable_distributions(releases: &[Release]) -> CatalogResult<Vec<Distribution>> {
    releases_for_product(releases, STABLE_PRODUCT)
        .into_iter()
        .map(|release| stable_distribution(release, releases))
        .collect()
}

/// All EPEL releases as distributions, order preserved
pub fn extended_distributions(releases: &[Release]) -> CatalogResult<Vec<Distribution>> {
    releases_for_product(releases, EXTENDED_PRODUCT)
        .into_iter()
        .map(|release| numeric_version(release).map(Distribution::Epel))
        .collect()
}

/// First Fedora distribution of the list
///
/// With the feed's newest-first order this is the development release.
pub fn development_distribution(releases: &[Release]) -> CatalogResult<Distribution> {
    stable_distributions(releases)?
        .into_iter()
        .next()
        .ok_or(CatalogError::EmptyResultSet {
            query: "development distribution",
        })
}

/// Newest numbered Fedora release, the development entry excluded
pub fn latest_stable_distribution(releases: &[Release]) -> CatalogResult<Distribution> {
    max_stable_number(releases).map(Distribution::Fedora)
}

/// Newest EPEL release
pub fn latest_extended_distribution(releases: &[Release]) -> CatalogResult<Distribution> {
    extended_distributions(releases)?
        .into_iter()
        .max()
        .ok_or(CatalogError::EmptyResultSet {
            query: "latest extended distribution",
        })
}
