//! Release catalog backed by the cached feed
//!
//! Every query resolves the cache file (refreshing it when stale), decodes
//! it and derives its answer from that snapshot. Nothing is kept in memory
//! between queries.

use std::path::PathBuf;

use super::cache::{self, CacheStatus, Clock, SystemClock, Transfer};
use super::derive::{self, EXTENDED_PRODUCT, STABLE_PRODUCT};
use super::release::{JsonFeedDecoder, Release, ReleaseDecoder};
use crate::config::CatalogConfig;
use crate::distribution::{Distribution, Resolver};
use crate::error::CatalogResult;

/// Active releases from the product versions feed
pub struct ReleaseCatalog {
    config: CatalogConfig,
    transfer: Box<dyn Transfer>,
    decoder: Box<dyn ReleaseDecoder>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for ReleaseCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseCatalog")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReleaseCatalog {
    /// Catalog fetching over HTTP with the wall clock
    #[cfg(feature = "http")]
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_transfer(config, Box::new(cache::HttpTransfer::default()))
    }

    /// Catalog with a custom transfer, the JSON decoder and the wall clock
    pub fn with_transfer(config: CatalogConfig, transfer: Box<dyn Transfer>) -> Self {
        Self {
            config,
            transfer,
            decoder: Box::new(JsonFeedDecoder),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the feed decoder
    pub fn decoder(mut self, decoder: Box<dyn ReleaseDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Replace the clock used for freshness checks
    pub fn clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Path of the cache file, refreshed first when absent or stale
    pub fn fetch_catalog_file(&self) -> CatalogResult<PathBuf> {
        let path = self.config.cache_file()?;
        cache::ensure_fresh(
            &path,
            &self.config.feed_url,
            self.config.cache_ttl(),
            self.clock.as_ref(),
            self.transfer.as_ref(),
        )
    }

    /// Download the feed now, whatever the cache age
    pub fn refresh(&self) -> CatalogResult<PathBuf> {
        let path = self.config.cache_file()?;
        cache::force_refresh(&path, &self.config.feed_url, self.transfer.as_ref())
    }

    /// Freshness of the cache file, without refreshing it
    pub fn cache_status(&self) -> CatalogResult<CacheStatus> {
        let path = self.config.cache_file()?;
        Ok(CacheStatus::check(
            &path,
            self.config.cache_ttl(),
            self.clock.as_ref(),
        ))
    }

    /// All releases, newest first
    ///
    /// The feed lists oldest first; this is its exact reverse.
    pub fn get_all_releases(&self) -> CatalogResult<Vec<Release>> {
        let path = self.fetch_catalog_file()?;
        let mut releases = self.decoder.decode(&path)?;
        releases.reverse();
        Ok(releases)
    }

    /// Releases of one product, newest first
    pub fn get_releases_for_product(&self, product: &str) -> CatalogResult<Vec<Release>> {
        let releases = self.get_all_releases()?;
        Ok(derive::releases_for_product(&releases, product)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Ids of all Fedora releases, the development entry included
    pub fn stable_release_ids(&self) -> CatalogResult<Vec<String>> {
        self.release_ids(STABLE_PRODUCT)
    }

    /// Ids of all EPEL releases
    pub fn extended_release_ids(&self) -> CatalogResult<Vec<String>> {
        self.release_ids(EXTENDED_PRODUCT)
    }

    fn release_ids(&self, product: &str) -> CatalogResult<Vec<String>> {
        Ok(self
            .get_releases_for_product(product)?
            .into_iter()
            .map(|release| release.product_version_id)
            .collect())
    }

    /// All Fedora releases as distributions, newest first
    pub fn stable_distributions(&self) -> CatalogResult<Vec<Distribution>> {
        derive::stable_distributions(&self.get_all_releases()?)
    }

    /// All EPEL releases as distributions, newest first
    pub fn extended_distributions(&self) -> CatalogResult<Vec<Distribution>> {
        derive::extended_distributions(&self.get_all_releases()?)
    }

    /// The in-development Fedora release (rawhide)
    pub fn development_distribution(&self) -> CatalogResult<Distribution> {
        derive::development_distribution(&self.get_all_releases()?)
    }

    /// The newest released Fedora
    pub fn latest_stable_distribution(&self) -> CatalogResult<Distribution> {
        derive::latest_stable_distribution(&self.get_all_releases()?)
    }

    /// The newest EPEL release
    pub fn latest_extended_distribution(&self) -> CatalogResult<Distribution> {
        derive::latest_extended_distribution(&self.get_all_releases()?)
    }

    /// Name resolver anchored on the newest released Fedora
    pub fn resolver(&self) -> CatalogResult<Resolver> {
        Ok(Resolver::new(self.latest_stable_distribution()?))
    }
}
