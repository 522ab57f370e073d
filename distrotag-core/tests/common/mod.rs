//! Test helpers shared by the catalog integration tests

#![allow(dead_code)]

use distrotag_core::catalog::{Clock, Release, Transfer};
use distrotag_core::{CatalogConfig, CatalogError, CatalogResult, ReleaseCatalog};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::SystemTime;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Initialize logging for tests (only once per test run)
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Render releases as the PDC feed serves them (oldest first)
pub fn feed_json(releases: &[Release]) -> String {
    let results: Vec<serde_json::Value> = releases
        .iter()
        .map(|r| {
            serde_json::json!({
                "product_version_id": r.product_version_id,
                "short": r.product,
                "version": r.version,
                "active": true,
            })
        })
        .collect();

    serde_json::json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
    .to_string()
}

/// Transfer that serves whatever body is currently set
#[derive(Clone, Default)]
pub struct FakeFeed {
    body: Arc<Mutex<Option<String>>>,
    calls: Arc<AtomicUsize>,
    clock: Option<ManualClock>,
}

impl FakeFeed {
    pub fn serving(releases: &[Release]) -> Self {
        let feed = Self::default();
        feed.set(releases);
        feed
    }

    pub fn set(&self, releases: &[Release]) {
        *self.body.lock().unwrap() = Some(feed_json(releases));
    }

    /// Make every following fetch fail
    pub fn go_offline(&self) {
        *self.body.lock().unwrap() = None;
    }

    /// A handle that stamps written files with `clock` instead of the wall clock
    pub fn stamped_by(&self, clock: &ManualClock) -> Self {
        Self {
            clock: Some(clock.clone()),
            ..self.clone()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transfer for FakeFeed {
    fn fetch_to_file(&self, url: &str, dest: &Path) -> CatalogResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.body.lock().unwrap().as_ref() {
            Some(body) => {
                std::fs::write(dest, body).unwrap();
                if let Some(clock) = &self.clock {
                    let file = std::fs::OpenOptions::new().write(true).open(dest).unwrap();
                    file.set_modified(clock.now()).unwrap();
                }
                Ok(())
            }
            None => Err(CatalogError::FetchFailed {
                url: url.to_string(),
                reason: "network unreachable".to_string(),
            }),
        }
    }
}

/// Clock that only moves when told to
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(SystemTime::now())),
        }
    }

    pub fn advance_secs(&self, secs: u64) {
        *self.now.lock().unwrap() += std::time::Duration::from_secs(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}

/// Catalog caching into `temp_dir`, served by `feed`
pub fn test_catalog(temp_dir: &TempDir, feed: &FakeFeed, clock: &ManualClock) -> ReleaseCatalog {
    let config = CatalogConfig {
        cache_dir: Some(temp_dir.path().join("cache")),
        ..CatalogConfig::default()
    };
    ReleaseCatalog::with_transfer(config, Box::new(feed.stamped_by(clock)))
        .clock(Box::new(clock.clone()))
}

/// A feed snapshot with Fedora 31-33, rawhide and EPEL 7-9 (oldest first)
pub fn fedora_33_era() -> Vec<Release> {
    vec![
        Release::new("epel", "7", "epel-7"),
        Release::new("fedora", "31", "fedora-31"),
        Release::new("epel", "8", "epel-8"),
        Release::new("fedora", "32", "fedora-32"),
        Release::new("epel", "9", "epel-9"),
        Release::new("fedora", "33", "fedora-33"),
        Release::new("fedora", "rawhide", "fedora-rawhide"),
    ]
}
