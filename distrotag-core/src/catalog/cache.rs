//! Release feed cache
//!
//! The feed is stored verbatim in a single file. Its modification time is
//! the only freshness signal: once the file is older than the configured
//! window, the next query downloads it again. A failed download keeps the
//! previous file, so a stale cache keeps working while the feed is down.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{CatalogError, CatalogResult};

/// Default freshness window (about 5.5 hours)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(20_000);

/// Source of the current time
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Downloads a URL into a file
pub trait Transfer {
    /// Write the body of `url` to `dest`, replacing it
    fn fetch_to_file(&self, url: &str, dest: &Path) -> CatalogResult<()>;
}

/// Freshness of the cache file at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub path: PathBuf,

    /// Last modification time, `None` when the file does not exist
    pub modified: Option<SystemTime>,

    /// Age at the time of the check
    pub age: Option<Duration>,

    pub fresh: bool,
}

impl CacheStatus {
    /// Inspect `path` against `max_age`
    pub fn check(path: &Path, max_age: Duration, clock: &dyn Clock) -> Self {
        let modified = std::fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .ok();

        // A modification time in the future counts as age zero
        let age = modified.map(|mtime| clock.now().duration_since(mtime).unwrap_or_default());

        Self {
            path: path.to_path_buf(),
            modified,
            age,
            fresh: age.is_some_and(|age| age <= max_age),
        }
    }
}

/// Make sure the cache file at `path` is no older than `max_age`
///
/// Creates the parent directory when missing and downloads `url` when the
/// file is absent or stale. A download failure is logged and swallowed:
/// the caller finds out when decoding the (stale or missing) file.
pub fn ensure_fresh(
    path: &Path,
    url: &str,
    max_age: Duration,
    clock: &dyn Clock,
    transfer: &dyn Transfer,
) -> CatalogResult<PathBuf> {
    ensure_parent_dir(path)?;

    let status = CacheStatus::check(path, max_age, clock);
    if status.fresh {
        tracing::debug!(
            "Using cached release feed {} (age: {:?})",
            path.display(),
            status.age
        );
        return Ok(path.to_path_buf());
    }

    match status.age {
        Some(age) => tracing::info!(
            "Release feed cache expired (age: {:?}), refreshing from {}",
            age,
            url
        ),
        None => tracing::info!("No cached release feed, fetching {}", url),
    }

    if let Err(e) = transfer.fetch_to_file(url, path) {
        tracing::warn!("Failed to refresh release feed: {}", e);
    }

    Ok(path.to_path_buf())
}

/// Download `url` into `path` regardless of the file's age
pub fn force_refresh(path: &Path, url: &str, transfer: &dyn Transfer) -> CatalogResult<PathBuf> {
    ensure_parent_dir(path)?;
    tracing::info!("Refreshing release feed from {}", url);
    transfer.fetch_to_file(url, path)?;
    Ok(path.to_path_buf())
}

fn ensure_parent_dir(path: &Path) -> CatalogResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CatalogError::CacheUnavailable {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Fetches the feed with a blocking `reqwest` client
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpTransfer {
    timeout: Duration,
}

#[cfg(feature = "http")]
impl Default for HttpTransfer {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(feature = "http")]
impl HttpTransfer {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, String> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("distrotag/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .map_err(|e| format!("failed to create HTTP client: {e}"))?;

        let response = client.get(url).send().map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        response
            .bytes()
            .map(|body| body.to_vec())
            .map_err(|e| format!("failed to read response body: {e}"))
    }
}

#[cfg(feature = "http")]
impl Transfer for HttpTransfer {
    fn fetch_to_file(&self, url: &str, dest: &Path) -> CatalogResult<()> {
        use std::io::Write;

        let failed = |reason: String| CatalogError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let body = self.download(url).map_err(failed)?;

        // Stage next to the destination so the final rename stays on one filesystem
        let dir = dest.parent().unwrap_or_else(|| Path::new("."));
        let mut staged = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| failed(format!("failed to stage download: {e}")))?;
        staged
            .write_all(&body)
            .map_err(|e| failed(format!("failed to write download: {e}")))?;
        staged
            .persist(dest)
            .map_err(|e| failed(format!("failed to replace {}: {}", dest.display(), e.error)))?;

        tracing::debug!("Saved {} bytes to {}", body.len(), dest.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct FixedClock(SystemTime);

    impl Clock for FixedClock {
        fn now(&self) -> SystemTime {
            self.0
        }
    }

    /// Writes a fixed body and counts calls
    struct CountingTransfer {
        body: &'static str,
        calls: Cell<usize>,
    }

    impl CountingTransfer {
        fn new(body: &'static str) -> Self {
            Self {
                body,
                calls: Cell::new(0),
            }
        }
    }

    impl Transfer for CountingTransfer {
        fn fetch_to_file(&self, _url: &str, dest: &Path) -> CatalogResult<()> {
            self.calls.set(self.calls.get() + 1);
            std::fs::write(dest, self.body).unwrap();
            Ok(())
        }
    }

    struct FailingTransfer {
        calls: Cell<usize>,
    }

    impl Transfer for FailingTransfer {
        fn fetch_to_file(&self, url: &str, _dest: &Path) -> CatalogResult<()> {
            self.calls.set(self.calls.get() + 1);
            Err(CatalogError::FetchFailed {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    const URL: &str = "https://feed.example.com/product-versions/";

    fn mtime(path: &Path) -> SystemTime {
        std::fs::metadata(path).unwrap().modified().unwrap()
    }

    #[test]
    fn test_absent_file_is_fetched_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/cache/feed.json");
        let transfer = CountingTransfer::new("[]");

        let result = ensure_fresh(&path, URL, DEFAULT_CACHE_TTL, &SystemClock, &transfer).unwrap();

        assert_eq!(result, path);
        assert_eq!(transfer.calls.get(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_fresh_file_is_not_fetched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feed.json");
        std::fs::write(&path, "old").unwrap();
        let clock = FixedClock(mtime(&path) + Duration::from_secs(19_000));
        let transfer = CountingTransfer::new("new");

        ensure_fresh(&path, URL, DEFAULT_CACHE_TTL, &clock, &transfer).unwrap();

        assert_eq!(transfer.calls.get(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn test_stale_file_is_fetched_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feed.json");
        std::fs::write(&path, "old").unwrap();
        let clock = FixedClock(mtime(&path) + Duration::from_secs(20_001));
        let transfer = CountingTransfer::new("new");

        ensure_fresh(&path, URL, DEFAULT_CACHE_TTL, &clock, &transfer).unwrap();

        assert_eq!(transfer.calls.get(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_future_mtime_counts_as_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feed.json");
        std::fs::write(&path, "old").unwrap();
        let clock = FixedClock(mtime(&path) - Duration::from_secs(3600));
        let transfer = CountingTransfer::new("new");

        ensure_fresh(&path, URL, DEFAULT_CACHE_TTL, &clock, &transfer).unwrap();

        assert_eq!(transfer.calls.get(), 0);
    }

    #[test]
    fn test_failed_refresh_keeps_stale_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feed.json");
        std::fs::write(&path, "old").unwrap();
        let clock = FixedClock(mtime(&path) + Duration::from_secs(30_000));
        let transfer = FailingTransfer {
            calls: Cell::new(0),
        };

        let result = ensure_fresh(&path, URL, DEFAULT_CACHE_TTL, &clock, &transfer);

        assert!(result.is_ok());
        assert_eq!(transfer.calls.get(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn test_failed_fetch_without_cache_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feed.json");
        let transfer = FailingTransfer {
            calls: Cell::new(0),
        };

        ensure_fresh(&path, URL, DEFAULT_CACHE_TTL, &SystemClock, &transfer).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_force_refresh_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feed.json");
        let transfer = FailingTransfer {
            calls: Cell::new(0),
        };

        let err = force_refresh(&path, URL, &transfer).unwrap_err();
        assert!(matches!(err, CatalogError::FetchFailed { .. }));
    }

    #[test]
    fn test_force_refresh_ignores_age() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feed.json");
        std::fs::write(&path, "old").unwrap();
        let transfer = CountingTransfer::new("new");

        force_refresh(&path, URL, &transfer).unwrap();

        assert_eq!(transfer.calls.get(), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_unusable_cache_dir() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("feed.json");

        let err = ensure_fresh(
            &path,
            URL,
            DEFAULT_CACHE_TTL,
            &SystemClock,
            &CountingTransfer::new("[]"),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::CacheUnavailable { .. }));
    }

    #[test]
    fn test_cache_status() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feed.json");

        let missing = CacheStatus::check(&path, DEFAULT_CACHE_TTL, &SystemClock);
        assert_eq!(missing.modified, None);
        assert!(!missing.fresh);

        std::fs::write(&path, "[]").unwrap();
        let clock = FixedClock(mtime(&path) + Duration::from_secs(60));
        let present = CacheStatus::check(&path, DEFAULT_CACHE_TTL, &clock);
        assert_eq!(present.age, Some(Duration::from_secs(60)));
        assert!(present.fresh);
    }
}
