//! Release catalog - which distributions exist right now
//!
//! # Overview
//!
//! The catalog answers "which Fedora and EPEL releases are active, which is
//! the newest stable one and which is in development" from the PDC product
//! versions feed.
//!
//! # Architecture
//!
//! ```text
//! PDC feed (product-versions)
//!     │  Transfer::fetch_to_file   (only when the cache is stale)
//!     ▼
//! ~/.cache/distrotag/product-versions.json
//!     │  ReleaseDecoder::decode
//!     ▼
//! Vec<Release>  (reversed: newest first)
//!     │  derive::*
//!     ▼
//! Distribution values  →  Resolver
//! ```

mod cache;
pub mod derive;
mod release;
mod store;

#[cfg(feature = "http")]
pub use cache::HttpTransfer;
pub use cache::{
    ensure_fresh, force_refresh, CacheStatus, Clock, SystemClock, Transfer, DEFAULT_CACHE_TTL,
};
pub use derive::{DEVELOPMENT_VERSION_ID, EXTENDED_PRODUCT, STABLE_PRODUCT};
pub use release::{JsonFeedDecoder, Release, ReleaseDecoder};
pub use store::ReleaseCatalog;
