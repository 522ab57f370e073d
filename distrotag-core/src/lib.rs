//! distrotag - release catalog and distribution naming for packagers
//!
//! [`catalog`] tracks which Fedora and EPEL releases are active.
//! [`distribution`] names branches, repos, buildroots and images for any
//! Fedora, EPEL or RHEL release relative to the latest stable Fedora.

pub mod catalog;
pub mod config;
pub mod distribution;
pub mod error;

pub use catalog::{Release, ReleaseCatalog};
pub use config::CatalogConfig;
pub use distribution::{Distribution, Resolver, RhelVersion};
pub use error::{CatalogError, CatalogResult, ParseDistributionError};
