//! Catalog commands: releases, latest, refresh, cache

use anyhow::{Context, Result};
use serde::Serialize;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use distrotag_core::catalog::DEVELOPMENT_VERSION_ID;
use distrotag_core::{Distribution, Release, ReleaseCatalog};

#[derive(Tabled)]
struct ReleaseRow {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Id")]
    id: String,
}

impl From<&Release> for ReleaseRow {
    fn from(release: &Release) -> Self {
        Self {
            product: release.product.clone(),
            version: release.version.clone(),
            id: release.product_version_id.clone(),
        }
    }
}

fn render<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn execute_releases(catalog: &ReleaseCatalog, json_output: bool) -> Result<()> {
    let releases = catalog
        .get_all_releases()
        .context("Failed to load the release catalog")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&releases)?);
        return Ok(());
    }

    if releases.is_empty() {
        println!("The release feed lists no active releases.");
        return Ok(());
    }

    let rows: Vec<ReleaseRow> = releases.iter().map(ReleaseRow::from).collect();
    println!("{}", render(&rows));
    Ok(())
}

#[derive(Serialize)]
struct LatestReleases {
    development: Distribution,
    stable: Distribution,
    extended: Option<Distribution>,
}

pub fn execute_latest(catalog: &ReleaseCatalog, json_output: bool) -> Result<()> {
    let latest = LatestReleases {
        development: catalog
            .development_distribution()
            .with_context(|| format!("Failed to resolve {DEVELOPMENT_VERSION_ID}"))?,
        stable: catalog
            .latest_stable_distribution()
            .context("Failed to resolve the latest stable release")?,
        extended: match catalog.latest_extended_distribution() {
            Ok(dist) => Some(dist),
            Err(e) => {
                tracing::warn!("No EPEL release found: {}", e);
                None
            }
        },
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&latest)?);
        return Ok(());
    }

    println!("Development:   {} (rawhide)", latest.development);
    println!("Latest stable: {}", latest.stable);
    match &latest.extended {
        Some(dist) => println!("Latest EPEL:   {dist}"),
        None => println!("Latest EPEL:   -"),
    }
    Ok(())
}

pub fn execute_refresh(catalog: &ReleaseCatalog) -> Result<()> {
    println!("Fetching {}...", catalog.config().feed_url);
    let path = catalog.refresh()?;
    let count = catalog.get_all_releases()?.len();
    println!("Saved {} releases to {}", count, path.display());
    Ok(())
}

pub fn execute_cache(catalog: &ReleaseCatalog) -> Result<()> {
    let status = catalog.cache_status()?;

    println!("Cache file: {}", status.path.display());
    match status.modified {
        Some(modified) => {
            let modified: chrono::DateTime<chrono::Local> = modified.into();
            println!("Refreshed:  {}", modified.to_rfc3339());
            if let Some(age) = status.age {
                println!("Age:        {}s", age.as_secs());
            }
        }
        None => println!("Refreshed:  never"),
    }
    println!("Window:     {}s", catalog.config().cache_ttl_secs);
    println!("Fresh:      {}", if status.fresh { "yes" } else { "no" });
    Ok(())
}
