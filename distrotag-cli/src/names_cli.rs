//! `show`: derived names of one distribution

use anyhow::{Context, Result};
use tabled::{settings::Style, Table, Tabled};

use distrotag_core::{Distribution, ReleaseCatalog, Resolver};

#[derive(Tabled)]
struct NameRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn row(name: &'static str, value: impl Into<String>) -> NameRow {
    NameRow {
        name,
        value: value.into(),
    }
}

pub fn execute_show(
    catalog: &ReleaseCatalog,
    target: &Distribution,
    arch: &str,
    latest: Option<Distribution>,
    json_output: bool,
) -> Result<()> {
    let resolver = match latest {
        Some(latest) => Resolver::new(latest),
        None => catalog
            .resolver()
            .context("Failed to resolve the latest stable release (pass --latest to skip)")?,
    };
    let names = resolver.describe(target, arch);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    let rows = vec![
        row("Distribution", names.distribution.to_string()),
        row("Relative to", resolver.latest().to_string()),
        row("Branch", names.branch),
        row("Repo", names.repo),
        row("Updates repo", names.updates_repo.unwrap_or("-")),
        row("Overrides", if names.allows_overrides { "yes" } else { "no" }),
        row("Version", names.version),
        row("Mock config", names.build_root_config),
        row("Dist tag", names.release_tag_suffix),
        row("Build tool", names.build_tool),
        row("Packaging tool", names.packaging_tool),
        row("Container image", names.container_image),
    ];

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}
