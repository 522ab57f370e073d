//! Derived names for a distribution
//!
//! Branch, repo and version names depend on where a Fedora release sits
//! relative to the latest stable release: anything newer is rawhide.
//! The remaining names depend on the distribution alone.

use serde::Serialize;

use super::Distribution;

/// dist-git branch for unreleased Fedora
pub const MAINLINE_BRANCH: &str = "master";

/// Repo and version name of the in-development Fedora release
pub const DEVELOPMENT_REPO: &str = "rawhide";

/// Repo name of released Fedora
pub const STABLE_REPO: &str = "fedora";

/// Updates repo name of released Fedora
pub const UPDATES_REPO: &str = "updates";

/// Last EPEL release that accepts buildroot overrides
const LAST_OVERRIDABLE_EPEL: u32 = 8;

/// Whether `target` is a Fedora release newer than the latest stable one
fn is_unreleased(latest: &Distribution, n: u32) -> bool {
    latest.fedora_number().is_some_and(|latest| n > latest)
}

/// dist-git branch name
pub fn branch_name(latest: &Distribution, target: &Distribution) -> String {
    match target {
        Distribution::Fedora(n) if is_unreleased(latest, *n) => MAINLINE_BRANCH.to_string(),
        Distribution::Fedora(_) | Distribution::Epel(_) | Distribution::Rhel(_) => {
            target.to_string()
        }
    }
}

/// Base package repository name
pub fn repo_name(latest: &Distribution, target: &Distribution) -> &'static str {
    match target {
        Distribution::Fedora(n) if is_unreleased(latest, *n) => DEVELOPMENT_REPO,
        Distribution::Fedora(_) => STABLE_REPO,
        Distribution::Epel(_) => "epel",
        Distribution::Rhel(_) => "rhel",
    }
}

/// Updates repository name, only released Fedora has one
pub fn updates_repo_name(latest: &Distribution, target: &Distribution) -> Option<&'static str> {
    match target {
        Distribution::Fedora(n) if is_unreleased(latest, *n) => None,
        Distribution::Fedora(_) => Some(UPDATES_REPO),
        Distribution::Epel(_) | Distribution::Rhel(_) => None,
    }
}

/// Whether buildroot overrides can be submitted for `target`
pub fn allows_overrides(latest: &Distribution, target: &Distribution) -> bool {
    match target {
        Distribution::Fedora(n) => !is_unreleased(latest, *n),
        Distribution::Epel(n) => *n <= LAST_OVERRIDABLE_EPEL,
        Distribution::Rhel(_) => false,
    }
}

/// Version text used in repo and mock config names
pub fn version_string(latest: &Distribution, target: &Distribution) -> String {
    match target {
        Distribution::Fedora(n) if is_unreleased(latest, *n) => DEVELOPMENT_REPO.to_string(),
        Distribution::Fedora(n) | Distribution::Epel(n) => n.to_string(),
        Distribution::Rhel(version) => version.to_string(),
    }
}

/// Mock config name, e.g. `fedora-rawhide-x86_64` or `epel-8-aarch64`
pub fn build_root_config_name(latest: &Distribution, target: &Distribution, arch: &str) -> String {
    let prefix = match target {
        Distribution::Fedora(_) => STABLE_REPO,
        Distribution::Epel(_) | Distribution::Rhel(_) => repo_name(latest, target),
    };
    format!("{prefix}-{}-{arch}", version_string(latest, target))
}

/// `%{dist}` suffix of package releases, e.g. `.fc40`
pub fn package_release_tag_suffix(target: &Distribution) -> String {
    match target {
        Distribution::Fedora(n) => format!(".fc{n}"),
        Distribution::Epel(n) => format!(".el{n}"),
        Distribution::Rhel(version) => format!(".el{}", version.major()),
    }
}

/// Build system that owns the target
pub fn build_tool_name(target: &Distribution) -> &'static str {
    match target {
        Distribution::Rhel(_) => "brew",
        Distribution::Fedora(_) | Distribution::Epel(_) => "koji",
    }
}

/// dist-git client for the target
pub fn packaging_tool_name(target: &Distribution) -> &'static str {
    match target {
        Distribution::Rhel(_) => "rhpkg",
        Distribution::Fedora(_) | Distribution::Epel(_) => "fedpkg",
    }
}

/// Container image for a build environment
pub fn container_image_name(target: &Distribution) -> String {
    match target {
        Distribution::Fedora(n) => format!("fedora:{n}"),
        Distribution::Epel(n) => format!("centos:{n}"),
        Distribution::Rhel(version) => format!("ubi{}/ubi", version.major()),
    }
}

/// Every derived name of one distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionNames {
    pub distribution: Distribution,
    pub branch: String,
    pub repo: &'static str,
    pub updates_repo: Option<&'static str>,
    pub allows_overrides: bool,
    pub version: String,
    pub build_root_config: String,
    pub release_tag_suffix: String,
    pub build_tool: &'static str,
    pub packaging_tool: &'static str,
    pub container_image: String,
}

/// Name resolution anchored on the latest stable release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    latest: Distribution,
}

impl Resolver {
    pub fn new(latest: Distribution) -> Self {
        Self { latest }
    }

    /// The latest stable release all relative names are computed against
    pub fn latest(&self) -> &Distribution {
        &self.latest
    }

    pub fn branch_name(&self, target: &Distribution) -> String {
        branch_name(&self.latest, target)
    }

    pub fn repo_name(&self, target: &Distribution) -> &'static str {
        repo_name(&self.latest, target)
    }

    pub fn updates_repo_name(&self, target: &Distribution) -> Option<&'static str> {
        updates_repo_name(&self.latest, target)
    }

    pub fn allows_overrides(&self, target: &Distribution) -> bool {
        allows_overrides(&self.latest, target)
    }

    pub fn version_string(&self, target: &Distribution) -> String {
        version_string(&self.latest, target)
    }

    pub fn build_root_config_name(&self, target: &Distribution, arch: &str) -> String {
        build_root_config_name(&self.latest, target, arch)
    }

    /// Collect every derived name of `target` for `arch`
    pub fn describe(&self, target: &Distribution, arch: &str) -> DistributionNames {
        DistributionNames {
            distribution: target.clone(),
            branch: self.branch_name(target),
            repo: self.repo_name(target),
            updates_repo: self.updates_repo_name(target),
            allows_overrides: self.allows_overrides(target),
            version: self.version_string(target),
            build_root_config: self.build_root_config_name(target, arch),
            release_tag_suffix: package_release_tag_suffix(target),
            build_tool: build_tool_name(target),
            packaging_tool: packaging_tool_name(target),
            container_image: container_image_name(target),
        }
    }
}
