//! The deploy scripts, and their selection by tag
//!
//! Each script declares the tags it answers to and the tags it depends on.
//! Selecting a tag runs every script carrying it, after the scripts providing
//! its dependencies.

use std::fmt::{self, Display};

use tracing::{info, warn};

use crate::{
    client::ChainClient, deployer::DeployContext, deployments::DeploymentStore,
    errors::DeployError,
};

pub mod hive_registry_proxy;

/// The known deploy scripts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeployScript {
    /// Deploys the HiveRegistry ERC1967 proxy
    HiveRegistryProxy,
}

impl DeployScript {
    /// Every known script, in registration order
    pub const ALL: &'static [DeployScript] = &[DeployScript::HiveRegistryProxy];

    /// The name under which the script reports itself
    pub fn name(&self) -> &'static str {
        match self {
            DeployScript::HiveRegistryProxy => hive_registry_proxy::SCRIPT_NAME,
        }
    }

    /// The tags this script answers to
    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            DeployScript::HiveRegistryProxy => &["HiveRegistry_Proxy", "v3_0_3", "deploy"],
        }
    }

    /// The tags that must be deployed before this script runs
    pub fn dependencies(&self) -> &'static [&'static str] {
        match self {
            DeployScript::HiveRegistryProxy => &["HiveRegistryV1"],
        }
    }

    /// Run the script against the given context
    pub async fn run<C: ChainClient, S: DeploymentStore>(
        self,
        ctx: &mut DeployContext<C, S>,
    ) -> Result<(), DeployError> {
        match self {
            DeployScript::HiveRegistryProxy => {
                hive_registry_proxy::deploy_hive_registry_proxy(ctx).await?;
            }
        }

        Ok(())
    }

    /// Whether the script carries the given tag
    fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(&tag)
    }
}

impl Display for DeployScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Select the scripts to run for the given tags, dependencies first.
///
/// No tags selects every script. A dependency that no known script provides
/// is assumed to have been deployed by an earlier run.
pub fn resolve_scripts<T: AsRef<str>>(tags: &[T]) -> Vec<DeployScript> {
    let mut ordered = Vec::new();
    for script in DeployScript::ALL {
        let selected = tags.is_empty() || tags.iter().any(|t| script.has_tag(t.as_ref()));
        if selected {
            visit(*script, &mut ordered, &mut Vec::new());
        }
    }

    ordered
}

/// Append `script` to `ordered` after the scripts providing its dependencies.
///
/// `in_progress` holds the scripts on the current dependency path, so that a
/// dependency cycle is broken instead of recursing forever.
fn visit(
    script: DeployScript,
    ordered: &mut Vec<DeployScript>,
    in_progress: &mut Vec<DeployScript>,
) {
    if ordered.contains(&script) || in_progress.contains(&script) {
        return;
    }

    in_progress.push(script);
    for dependency in script.dependencies() {
        let providers: Vec<DeployScript> = DeployScript::ALL
            .iter()
            .copied()
            .filter(|s| s.has_tag(dependency))
            .collect();

        if providers.is_empty() {
            warn!(
                "no script provides {}, required by {}; expecting an existing deployment",
                dependency, script
            );
        }
        for provider in providers {
            visit(provider, ordered, in_progress);
        }
    }
    in_progress.pop();

    ordered.push(script);
}

/// Run the scripts selected by the given tags, stopping at the first failure
pub async fn run_scripts<C: ChainClient, S: DeploymentStore, T: AsRef<str>>(
    ctx: &mut DeployContext<C, S>,
    tags: &[T],
) -> Result<(), DeployError> {
    let scripts = resolve_scripts(tags);
    if scripts.is_empty() {
        warn!("no deploy script matches the requested tags");
    }

    for script in scripts {
        info!("running {}", script);
        script.run(ctx).await?;
    }

    Ok(())
}
