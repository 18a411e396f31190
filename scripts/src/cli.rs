//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{deploy, show},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_DIR, DEFAULT_NETWORK, DEFAULT_RPC_URL},
    errors::DeployError,
};

/// Deploy the HiveRegistry contracts to an EVM chain
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name of the network to deploy to
    #[arg(short, long, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Private keys of the accounts to deploy from, comma-separated.
    /// If omitted, the node's own accounts are used.
    #[arg(short, long, env = "PKEY", value_delimiter = ',')]
    pub priv_key: Vec<String>,

    /// Directory holding the deployment records, one subdirectory per network
    #[arg(long, default_value = DEFAULT_DEPLOYMENTS_DIR)]
    pub deployments_dir: PathBuf,

    /// Directory holding the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// JSON file mapping named roles to addresses per network
    #[arg(long)]
    pub named_accounts: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available commands
#[derive(Subcommand, Clone)]
pub enum Command {
    /// Run deploy scripts
    Deploy(DeployArgs),
    /// Show a deployment
    Show(ShowArgs),
}

impl Command {
    /// Run the command with the global options of `cli`
    pub async fn run(self, cli: &Cli) -> Result<(), DeployError> {
        match self {
            Command::Deploy(args) => deploy(args, cli).await,
            Command::Show(args) => show(args, cli).await,
        }
    }
}

/// Run the deploy scripts selected by tag, dependencies first.
///
/// Scripts skip contracts that already have a deployment record on the
/// selected network, so rerunning a deployment is safe.
#[derive(Args, Clone)]
pub struct DeployArgs {
    /// Tags of the scripts to run, comma-separated. Runs every script if omitted.
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,
}

/// Print a deployment record of the selected network, along with the
/// contract's current introspective state
#[derive(Args, Clone)]
pub struct ShowArgs {
    /// The deployment name
    pub name: String,
}
