//! Implementations of the CLI commands

use tracing::info;

use crate::{
    artifacts::Artifacts,
    cli::{Cli, DeployArgs, ShowArgs},
    client::{ChainClient, RpcClient},
    deployer::DeployContext,
    deployments::{DeploymentStore, FileDeploymentStore},
    errors::DeployError,
    network::{NamedAccounts, Network},
    scripts::run_scripts,
};

/// Run the deploy scripts selected by `args`
pub async fn deploy(args: DeployArgs, cli: &Cli) -> Result<(), DeployError> {
    let mut ctx = setup_context(cli, true).await?;
    run_scripts(&mut ctx, &args.tags).await
}

/// Print a stored deployment and the contract's current state
pub async fn show(args: ShowArgs, cli: &Cli) -> Result<(), DeployError> {
    let ctx = setup_context(cli, false).await?;
    let record = ctx.store.get_existing(&args.name)?;
    ctx.print_contract_details(&args.name, &record).await
}

/// Connect to the node and open the selected network's deployment records,
/// checking that they belong to the connected chain.
///
/// The chain id is written to a fresh deployments directory only if
/// `record_chain_id` is set.
async fn setup_context(
    cli: &Cli,
    record_chain_id: bool,
) -> Result<DeployContext<RpcClient, FileDeploymentStore>, DeployError> {
    let network = Network::from_name(&cli.network);
    let client = RpcClient::new(&cli.rpc_url, &cli.priv_key)?;

    let chain_id = client.chain_id().await?;
    let store = FileDeploymentStore::new(&cli.deployments_dir, &network.name);
    if record_chain_id {
        store.ensure_chain_id(chain_id)?;
    } else {
        store.check_chain_id(chain_id)?;
    }
    info!(
        "using deployments of {} in {}",
        network.name,
        store.dir().display()
    );

    let named_accounts = match &cli.named_accounts {
        Some(path) => NamedAccounts::from_file(path)?,
        None => NamedAccounts::default(),
    };

    Ok(DeployContext::new(
        network,
        client,
        store,
        Artifacts::from_dir(&cli.artifacts_dir),
        named_accounts,
    ))
}
