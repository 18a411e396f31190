//! Deploys the HiveRegistry ERC1967 proxy in front of the `HiveRegistryV1`
//! implementation, initialized through `postConstruct`

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes},
};
use alloy_contract::Interface;
use itertools::Itertools;
use tracing::info;

use crate::{
    client::ChainClient,
    constants::{
        ERC1967_PROXY_CONTRACT, HIVE_REGISTRY_PROXY, HIVE_REGISTRY_V1, INTELLIGENT_NFT_ROLE,
        PERSONALITY_POD_ROLE, PERSONALITY_STAKING_ROLE, POST_CONSTRUCT_METHOD,
    },
    deployer::{DeployContext, DeployOptions},
    deployments::{DeploymentRecord, DeploymentStore},
    errors::DeployError,
};

/// The name under which this script reports itself
pub const SCRIPT_NAME: &str = "deploy-HiveRegistry_Proxy";

/// The roles passed to `postConstruct`, in argument order
pub const INIT_ROLES: [&str; 3] = [
    PERSONALITY_POD_ROLE,
    INTELLIGENT_NFT_ROLE,
    PERSONALITY_STAKING_ROLE,
];

/// Deploy the HiveRegistry proxy, returning its deployment record.
///
/// Rerunning the script once the proxy exists sends no transaction and
/// returns the stored record.
pub async fn deploy_hive_registry_proxy<C: ChainClient, S: DeploymentStore>(
    ctx: &mut DeployContext<C, S>,
) -> Result<DeploymentRecord, DeployError> {
    let deployer = ctx.log_deployer_info(SCRIPT_NAME).await?;

    let roles = ctx.network.role_addresses(&INIT_ROLES, &ctx.named_accounts)?;

    let implementation = ctx.store.get_existing(HIVE_REGISTRY_V1)?;
    let init_data = post_construct_calldata(&implementation, &roles)?;

    ctx.deploy(
        HIVE_REGISTRY_PROXY,
        DeployOptions {
            from: deployer,
            contract: ERC1967_PROXY_CONTRACT.to_string(),
            args: vec![
                DynSolValue::Address(implementation.address),
                DynSolValue::Bytes(init_data.to_vec()),
            ],
            skip_if_already_deployed: true,
            log: true,
        },
    )
    .await?;

    let deployment = ctx.store.get_existing(HIVE_REGISTRY_PROXY)?;
    ctx.print_contract_details(HIVE_REGISTRY_PROXY, &deployment).await?;

    Ok(deployment)
}

/// Prepare calldata for the implementation's `postConstruct` method, using the
/// interface stored in its deployment record
pub fn post_construct_calldata(
    implementation: &DeploymentRecord,
    roles: &[Address],
) -> Result<Bytes, DeployError> {
    let interface = Interface::new(implementation.abi.clone());
    let args: Vec<DynSolValue> = roles.iter().copied().map(DynSolValue::Address).collect();

    let calldata = interface
        .encode_input(POST_CONSTRUCT_METHOD, &args)
        .map_err(|e| DeployError::CalldataConstruction(e.to_string()))?;
    info!(
        "{} initializer: {}({})",
        HIVE_REGISTRY_PROXY,
        POST_CONSTRUCT_METHOD,
        roles.iter().join(", ")
    );

    Ok(calldata.into())
}
