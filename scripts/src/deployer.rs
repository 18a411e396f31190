//! The context handed to deploy scripts, and the create-or-reuse deployment
//! request built on top of it

use std::str::FromStr;

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::JsonAbi,
    primitives::{utils::format_ether, Address, Bytes, U256},
};
use serde_json::Value;
use tracing::info;

use crate::{
    artifacts::Artifacts,
    client::ChainClient,
    constants::IMPLEMENTATION_STORAGE_SLOT,
    deployments::{DeploymentReceipt, DeploymentRecord, DeploymentStore},
    errors::DeployError,
    network::{NamedAccounts, Network},
    utils::{format_value, is_introspective},
};

/// The parameters of a deployment request
#[derive(Clone, Debug)]
pub struct DeployOptions {
    /// The account sending the deployment transaction
    pub from: Address,
    /// The name of the contract artifact to deploy
    pub contract: String,
    /// The constructor arguments
    pub args: Vec<DynSolValue>,
    /// Return the existing record, if any, without comparing it to the request
    pub skip_if_already_deployed: bool,
    /// Log the outcome of the request
    pub log: bool,
}

/// Everything a deploy script may touch: the selected network, the chain,
/// the deployment registry, compilation artifacts and named accounts
pub struct DeployContext<C, S> {
    /// The selected network
    pub network: Network,
    /// The client for the selected network's node
    pub client: C,
    /// The deployment records of the selected network
    pub store: S,
    /// The compilation artifacts
    pub artifacts: Artifacts,
    /// The named accounts configuration
    pub named_accounts: NamedAccounts,
}

impl<C: ChainClient, S: DeploymentStore> DeployContext<C, S> {
    /// Construct a new deploy context
    pub fn new(
        network: Network,
        client: C,
        store: S,
        artifacts: Artifacts,
        named_accounts: NamedAccounts,
    ) -> Self {
        DeployContext {
            network,
            client,
            store,
            artifacts,
            named_accounts,
        }
    }

    /// Log the chain, the deployer and its nonce and balance
    pub async fn log_deployer_info(&self, script: &str) -> Result<Address, DeployError> {
        let chain_id = self.client.chain_id().await?;
        let accounts = self.client.accounts().await?;
        let deployer = self.network.deployer(&accounts)?;
        let nonce = self.client.transaction_count(deployer).await?;
        let balance = self.client.balance(deployer).await?;

        info!("script: {}", script);
        info!("network {} {}", chain_id, self.network.name);
        info!(
            "accounts: {}, service account {}, nonce: {}, balance: {} ETH",
            accounts.len(),
            deployer,
            nonce,
            format_ether(balance)
        );

        Ok(deployer)
    }

    /// Deploy the named contract unless a suitable record already exists.
    ///
    /// With `skip_if_already_deployed`, any existing record under `name` is
    /// returned unchanged, without loading the artifact. Without it, an existing record is still reused if
    /// it was deployed from the same bytecode with the same arguments.
    /// Otherwise a creation transaction is sent and the new record persisted.
    pub async fn deploy(
        &mut self,
        name: &str,
        opts: DeployOptions,
    ) -> Result<DeploymentRecord, DeployError> {
        let existing = self.store.get(name)?;
        let skipped = existing
            .as_ref()
            .filter(|_| opts.skip_if_already_deployed);
        if let Some(existing) = skipped {
            if opts.log {
                info!("reusing \"{}\" at {}", name, existing.address);
            }
            return Ok(existing.clone());
        }

        let artifact = self.artifacts.get(&opts.contract)?.clone();
        let args: Vec<Value> = opts
            .args
            .iter()
            .map(|arg| Value::String(format_value(arg)))
            .collect();

        if let Some(existing) = existing {
            let unchanged = existing.bytecode.as_ref() == Some(&artifact.bytecode)
                && existing.args == args;

            if unchanged {
                if opts.log {
                    info!("reusing \"{}\" at {}", name, existing.address);
                }
                return Ok(existing);
            }
        }

        let init_code = creation_code(&artifact.bytecode, &artifact.abi, &opts.args)?;
        let receipt = self.client.deploy(opts.from, init_code).await?;

        if opts.log {
            info!(
                "deploying \"{}\" (tx: {:#x})...: deployed at {} with {} gas",
                name, receipt.transaction_hash, receipt.contract_address, receipt.gas_used
            );
        }

        let record = DeploymentRecord {
            address: receipt.contract_address,
            abi: artifact.abi,
            transaction_hash: Some(receipt.transaction_hash),
            receipt: Some(DeploymentReceipt {
                from: opts.from,
                transaction_hash: receipt.transaction_hash,
                block_number: receipt.block_number,
                gas_used: receipt.gas_used,
                contract_address: receipt.contract_address,
            }),
            args,
            bytecode: Some(artifact.bytecode),
        };
        self.store.save(name, &record)?;

        Ok(record)
    }

    /// Print the address of a deployed contract, the implementation it points
    /// to if it is an ERC1967 proxy, and the value of every function in its
    /// interface that takes no arguments and does not modify state
    pub async fn print_contract_details(
        &self,
        name: &str,
        record: &DeploymentRecord,
    ) -> Result<(), DeployError> {
        println!("{} deployed at {}", name, record.address);
        if let Some(receipt) = &record.receipt {
            println!(
                "\ttransaction {:#x}, {} gas used, sent by {}",
                receipt.transaction_hash, receipt.gas_used, receipt.from
            );
        }

        // Can `unwrap` here since the constant is a valid 32-byte hex string
        let slot = U256::from_str(IMPLEMENTATION_STORAGE_SLOT).unwrap();
        let implementation = self.client.storage_at(record.address, slot).await?;
        if !implementation.is_zero() {
            let bytes = implementation.to_be_bytes::<32>();
            println!("\timplementation: {}", Address::from_slice(&bytes[12..]));
        }

        for function in record.abi.functions().filter(|f| is_introspective(f)) {
            let calldata = function
                .abi_encode_input(&[])
                .map_err(|e| DeployError::CalldataConstruction(e.to_string()))?;
            let output = self.client.call(record.address, calldata.into()).await?;
            let values = function
                .abi_decode_output(&output)
                .map_err(|e| DeployError::Rpc(format!("{}: {}", function.name, e)))?;

            let rendered: Vec<String> = values.iter().map(format_value).collect();
            println!("\t{}: {}", function.name, rendered.join(", "));
        }

        Ok(())
    }
}

/// Append the ABI-encoded constructor arguments to the creation bytecode
pub fn creation_code(
    bytecode: &Bytes,
    abi: &JsonAbi,
    args: &[DynSolValue],
) -> Result<Bytes, DeployError> {
    let encoded_args = match &abi.constructor {
        Some(constructor) => constructor
            .abi_encode_input(args)
            .map_err(|e| DeployError::CalldataConstruction(e.to_string()))?,
        None if args.is_empty() => Vec::new(),
        None => {
            return Err(DeployError::CalldataConstruction(format!(
                "{} constructor arguments given but the contract has no constructor",
                args.len()
            )))
        }
    };

    Ok([&bytecode[..], &encoded_args[..]].concat().into())
}

#[cfg(test)]
mod tests {
    use alloy::{
        dyn_abi::DynSolValue,
        json_abi::JsonAbi,
        primitives::{address, Address, Bytes},
    };
    use eyre::Result;
    use serde_json::json;

    use crate::{
        artifacts::Artifacts,
        deployments::DeploymentStore,
        errors::DeployError,
        test_helpers::{proxy_artifact, test_context},
    };

    use super::{creation_code, DeployOptions};

    fn proxy_options(from: Address, skip: bool) -> DeployOptions {
        DeployOptions {
            from,
            contract: "ERC1967Proxy".to_string(),
            args: vec![
                DynSolValue::Address(address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")),
                DynSolValue::Bytes(vec![0x01, 0x02]),
            ],
            skip_if_already_deployed: skip,
            log: true,
        }
    }

    #[test]
    fn test_creation_code_appends_args() -> Result<()> {
        let artifact = proxy_artifact();
        let args = [
            DynSolValue::Address(address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")),
            DynSolValue::Bytes(vec![]),
        ];

        let code = creation_code(&artifact.bytecode, &artifact.abi, &args)?;

        // bytecode, then the address word, the bytes offset word and the bytes length word
        assert!(code.starts_with(&artifact.bytecode[..]));
        assert_eq!(code.len(), artifact.bytecode.len() + 3 * 32);
        let offset = artifact.bytecode.len();
        assert_eq!(&code[offset + 12..offset + 32], &[0xaa_u8; 20]);
        Ok(())
    }

    #[test]
    fn test_creation_code_rejects_mismatched_args() {
        let artifact = proxy_artifact();
        let res = creation_code(
            &artifact.bytecode,
            &artifact.abi,
            &[DynSolValue::Bool(true)],
        );
        assert!(matches!(res, Err(DeployError::CalldataConstruction(_))));

        let no_constructor = JsonAbi::new();
        let res = creation_code(&Bytes::new(), &no_constructor, &[DynSolValue::Bool(true)]);
        assert!(matches!(res, Err(DeployError::CalldataConstruction(_))));
    }

    #[tokio::test]
    async fn test_deploy_persists_record() -> Result<()> {
        let mut ctx = test_context("sepolia");
        let from = ctx.client.accounts[0];

        let record = ctx.deploy("Proxy", proxy_options(from, true)).await?;

        assert_eq!(ctx.store.get_existing("Proxy")?, record);
        assert_eq!(ctx.client.sent().len(), 1);
        assert_eq!(record.receipt.as_ref().map(|r| r.from), Some(from));
        assert_eq!(
            record.args,
            vec![
                json!(address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").to_string()),
                json!("0x0102")
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_skip_needs_no_artifact() -> Result<()> {
        let mut ctx = test_context("sepolia");
        let from = ctx.client.accounts[0];
        let existing = ctx.deploy("Proxy", proxy_options(from, true)).await?;

        ctx.artifacts = Artifacts::default();
        let reused = ctx.deploy("Proxy", proxy_options(from, true)).await?;
        assert_eq!(reused, existing);
        assert_eq!(ctx.client.sent().len(), 1);

        // Comparing or deploying still needs the artifact
        assert!(matches!(
            ctx.deploy("Proxy", proxy_options(from, false)).await,
            Err(DeployError::MissingArtifact(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_deploy_reuses_identical_record() -> Result<()> {
        let mut ctx = test_context("sepolia");
        let from = ctx.client.accounts[0];

        let first = ctx.deploy("Proxy", proxy_options(from, false)).await?;
        let second = ctx.deploy("Proxy", proxy_options(from, false)).await?;

        assert_eq!(first, second);
        assert_eq!(ctx.client.sent().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_deploy_redeploys_changed_args_unless_skipping() -> Result<()> {
        let mut ctx = test_context("sepolia");
        let from = ctx.client.accounts[0];
        let first = ctx.deploy("Proxy", proxy_options(from, false)).await?;

        let mut changed = proxy_options(from, true);
        changed.args[1] = DynSolValue::Bytes(vec![0x03]);
        let skipped = ctx.deploy("Proxy", changed.clone()).await?;
        assert_eq!(skipped, first);
        assert_eq!(ctx.client.sent().len(), 1);

        changed.skip_if_already_deployed = false;
        let redeployed = ctx.deploy("Proxy", changed).await?;
        assert_ne!(redeployed.address, first.address);
        assert_eq!(ctx.client.sent().len(), 2);
        assert_eq!(ctx.store.get_existing("Proxy")?, redeployed);
        Ok(())
    }
}
