//! The chain client used by the deploy scripts

use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::debug;

use crate::errors::DeployError;

/// The outcome of a mined contract creation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreationReceipt {
    /// The hash of the deployment transaction
    pub transaction_hash: B256,
    /// The address of the created contract
    pub contract_address: Address,
    /// The block in which the transaction was included
    pub block_number: Option<u64>,
    /// The gas used by the transaction
    pub gas_used: u64,
}

/// The node operations the deploy scripts depend on
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// The id of the connected chain
    async fn chain_id(&self) -> Result<u64, DeployError>;

    /// The accounts available to send transactions from, in order
    async fn accounts(&self) -> Result<Vec<Address>, DeployError>;

    /// The number of transactions sent from the given account
    async fn transaction_count(&self, account: Address) -> Result<u64, DeployError>;

    /// The balance of the given account, in wei
    async fn balance(&self, account: Address) -> Result<U256, DeployError>;

    /// The value of a storage slot of the given contract
    async fn storage_at(&self, contract: Address, slot: U256) -> Result<U256, DeployError>;

    /// Execute a read-only call against the given contract
    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, DeployError>;

    /// Send a contract creation transaction and wait for it to be mined
    async fn deploy(&self, from: Address, init_code: Bytes)
        -> Result<CreationReceipt, DeployError>;
}

/// A chain client talking to a node over HTTP JSON-RPC
#[derive(Clone)]
pub struct RpcClient {
    /// The underlying provider
    provider: DynProvider<Ethereum>,
    /// The addresses of the local signers; empty if the node signs
    signers: Vec<Address>,
}

impl RpcClient {
    /// Connect to the node at the given URL.
    ///
    /// If private keys are given, transactions are signed locally and the
    /// signers are the available accounts. Otherwise the node's own accounts
    /// are used and the node signs.
    pub fn new(rpc_url: &str, priv_keys: &[String]) -> Result<Self, DeployError> {
        let url =
            Url::parse(rpc_url).map_err(|e| DeployError::ClientInitialization(e.to_string()))?;

        let signers = priv_keys
            .iter()
            .map(|key| {
                PrivateKeySigner::from_str(key)
                    .map_err(|e| DeployError::ClientInitialization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let addresses = signers.iter().map(|s| s.address()).collect();

        let provider = match signers.split_first() {
            Some((first, rest)) => {
                let mut wallet = EthereumWallet::new(first.clone());
                for signer in rest {
                    wallet.register_signer(signer.clone());
                }
                DynProvider::new(ProviderBuilder::new().wallet(wallet).connect_http(url))
            }
            None => DynProvider::new(ProviderBuilder::new().connect_http(url)),
        };

        Ok(RpcClient {
            provider,
            signers: addresses,
        })
    }
}

impl ChainClient for RpcClient {
    async fn chain_id(&self) -> Result<u64, DeployError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| DeployError::Rpc(e.to_string()))
    }

    async fn accounts(&self) -> Result<Vec<Address>, DeployError> {
        if !self.signers.is_empty() {
            return Ok(self.signers.clone());
        }

        self.provider
            .get_accounts()
            .await
            .map_err(|e| DeployError::Rpc(e.to_string()))
    }

    async fn transaction_count(&self, account: Address) -> Result<u64, DeployError> {
        self.provider
            .get_transaction_count(account)
            .await
            .map_err(|e| DeployError::Rpc(e.to_string()))
    }

    async fn balance(&self, account: Address) -> Result<U256, DeployError> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| DeployError::Rpc(e.to_string()))
    }

    async fn storage_at(&self, contract: Address, slot: U256) -> Result<U256, DeployError> {
        self.provider
            .get_storage_at(contract, slot)
            .await
            .map_err(|e| DeployError::Rpc(e.to_string()))
    }

    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, DeployError> {
        let tx = TransactionRequest::default()
            .with_to(contract)
            .with_input(calldata);

        self.provider
            .call(tx)
            .await
            .map_err(|e| DeployError::Rpc(e.to_string()))
    }

    async fn deploy(
        &self,
        from: Address,
        init_code: Bytes,
    ) -> Result<CreationReceipt, DeployError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(init_code);

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| DeployError::ContractDeployment(e.to_string()))?;
        debug!("deployment transaction sent: {:#x}", pending_tx.tx_hash());

        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| DeployError::ContractDeployment(e.to_string()))?;

        if !receipt.status() {
            return Err(DeployError::ContractDeployment(format!(
                "transaction {:#x} reverted",
                receipt.transaction_hash
            )));
        }

        let contract_address = receipt.contract_address.ok_or_else(|| {
            DeployError::ContractDeployment(format!(
                "receipt for {:#x} has no contract address",
                receipt.transaction_hash
            ))
        })?;

        Ok(CreationReceipt {
            transaction_hash: receipt.transaction_hash,
            contract_address,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}
