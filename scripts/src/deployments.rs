//! The deployment registry: records of deployed contracts, keyed by name

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, Bytes, B256},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use tracing::debug;

use crate::{
    constants::{CHAIN_ID_FILE, JSON_EXTENSION},
    errors::DeployError,
};

/// The receipt data kept for a deployment transaction.
///
/// hardhat-deploy writes gas amounts as decimal strings; both forms are read.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReceipt {
    /// The sender of the deployment transaction
    pub from: Address,
    /// The hash of the deployment transaction
    pub transaction_hash: B256,
    /// The block in which the deployment was included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// The gas used by the deployment transaction
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub gas_used: u64,
    /// The address of the created contract
    pub contract_address: Address,
}

/// A deployed contract instance, in the layout hardhat-deploy uses for
/// `deployments/<network>/<Name>.json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// The address of the contract
    pub address: Address,
    /// The contract's interface description
    pub abi: JsonAbi,
    /// The hash of the deployment transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
    /// The deployment transaction's receipt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<DeploymentReceipt>,
    /// The constructor arguments. Arguments written by this crate are strings,
    /// other tools may store numbers or nested arrays.
    #[serde(default)]
    pub args: Vec<Value>,
    /// The creation bytecode, without constructor arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode: Option<Bytes>,
}

/// A persistent store of deployment records for a single network
pub trait DeploymentStore {
    /// Get the record with the given name, if one exists
    fn get(&self, name: &str) -> Result<Option<DeploymentRecord>, DeployError>;

    /// Create or replace the record with the given name
    fn save(&mut self, name: &str, record: &DeploymentRecord) -> Result<(), DeployError>;

    /// Get the record with the given name, failing if none exists
    fn get_existing(&self, name: &str) -> Result<DeploymentRecord, DeployError> {
        self.get(name)?
            .ok_or_else(|| DeployError::MissingDeployment(name.to_string()))
    }
}

/// Deployment records kept as one JSON file per contract under
/// `<deployments dir>/<network>/`
#[derive(Clone, Debug)]
pub struct FileDeploymentStore {
    /// The directory holding this network's records
    dir: PathBuf,
}

impl FileDeploymentStore {
    /// Open the store for the given network
    pub fn new(deployments_dir: &Path, network: &str) -> Self {
        FileDeploymentStore {
            dir: deployments_dir.join(network),
        }
    }

    /// The directory holding this network's records
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The chain id recorded for this network, if any
    pub fn recorded_chain_id(&self) -> Result<Option<u64>, DeployError> {
        let path = self.dir.join(CHAIN_ID_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let contents =
            fs::read_to_string(&path).map_err(|e| DeployError::ReadDeployments(e.to_string()))?;
        let recorded = contents
            .trim()
            .parse::<u64>()
            .map_err(|e| DeployError::ReadDeployments(format!("{}: {}", CHAIN_ID_FILE, e)))?;

        Ok(Some(recorded))
    }

    /// Check that the store belongs to the given chain, without writing
    /// anything. A store with no recorded chain id passes.
    pub fn check_chain_id(&self, chain_id: u64) -> Result<(), DeployError> {
        match self.recorded_chain_id()? {
            Some(recorded) if recorded != chain_id => Err(DeployError::ChainIdMismatch {
                recorded,
                actual: chain_id,
            }),
            _ => Ok(()),
        }
    }

    /// Check that the store belongs to the given chain, recording the chain id
    /// if the store has none yet
    pub fn ensure_chain_id(&self, chain_id: u64) -> Result<(), DeployError> {
        if self.recorded_chain_id()?.is_some() {
            return self.check_chain_id(chain_id);
        }

        fs::create_dir_all(&self.dir).map_err(|e| DeployError::WriteDeployments(e.to_string()))?;
        fs::write(self.dir.join(CHAIN_ID_FILE), chain_id.to_string())
            .map_err(|e| DeployError::WriteDeployments(e.to_string()))
    }

    /// The path of the record with the given name
    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, JSON_EXTENSION))
    }
}

impl DeploymentStore for FileDeploymentStore {
    fn get(&self, name: &str) -> Result<Option<DeploymentRecord>, DeployError> {
        let path = self.record_path(name);
        if !path.exists() {
            return Ok(None);
        }

        debug!("reading deployment record {}", path.display());
        let contents =
            fs::read_to_string(&path).map_err(|e| DeployError::ReadDeployments(e.to_string()))?;
        let record = serde_json::from_str(&contents)
            .map_err(|e| DeployError::ReadDeployments(format!("{}: {}", path.display(), e)))?;

        Ok(Some(record))
    }

    fn save(&mut self, name: &str, record: &DeploymentRecord) -> Result<(), DeployError> {
        fs::create_dir_all(&self.dir).map_err(|e| DeployError::WriteDeployments(e.to_string()))?;

        let contents = serde_json::to_string_pretty(record)
            .map_err(|e| DeployError::WriteDeployments(e.to_string()))?;
        fs::write(self.record_path(name), contents)
            .map_err(|e| DeployError::WriteDeployments(e.to_string()))
    }
}
