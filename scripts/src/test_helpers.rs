//! Test doubles for the chain client and deployment registry

use std::{collections::HashMap, sync::Mutex};

use alloy::primitives::{address, keccak256, Address, Bytes, B256, U256};

use crate::{
    artifacts::{Artifacts, ContractArtifact},
    client::{ChainClient, CreationReceipt},
    deployer::DeployContext,
    deployments::{DeploymentRecord, DeploymentStore},
    errors::DeployError,
    network::{NamedAccounts, Network},
};

/// The gas every mocked deployment reports
pub const MOCK_DEPLOYMENT_GAS: u64 = 500_000;

/// A deployment transaction captured by the mock client
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentDeployment {
    /// The sender
    pub from: Address,
    /// The creation code, constructor arguments included
    pub init_code: Bytes,
    /// The address assigned to the created contract
    pub contract_address: Address,
}

/// A chain client that mines every deployment instantly and remembers it
pub struct MockClient {
    /// The chain id reported
    pub chain_id: u64,
    /// The accounts reported
    pub accounts: Vec<Address>,
    /// The deployments sent so far
    sent: Mutex<Vec<SentDeployment>>,
    /// Storage values, by contract and slot
    storage: HashMap<(Address, U256), U256>,
    /// Call results, by contract and calldata
    calls: HashMap<(Address, Bytes), Bytes>,
}

impl MockClient {
    /// A client on chain 31337 with the given accounts
    pub fn new(accounts: Vec<Address>) -> Self {
        MockClient {
            chain_id: 31337,
            accounts,
            sent: Mutex::new(Vec::new()),
            storage: HashMap::new(),
            calls: HashMap::new(),
        }
    }

    /// The deployments sent so far
    pub fn sent(&self) -> Vec<SentDeployment> {
        self.sent.lock().unwrap().clone()
    }

    /// Set the value of a storage slot
    pub fn set_storage(&mut self, contract: Address, slot: U256, value: U256) {
        self.storage.insert((contract, slot), value);
    }

    /// Set the result of a call
    pub fn set_call_result(&mut self, contract: Address, calldata: Bytes, result: Bytes) {
        self.calls.insert((contract, calldata), result);
    }
}

impl ChainClient for MockClient {
    async fn chain_id(&self) -> Result<u64, DeployError> {
        Ok(self.chain_id)
    }

    async fn accounts(&self) -> Result<Vec<Address>, DeployError> {
        Ok(self.accounts.clone())
    }

    async fn transaction_count(&self, account: Address) -> Result<u64, DeployError> {
        let sent = self.sent.lock().unwrap();
        Ok(sent.iter().filter(|d| d.from == account).count() as u64)
    }

    async fn balance(&self, _account: Address) -> Result<U256, DeployError> {
        Ok(U256::from(10_u64).pow(U256::from(21_u64)))
    }

    async fn storage_at(&self, contract: Address, slot: U256) -> Result<U256, DeployError> {
        Ok(self
            .storage
            .get(&(contract, slot))
            .copied()
            .unwrap_or_default())
    }

    async fn call(&self, contract: Address, calldata: Bytes) -> Result<Bytes, DeployError> {
        self.calls
            .get(&(contract, calldata))
            .cloned()
            .ok_or_else(|| DeployError::Rpc("execution reverted".to_string()))
    }

    async fn deploy(
        &self,
        from: Address,
        init_code: Bytes,
    ) -> Result<CreationReceipt, DeployError> {
        let mut sent = self.sent.lock().unwrap();
        let nonce = sent.iter().filter(|d| d.from == from).count() as u64;
        let contract_address = from.create(nonce);
        let transaction_hash: B256 = keccak256([&init_code[..], &nonce.to_be_bytes()[..]].concat());

        sent.push(SentDeployment {
            from,
            init_code,
            contract_address,
        });

        Ok(CreationReceipt {
            transaction_hash,
            contract_address,
            block_number: Some(sent.len() as u64),
            gas_used: MOCK_DEPLOYMENT_GAS,
        })
    }
}

/// Deployment records held in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryDeploymentStore {
    /// The records, by name
    records: HashMap<String, DeploymentRecord>,
}

impl DeploymentStore for MemoryDeploymentStore {
    fn get(&self, name: &str) -> Result<Option<DeploymentRecord>, DeployError> {
        Ok(self.records.get(name).cloned())
    }

    fn save(&mut self, name: &str, record: &DeploymentRecord) -> Result<(), DeployError> {
        self.records.insert(name.to_string(), record.clone());
        Ok(())
    }
}

/// The accounts of the mock client
pub fn test_accounts() -> Vec<Address> {
    vec![
        address!("0x00000000000000000000000000000000000000a0"),
        address!("0x00000000000000000000000000000000000000a1"),
        address!("0x00000000000000000000000000000000000000a2"),
    ]
}

/// An ERC1967 proxy artifact, with a stand-in creation bytecode
pub fn proxy_artifact_json() -> &'static str {
    r#"{
        "_format": "hh-sol-artifact-1",
        "contractName": "ERC1967Proxy",
        "sourceName": "@openzeppelin/contracts/proxy/ERC1967/ERC1967Proxy.sol",
        "abi": [
            {
                "type": "constructor",
                "inputs": [
                    {"name": "_logic", "type": "address", "internalType": "address"},
                    {"name": "_data", "type": "bytes", "internalType": "bytes"}
                ],
                "stateMutability": "payable"
            },
            {
                "type": "event",
                "name": "Upgraded",
                "inputs": [
                    {"name": "implementation", "type": "address", "indexed": true, "internalType": "address"}
                ],
                "anonymous": false
            },
            {"type": "fallback", "stateMutability": "payable"},
            {"type": "receive", "stateMutability": "payable"}
        ],
        "bytecode": "0x608060405260405161040a38038061040a833981016040819052610022916102",
        "deployedBytecode": "0x6080604052",
        "linkReferences": {},
        "deployedLinkReferences": {}
    }"#
}

/// The parsed ERC1967 proxy artifact
pub fn proxy_artifact() -> ContractArtifact {
    ContractArtifact::from_json(proxy_artifact_json()).unwrap()
}

/// The interface of the HiveRegistry implementation
pub fn implementation_abi_json() -> &'static str {
    r#"[
        {
            "type": "function",
            "name": "postConstruct",
            "inputs": [
                {"name": "_podContract", "type": "address", "internalType": "address"},
                {"name": "_iNftContract", "type": "address", "internalType": "address"},
                {"name": "_podStakingContract", "type": "address", "internalType": "address"}
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "getImplementation",
            "inputs": [],
            "outputs": [{"name": "", "type": "address", "internalType": "address"}],
            "stateMutability": "view"
        }
    ]"#
}

/// A record of the HiveRegistry implementation at the given address
pub fn implementation_record(address: Address) -> DeploymentRecord {
    DeploymentRecord {
        address,
        abi: serde_json::from_str(implementation_abi_json()).unwrap(),
        transaction_hash: None,
        receipt: None,
        args: Vec::new(),
        bytecode: None,
    }
}

/// A deploy context on the given network with the proxy artifact registered
/// and an empty registry
pub fn test_context(network: &str) -> DeployContext<MockClient, MemoryDeploymentStore> {
    let mut artifacts = Artifacts::default();
    artifacts.insert(proxy_artifact());

    DeployContext::new(
        Network::from_name(network),
        MockClient::new(test_accounts()),
        MemoryDeploymentStore::default(),
        artifacts,
        NamedAccounts::default(),
    )
}
