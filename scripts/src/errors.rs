//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum DeployError {
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error querying the node (chain id, accounts, nonce, balance, calls)
    Rpc(String),
    /// The node or signer set exposes no account at the deployer index
    NoAccounts(usize),
    /// A named role has no address configured for the selected network
    NamedAccount(String),
    /// Error reading a deployment record
    ReadDeployments(String),
    /// Error writing a deployment record
    WriteDeployments(String),
    /// A deployment record this script depends on does not exist
    MissingDeployment(String),
    /// The deployments directory belongs to a different chain
    ChainIdMismatch {
        /// The chain id recorded in the deployments directory
        recorded: u64,
        /// The chain id reported by the node
        actual: u64,
    },
    /// Error parsing a compilation artifact
    ArtifactParsing(String),
    /// No compilation artifact exists for the requested contract
    MissingArtifact(String),
    /// Error constructing calldata for a contract method or constructor
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error loading configuration
    Config(String),
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            DeployError::Rpc(s) => write!(f, "error querying node: {}", s),
            DeployError::NoAccounts(index) => {
                write!(f, "no account available at index {}", index)
            }
            DeployError::NamedAccount(s) => write!(f, "error resolving named account: {}", s),
            DeployError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            DeployError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            DeployError::MissingDeployment(name) => {
                write!(f, "no deployment record found for {}", name)
            }
            DeployError::ChainIdMismatch { recorded, actual } => write!(
                f,
                "deployments were recorded for chain {} but the node reports chain {}",
                recorded, actual
            ),
            DeployError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            DeployError::MissingArtifact(name) => write!(f, "no artifact found for {}", name),
            DeployError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            DeployError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            DeployError::Config(s) => write!(f, "error loading configuration: {}", s),
        }
    }
}

impl Error for DeployError {}
