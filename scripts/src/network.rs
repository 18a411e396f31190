//! Per-network capabilities and named account resolution

use std::{collections::HashMap, fs, path::Path};

use alloy::primitives::Address;
use serde::Deserialize;
use tracing::warn;

use crate::{constants::DEFAULT_NAMED_ACCOUNT_KEY, errors::DeployError};

/// What a deploy script is allowed to assume about a network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NetworkProfile {
    /// The network name, as selected on the command line
    name: &'static str,
    /// Whether role addresses come from the named accounts configuration.
    /// Networks without configured roles use the zero address for every role.
    uses_named_roles: bool,
    /// Whether the first account is kept free for tests, in which case the
    /// deployer is the second account
    reserves_default_account: bool,
}

/// The networks with non-default capabilities
const NETWORK_PROFILES: &[NetworkProfile] = &[
    NetworkProfile {
        name: "hardhat",
        uses_named_roles: false,
        reserves_default_account: true,
    },
    NetworkProfile {
        name: "mainnet",
        uses_named_roles: true,
        reserves_default_account: false,
    },
    NetworkProfile {
        name: "goerli",
        uses_named_roles: true,
        reserves_default_account: false,
    },
];

/// The selected network: its name and capabilities
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Network {
    /// The network name
    pub name: String,
    /// Whether role addresses come from the named accounts configuration
    pub uses_named_roles: bool,
    /// Whether the deployer skips the first account
    pub reserves_default_account: bool,
}

impl Network {
    /// Look up the capabilities of the network with the given name
    pub fn from_name(name: &str) -> Self {
        let profile = NETWORK_PROFILES.iter().find(|p| p.name == name);
        Network {
            name: name.to_string(),
            uses_named_roles: profile.is_some_and(|p| p.uses_named_roles),
            reserves_default_account: profile.is_some_and(|p| p.reserves_default_account),
        }
    }

    /// The index, in the account list, of the account used for deployments
    pub fn deployer_index(&self) -> usize {
        if self.reserves_default_account {
            1
        } else {
            0
        }
    }

    /// Select the deployer out of the available accounts
    pub fn deployer(&self, accounts: &[Address]) -> Result<Address, DeployError> {
        let index = self.deployer_index();
        accounts
            .get(index)
            .copied()
            .ok_or(DeployError::NoAccounts(index))
    }

    /// Resolve the addresses of the given roles, in order.
    ///
    /// On networks without configured roles every role is the zero address.
    pub fn role_addresses(
        &self,
        roles: &[&str],
        named_accounts: &NamedAccounts,
    ) -> Result<Vec<Address>, DeployError> {
        if !self.uses_named_roles {
            return Ok(vec![Address::ZERO; roles.len()]);
        }

        roles
            .iter()
            .map(|role| {
                let address = named_accounts.get(role, &self.name).ok_or_else(|| {
                    DeployError::NamedAccount(format!(
                        "{} is not configured for network {}",
                        role, self.name
                    ))
                })?;

                if address.is_zero() {
                    warn!("named account {} is the zero address on {}", role, self.name);
                }

                Ok(address)
            })
            .collect()
    }
}

/// Role addresses per network, in the shape of a hardhat `namedAccounts` table:
/// `{ "<role>": { "<network>": "0x..", "default": "0x.." } }`
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct NamedAccounts(HashMap<String, HashMap<String, Address>>);

impl NamedAccounts {
    /// Read the named accounts from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, DeployError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DeployError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    /// Parse the named accounts from a JSON string
    pub fn from_json(json: &str) -> Result<Self, DeployError> {
        serde_json::from_str(json).map_err(|e| DeployError::Config(e.to_string()))
    }

    /// The address of `role` on `network`, falling back to the role's default
    pub fn get(&self, role: &str, network: &str) -> Option<Address> {
        let per_network = self.0.get(role)?;
        per_network
            .get(network)
            .or_else(|| per_network.get(DEFAULT_NAMED_ACCOUNT_KEY))
            .copied()
    }
}
