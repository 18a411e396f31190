//! Loading of compiled contract artifacts

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde::Deserialize;
use tracing::debug;

use crate::{constants::JSON_EXTENSION, errors::DeployError};

/// A compiled contract, as emitted by hardhat into
/// `<artifacts>/<source path>/<ContractName>.json`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The contract's interface description
    pub abi: JsonAbi,
    /// The contract's creation bytecode
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Parse an artifact from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, DeployError> {
        serde_json::from_str(json).map_err(|e| DeployError::ArtifactParsing(e.to_string()))
    }
}

/// Compilation artifacts, looked up by contract name
#[derive(Debug, Default)]
pub struct Artifacts {
    /// The artifacts directory to search, if any
    root: Option<PathBuf>,
    /// Artifacts that have been loaded or registered
    cache: HashMap<String, ContractArtifact>,
}

impl Artifacts {
    /// Artifacts found under the given directory
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Artifacts {
            root: Some(root.into()),
            cache: HashMap::new(),
        }
    }

    /// Register an artifact directly, bypassing the artifacts directory
    pub fn insert(&mut self, artifact: ContractArtifact) {
        self.cache.insert(artifact.contract_name.clone(), artifact);
    }

    /// Get the artifact for the given contract
    pub fn get(&mut self, contract_name: &str) -> Result<&ContractArtifact, DeployError> {
        if !self.cache.contains_key(contract_name) {
            let artifact = self.load(contract_name)?;
            self.cache.insert(contract_name.to_string(), artifact);
        }

        self.cache
            .get(contract_name)
            .ok_or_else(|| DeployError::MissingArtifact(contract_name.to_string()))
    }

    /// Find and parse the artifact for the given contract in the artifacts directory
    fn load(&self, contract_name: &str) -> Result<ContractArtifact, DeployError> {
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| DeployError::MissingArtifact(contract_name.to_string()))?;

        let file_name = format!("{}.{}", contract_name, JSON_EXTENSION);
        let path = find_file(root, &file_name)?
            .ok_or_else(|| DeployError::MissingArtifact(contract_name.to_string()))?;
        debug!("loading artifact for {} from {}", contract_name, path.display());

        let contents = fs::read_to_string(&path)
            .map_err(|e| DeployError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
        ContractArtifact::from_json(&contents)
    }
}

/// Depth-first search for a file with the given name
fn find_file(dir: &Path, file_name: &str) -> Result<Option<PathBuf>, DeployError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| DeployError::ArtifactParsing(format!("{}: {}", dir.display(), e)))?;

    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| DeployError::ArtifactParsing(e.to_string()))?
            .path();

        if path.is_dir() {
            subdirs.push(path);
            continue;
        }

        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == file_name);
        if matches {
            return Ok(Some(path));
        }
    }

    subdirs.sort();
    for subdir in subdirs {
        if let Some(path) = find_file(&subdir, file_name)? {
            return Ok(Some(path));
        }
    }

    Ok(None)
}
