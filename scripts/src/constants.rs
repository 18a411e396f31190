//! Constants used in the deploy scripts

/// The default network name, the in-process development network
pub const DEFAULT_NETWORK: &str = "hardhat";

/// The default RPC URL of a local development node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The default directory in which deployment records are kept
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

/// The default directory in which compilation artifacts are kept
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The file, inside a network's deployments directory, recording its chain id
pub const CHAIN_ID_FILE: &str = ".chainId";

/// The extension of deployment record and artifact files
pub const JSON_EXTENSION: &str = "json";

/// The key in the named accounts file used when a role has no
/// network-specific entry
pub const DEFAULT_NAMED_ACCOUNT_KEY: &str = "default";

/// The storage slot containing the implementation address of an ERC1967 proxy.
///
/// This is specified in EIP1967: <https://eips.ethereum.org/EIPS/eip-1967#logic-contract-address>
pub const IMPLEMENTATION_STORAGE_SLOT: &str =
    "0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

// --- HiveRegistry --- //

/// The deployment name of the HiveRegistry implementation contract
pub const HIVE_REGISTRY_V1: &str = "HiveRegistryV1";

/// The deployment name of the HiveRegistry proxy contract
pub const HIVE_REGISTRY_PROXY: &str = "HiveRegistry_Proxy";

/// The contract type deployed behind the HiveRegistry proxy deployment name
pub const ERC1967_PROXY_CONTRACT: &str = "ERC1967Proxy";

/// The post-construction initializer of the HiveRegistry implementation
pub const POST_CONSTRUCT_METHOD: &str = "postConstruct";

/// The named role of the personality pod ERC721 token
pub const PERSONALITY_POD_ROLE: &str = "PersonalityPodERC721";

/// The named role of the intelligent NFT contract
pub const INTELLIGENT_NFT_ROLE: &str = "IntelligentNFTv2";

/// The named role of the personality staking contract
pub const PERSONALITY_STAKING_ROLE: &str = "PersonalityStaking";
