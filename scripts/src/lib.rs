//! Scripts for deploying and initializing the HiveRegistry contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod client;
mod commands;
pub mod constants;
pub mod deployer;
pub mod deployments;
pub mod errors;
pub mod network;
pub mod scripts;
pub mod utils;

#[cfg(test)]
mod test_helpers;
