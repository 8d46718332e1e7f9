// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Network and indexer selection from the environment.
//!
//! Every variable is read at runtime first and falls back to the value baked in at build time.

use crate::{
    chain::ChainClient,
    error::Result,
    indexer::IndexerClient,
    serialization::HexCodec,
    Network,
};
use std::{env, str::FromStr, sync::Arc};

/// environment variable selecting the Cardano network
pub const CARDANO_NETWORK: &str = "CARDANO_NETWORK";
/// indexer API key, overridden by the network specific variants
pub const BLOCKFROST_PROJECT_ID: &str = "BLOCKFROST_PROJECT_ID";
/// overrides the indexer base url, e.g. for a self hosted instance
pub const BLOCKFROST_URL: &str = "BLOCKFROST_URL";

fn build_time_value(name: &str) -> Option<&'static str> {
    match name {
        CARDANO_NETWORK => option_env!("CARDANO_NETWORK"),
        BLOCKFROST_PROJECT_ID => option_env!("BLOCKFROST_PROJECT_ID"),
        "BLOCKFROST_PROJECT_ID_PREPROD" => option_env!("BLOCKFROST_PROJECT_ID_PREPROD"),
        "BLOCKFROST_PROJECT_ID_TESTNET" => option_env!("BLOCKFROST_PROJECT_ID_TESTNET"),
        "BLOCKFROST_PROJECT_ID_PREVIEW" => option_env!("BLOCKFROST_PROJECT_ID_PREVIEW"),
        "BLOCKFROST_PROJECT_ID_MAINNET" => option_env!("BLOCKFROST_PROJECT_ID_MAINNET"),
        BLOCKFROST_URL => option_env!("BLOCKFROST_URL"),
        _ => None,
    }
}

/// Runtime value of `name`, else its build time value. Blank values count as unset.
pub fn env_or_build_time(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .or_else(|| build_time_value(name).map(str::to_string))
        .filter(|value| !value.trim().is_empty())
}

/// `CARDANO_NETWORK`, defaulting to preprod.
pub fn get_network_from_env() -> Result<Network> {
    network_from(env_or_build_time)
}

/// The network specific project id if set, else `BLOCKFROST_PROJECT_ID`, else empty.
pub fn get_project_id_from_env(network: Network) -> String {
    project_id_from(network, env_or_build_time)
}

pub fn get_indexer_url_from_env(network: Network) -> String {
    env_or_build_time(BLOCKFROST_URL).unwrap_or_else(|| network.indexer_url().to_string())
}

/// A [`ChainClient`] for the configured network, using [`HexCodec`].
pub fn chain_client_from_env() -> Result<ChainClient> {
    let network = get_network_from_env()?;
    let project_id = get_project_id_from_env(network);
    let url = get_indexer_url_from_env(network);
    let prefix: String = project_id.chars().take(8).collect();
    info!("Using {network} via {url} with project id {prefix}...");
    let indexer = IndexerClient::new(&url, project_id)?;
    Ok(ChainClient::new(indexer, Arc::new(HexCodec), network))
}

fn network_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Network> {
    match lookup(CARDANO_NETWORK) {
        Some(value) => {
            let network = Network::from_str(&value)?;
            info!("Using {network} as {CARDANO_NETWORK} is set to {value:?}");
            Ok(network)
        }
        None => Ok(Network::default()),
    }
}

fn project_id_from(network: Network, lookup: impl Fn(&str) -> Option<String>) -> String {
    let specific = format!("{BLOCKFROST_PROJECT_ID}_{}", network.env_suffix());
    lookup(&specific)
        .or_else(|| lookup(BLOCKFROST_PROJECT_ID))
        .unwrap_or_else(|| {
            warn!("Neither {specific} nor {BLOCKFROST_PROJECT_ID} is set");
            String::new()
        })
}
