// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

#[macro_use]
extern crate tracing;

pub mod address;
pub mod amount;
pub mod chain;
pub mod common;
pub mod error;
pub mod indexer;
pub mod parameters;
pub mod serialization;
pub mod transaction;
pub mod utils;
pub mod wallet;

pub use address::Address;
pub use amount::Lovelace;
pub use chain::ChainClient;
pub use common::{TxHash, TxInput, Utxo};
pub use error::{Error, Result};
pub use indexer::{Accepted, IndexerClient, TxStatus};
pub use parameters::{FetchedParameters, ProtocolParameters};
pub use serialization::{ByteCodec, HexCodec, RawTransaction, SignedTransaction};
pub use transaction::{PaymentRequest, TxOutput, UnsignedTransaction};
pub use wallet::{
    ConnectError, ExtensionHost, SessionView, WalletApi, WalletApiError, WalletConnector,
    WalletExtension, WalletSession,
};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const PREPROD_INDEXER_URL: &str = "https://cardano-preprod.blockfrost.io/api/v0";
const TESTNET_INDEXER_URL: &str = "https://cardano-testnet.blockfrost.io/api/v0";
const PREVIEW_INDEXER_URL: &str = "https://cardano-preview.blockfrost.io/api/v0";
const MAINNET_INDEXER_URL: &str = "https://cardano-mainnet.blockfrost.io/api/v0";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    #[default]
    Preprod,
    Testnet,
    Preview,
    Mainnet,
}

impl Network {
    pub fn identifier(&self) -> &'static str {
        match self {
            Network::Preprod => "cardano-preprod",
            Network::Testnet => "cardano-testnet",
            Network::Preview => "cardano-preview",
            Network::Mainnet => "cardano-mainnet",
        }
    }

    /// The id carried in the low nibble of an address header.
    pub fn network_id(&self) -> u8 {
        match self {
            Network::Mainnet => 1,
            Network::Preprod | Network::Testnet | Network::Preview => 0,
        }
    }

    pub fn indexer_url(&self) -> &'static str {
        match self {
            Network::Preprod => PREPROD_INDEXER_URL,
            Network::Testnet => TESTNET_INDEXER_URL,
            Network::Preview => PREVIEW_INDEXER_URL,
            Network::Mainnet => MAINNET_INDEXER_URL,
        }
    }

    /// Link to the transaction on cardanoscan.
    pub fn explorer_tx_url(&self, tx_hash: &TxHash) -> String {
        match self {
            Network::Mainnet => format!("https://cardanoscan.io/transaction/{tx_hash}"),
            Network::Preprod => format!("https://preprod.cardanoscan.io/transaction/{tx_hash}"),
            Network::Testnet => format!("https://testnet.cardanoscan.io/transaction/{tx_hash}"),
            Network::Preview => format!("https://preview.cardanoscan.io/transaction/{tx_hash}"),
        }
    }

    pub(crate) fn env_suffix(&self) -> &'static str {
        match self {
            Network::Preprod => "PREPROD",
            Network::Testnet => "TESTNET",
            Network::Preview => "PREVIEW",
            Network::Mainnet => "MAINNET",
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    /// Case insensitive, with or without the `cardano-` prefix.
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        let name = lowered.strip_prefix("cardano-").unwrap_or(&lowered);
        match name {
            "preprod" => Ok(Network::Preprod),
            "testnet" => Ok(Network::Testnet),
            "preview" => Ok(Network::Preview),
            "mainnet" => Ok(Network::Mainnet),
            _ => Err(Error::UnknownNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_names_round_trip() -> Result<()> {
        for network in [
            Network::Preprod,
            Network::Testnet,
            Network::Preview,
            Network::Mainnet,
        ] {
            assert_eq!(Network::from_str(network.identifier())?, network);
        }
        assert_eq!(Network::from_str(" PREPROD ")?, Network::Preprod);
        assert!(Network::from_str("cardano-").is_err());
        Ok(())
    }

    #[test]
    fn only_mainnet_has_network_id_one() {
        assert_eq!(Network::Mainnet.network_id(), 1);
        assert_eq!(Network::Preview.network_id(), 0);
    }

    #[test]
    fn explorer_link_points_at_the_right_network() {
        let hash = TxHash::new([0xab; 32]);
        let url = Network::Preprod.explorer_tx_url(&hash);
        assert!(url.starts_with("https://preprod.cardanoscan.io/transaction/abab"));
        assert_eq!(url.len(), "https://preprod.cardanoscan.io/transaction/".len() + 64);
    }
}
