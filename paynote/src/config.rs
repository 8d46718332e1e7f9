// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use cardanolib::{utils as chain_env, Address, Lovelace, Network, PaymentRequest};
use std::{env, str::FromStr};

/// environment variable holding the bech32 payment recipient
pub const PAYMENT_RECIPIENT_ADDRESS: &str = "PAYMENT_RECIPIENT_ADDRESS";
/// environment variable holding the payment amount in lovelace
pub const PAYMENT_AMOUNT_LOVELACE: &str = "PAYMENT_AMOUNT_LOVELACE";
/// environment variable holding the notes backend base url
pub const NOTES_API_URL: &str = "NOTES_API_URL";

pub const DEFAULT_PAYMENT_AMOUNT: Lovelace = Lovelace::from_u64(2_000_000);
pub const DEFAULT_NOTES_API_URL: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{PAYMENT_RECIPIENT_ADDRESS} is not set")]
    MissingRecipient,
    #[error("{PAYMENT_RECIPIENT_ADDRESS} is not usable: {0}")]
    InvalidRecipient(cardanolib::Error),
    #[error("{PAYMENT_AMOUNT_LOVELACE} is not usable: {0}")]
    InvalidAmount(cardanolib::Error),
    #[error(transparent)]
    Network(#[from] cardanolib::Error),
}

/// Runtime value of `name`, else the value it had at build time.
fn env_or_build_time(name: &str) -> Option<String> {
    let build_time = match name {
        PAYMENT_RECIPIENT_ADDRESS => option_env!("PAYMENT_RECIPIENT_ADDRESS"),
        PAYMENT_AMOUNT_LOVELACE => option_env!("PAYMENT_AMOUNT_LOVELACE"),
        NOTES_API_URL => option_env!("NOTES_API_URL"),
        _ => return chain_env::env_or_build_time(name),
    };
    env::var(name)
        .ok()
        .or_else(|| build_time.map(str::to_string))
        .filter(|value| !value.trim().is_empty())
}

/// Where the notes backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub notes_api_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let notes_api_url = env_or_build_time(NOTES_API_URL).unwrap_or_else(|| {
            debug!("{NOTES_API_URL} not set, using {DEFAULT_NOTES_API_URL}");
            DEFAULT_NOTES_API_URL.to_string()
        });
        Self { notes_api_url }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            notes_api_url: DEFAULT_NOTES_API_URL.to_string(),
        }
    }
}

/// What a note costs and who gets paid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentConfig {
    pub recipient: Address,
    pub amount: Lovelace,
    pub network: Network,
}

impl PaymentConfig {
    /// Reads the network, recipient and amount, checking the recipient belongs to the network.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_or_build_time)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let network = match lookup(chain_env::CARDANO_NETWORK) {
            Some(value) => Network::from_str(&value)?,
            None => Network::default(),
        };
        let recipient = lookup(PAYMENT_RECIPIENT_ADDRESS).ok_or(ConfigError::MissingRecipient)?;
        let recipient = Address::from_bech32(&recipient).map_err(ConfigError::InvalidRecipient)?;
        let amount = match lookup(PAYMENT_AMOUNT_LOVELACE) {
            Some(value) => Lovelace::from_str(&value).map_err(ConfigError::InvalidAmount)?,
            None => DEFAULT_PAYMENT_AMOUNT,
        };

        let config = Self {
            recipient,
            amount,
            network,
        };
        // surfaces network mismatches at startup rather than at payment time
        let _ = config.request().map_err(ConfigError::InvalidRecipient)?;
        Ok(config)
    }

    pub fn request(&self) -> cardanolib::Result<PaymentRequest> {
        PaymentRequest::new(self.recipient.clone(), self.amount, self.network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup(vars: Vec<(&'static str, String)>) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<&'static str, String> = vars.into_iter().collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_two_ada_on_preprod() -> Result<(), ConfigError> {
        let recipient = test_utils::testnet_address(0x42).to_bech32();
        let config = PaymentConfig::from_lookup(lookup(vec![(PAYMENT_RECIPIENT_ADDRESS, recipient)]))?;
        assert_eq!(config.network, Network::Preprod);
        assert_eq!(config.amount, Lovelace::from_u64(2_000_000));
        Ok(())
    }

    #[test]
    fn recipient_is_required() {
        assert_matches!(
            PaymentConfig::from_lookup(lookup(vec![])),
            Err(ConfigError::MissingRecipient)
        );
    }

    #[test]
    fn testnet_recipient_is_rejected_on_mainnet() {
        let recipient = test_utils::testnet_address(0x42).to_bech32();
        let result = PaymentConfig::from_lookup(lookup(vec![
            (chain_env::CARDANO_NETWORK, "mainnet".to_string()),
            (PAYMENT_RECIPIENT_ADDRESS, recipient),
        ]));
        assert_matches!(
            result,
            Err(ConfigError::InvalidRecipient(cardanolib::Error::NetworkMismatch { .. }))
        );
    }

    #[test]
    fn fractional_amount_is_rejected() {
        let recipient = test_utils::testnet_address(0x42).to_bech32();
        let result = PaymentConfig::from_lookup(lookup(vec![
            (PAYMENT_RECIPIENT_ADDRESS, recipient),
            (PAYMENT_AMOUNT_LOVELACE, "1.5".to_string()),
        ]));
        assert_matches!(result, Err(ConfigError::InvalidAmount(_)));
    }
}
