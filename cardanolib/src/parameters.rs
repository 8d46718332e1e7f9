// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::amount::Lovelace;
use serde::Serialize;
use serde_json::{Map, Value};

pub const DEFAULT_MIN_FEE_A: u64 = 44;
pub const DEFAULT_MIN_FEE_B: u64 = 155_381;
pub const DEFAULT_COINS_PER_UTXO_SIZE: u64 = 4_310;
pub const DEFAULT_MAX_TX_SIZE: u64 = 16_384;
pub const DEFAULT_MAX_BLOCK_HEADER_SIZE: u64 = 1_100;
pub const DEFAULT_KEY_DEPOSIT: u64 = 2_000_000;
pub const DEFAULT_POOL_DEPOSIT: u64 = 500_000_000;
pub const DEFAULT_MIN_POOL_COST: u64 = 340_000_000;
pub const DEFAULT_PRICE_MEM: f64 = 0.0577;
pub const DEFAULT_PRICE_STEP: f64 = 0.0000721;

/// Fee and size parameters of the current epoch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProtocolParameters {
    /// Fee per byte of signed transaction.
    pub min_fee_a: u64,
    /// Constant part of the fee.
    pub min_fee_b: u64,
    /// Lovelace per byte of a serialized output, drives the min-utxo value.
    pub coins_per_utxo_size: u64,
    pub max_tx_size: u64,
    pub max_block_header_size: u64,
    pub key_deposit: Lovelace,
    pub pool_deposit: Lovelace,
    pub min_pool_cost: Lovelace,
    /// Script execution prices. Only reported, plain payments never run scripts.
    pub price_mem: f64,
    pub price_step: f64,
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            min_fee_a: DEFAULT_MIN_FEE_A,
            min_fee_b: DEFAULT_MIN_FEE_B,
            coins_per_utxo_size: DEFAULT_COINS_PER_UTXO_SIZE,
            max_tx_size: DEFAULT_MAX_TX_SIZE,
            max_block_header_size: DEFAULT_MAX_BLOCK_HEADER_SIZE,
            key_deposit: Lovelace::from_u64(DEFAULT_KEY_DEPOSIT),
            pool_deposit: Lovelace::from_u64(DEFAULT_POOL_DEPOSIT),
            min_pool_cost: Lovelace::from_u64(DEFAULT_MIN_POOL_COST),
            price_mem: DEFAULT_PRICE_MEM,
            price_step: DEFAULT_PRICE_STEP,
        }
    }
}

/// Names every field is accepted under, canonical name first.
const MIN_FEE_A: &[&str] = &["min_fee_a", "minFeeA"];
const MIN_FEE_B: &[&str] = &["min_fee_b", "minFeeB"];
const COINS_PER_UTXO_SIZE: &[&str] = &[
    "coins_per_utxo_size",
    "coinsPerUtxoSize",
    "coins_per_utxo_word",
    "coinsPerUtxoWord",
];
const MAX_TX_SIZE: &[&str] = &["max_tx_size", "maxTxSize"];
const MAX_BLOCK_HEADER_SIZE: &[&str] = &["max_block_header_size", "maxBlockHeaderSize"];
const KEY_DEPOSIT: &[&str] = &["key_deposit", "keyDeposit", "stakeKeyDeposit"];
const POOL_DEPOSIT: &[&str] = &["pool_deposit", "poolDeposit"];
const MIN_POOL_COST: &[&str] = &["min_pool_cost", "minPoolCost"];
const PRICE_MEM: &[&str] = &["price_mem", "priceMem"];
const PRICE_STEP: &[&str] = &["price_step", "priceStep"];

const ALL_FIELDS: [&[&str]; 10] = [
    MIN_FEE_A,
    MIN_FEE_B,
    COINS_PER_UTXO_SIZE,
    MAX_TX_SIZE,
    MAX_BLOCK_HEADER_SIZE,
    KEY_DEPOSIT,
    POOL_DEPOSIT,
    MIN_POOL_COST,
    PRICE_MEM,
    PRICE_STEP,
];

/// Parameters together with the names of the fields that fell back to their default.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FetchedParameters {
    pub params: ProtocolParameters,
    pub defaulted: Vec<&'static str>,
}

impl FetchedParameters {
    /// Every field taken from the default table, used when the indexer could not be reached.
    pub fn all_defaults() -> Self {
        Self {
            params: ProtocolParameters::default(),
            defaulted: ALL_FIELDS.iter().map(|names| names[0]).collect(),
        }
    }

    /// True when at least one field was missing or unreadable.
    pub fn is_degraded(&self) -> bool {
        !self.defaulted.is_empty()
    }
}

/// Reads an indexer parameters response, filling anything missing from the default table.
///
/// Values may be JSON numbers or numeric strings. `null`, negative or unparsable values
/// count as missing.
pub fn normalize(response: &Value) -> FetchedParameters {
    let empty = Map::new();
    let object = response.as_object().unwrap_or(&empty);
    let mut reader = FieldReader {
        object,
        defaulted: Vec::new(),
    };

    let params = ProtocolParameters {
        min_fee_a: reader.integer(MIN_FEE_A, DEFAULT_MIN_FEE_A),
        min_fee_b: reader.integer(MIN_FEE_B, DEFAULT_MIN_FEE_B),
        coins_per_utxo_size: reader.integer(COINS_PER_UTXO_SIZE, DEFAULT_COINS_PER_UTXO_SIZE),
        max_tx_size: reader.integer(MAX_TX_SIZE, DEFAULT_MAX_TX_SIZE),
        max_block_header_size: reader.integer(MAX_BLOCK_HEADER_SIZE, DEFAULT_MAX_BLOCK_HEADER_SIZE),
        key_deposit: Lovelace::from_u64(reader.integer(KEY_DEPOSIT, DEFAULT_KEY_DEPOSIT)),
        pool_deposit: Lovelace::from_u64(reader.integer(POOL_DEPOSIT, DEFAULT_POOL_DEPOSIT)),
        min_pool_cost: Lovelace::from_u64(reader.integer(MIN_POOL_COST, DEFAULT_MIN_POOL_COST)),
        price_mem: reader.decimal(PRICE_MEM, DEFAULT_PRICE_MEM),
        price_step: reader.decimal(PRICE_STEP, DEFAULT_PRICE_STEP),
    };

    FetchedParameters {
        params,
        defaulted: reader.defaulted,
    }
}

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    defaulted: Vec<&'static str>,
}

impl FieldReader<'_> {
    fn lookup(&self, names: &[&str]) -> Option<&Value> {
        names
            .iter()
            .filter_map(|name| self.object.get(*name))
            .find(|value| !value.is_null())
    }

    fn integer(&mut self, names: &'static [&'static str], default: u64) -> u64 {
        let parsed = self.lookup(names).and_then(|value| match value {
            Value::Number(number) => number.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        });
        self.or_default(names, parsed, default)
    }

    fn decimal(&mut self, names: &'static [&'static str], default: f64) -> f64 {
        let parsed = self
            .lookup(names)
            .and_then(|value| match value {
                Value::Number(number) => number.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            })
            .filter(|value| value.is_finite() && *value >= 0.0);
        self.or_default(names, parsed, default)
    }

    fn or_default<T: std::fmt::Debug>(
        &mut self,
        names: &'static [&'static str],
        parsed: Option<T>,
        default: T,
    ) -> T {
        match parsed {
            Some(value) => value,
            None => {
                debug!("Protocol parameter {} missing, using {default:?}", names[0]);
                self.defaulted.push(names[0]);
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_snake_case_response_is_not_degraded() {
        let fetched = normalize(&json!({
            "min_fee_a": 45,
            "min_fee_b": 155_000,
            "coins_per_utxo_size": "4310",
            "max_tx_size": 16_384,
            "max_block_header_size": 1_100,
            "key_deposit": "2000000",
            "pool_deposit": "500000000",
            "min_pool_cost": "340000000",
            "price_mem": 0.0577,
            "price_step": 0.0000721,
        }));
        assert!(!fetched.is_degraded());
        assert_eq!(fetched.params.min_fee_a, 45);
        assert_eq!(fetched.params.min_fee_b, 155_000);
        assert_eq!(fetched.params.key_deposit, Lovelace::from_u64(2_000_000));
    }

    #[test]
    fn camel_case_and_legacy_aliases_are_read() {
        let fetched = normalize(&json!({
            "minFeeA": 50,
            "minFeeB": "160000",
            "coins_per_utxo_word": 34_482,
            "stakeKeyDeposit": 3_000_000,
        }));
        assert_eq!(fetched.params.min_fee_a, 50);
        assert_eq!(fetched.params.min_fee_b, 160_000);
        assert_eq!(fetched.params.coins_per_utxo_size, 34_482);
        assert_eq!(fetched.params.key_deposit, Lovelace::from_u64(3_000_000));
    }

    #[test]
    fn missing_min_fee_a_falls_back_to_44() {
        let fetched = normalize(&json!({ "min_fee_b": 155_381 }));
        assert_eq!(fetched.params.min_fee_a, 44);
        assert!(fetched.defaulted.contains(&"min_fee_a"));
        assert!(!fetched.defaulted.contains(&"min_fee_b"));
        assert!(fetched.is_degraded());
    }

    #[test]
    fn null_negative_and_garbage_values_count_as_missing() {
        let fetched = normalize(&json!({
            "min_fee_a": null,
            "max_tx_size": -1,
            "price_mem": "cheap",
        }));
        assert_eq!(fetched.params.min_fee_a, DEFAULT_MIN_FEE_A);
        assert_eq!(fetched.params.max_tx_size, DEFAULT_MAX_TX_SIZE);
        assert_eq!(fetched.params.price_mem, DEFAULT_PRICE_MEM);
        assert_eq!(fetched.defaulted.len(), ALL_FIELDS.len());
    }

    #[test]
    fn non_object_response_defaults_everything() {
        let fetched = normalize(&json!("Bad Gateway"));
        assert_eq!(fetched, FetchedParameters::all_defaults());
    }
}
