// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{address::Address, amount::Lovelace, error::Error};
use blake2::{digest::consts::U32, Blake2b, Digest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

pub const TX_HASH_LEN: usize = 32;

type Blake2b256 = Blake2b<U32>;

/// Hash identifying a transaction on chain, rendered as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxHash([u8; TX_HASH_LEN]);

impl TxHash {
    pub const fn new(bytes: [u8; TX_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// A transaction's id is the blake2b-256 digest of its CBOR body.
    pub fn of_body(body: &[u8]) -> Self {
        let mut bytes = [0u8; TX_HASH_LEN];
        bytes.copy_from_slice(&Blake2b256::digest(body));
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TX_HASH_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for TxHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != TX_HASH_LEN * 2 {
            return Err(Error::InvalidTxHash(s.to_string()));
        }
        let mut bytes = [0u8; TX_HASH_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| Error::InvalidTxHash(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.to_hex())
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Reference to an output of an earlier transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxInput {
    pub tx_hash: TxHash,
    pub index: u32,
}

/// An unspent output owned by the wallet, as reported by its `getUtxos` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Utxo {
    pub input: TxInput,
    pub address: Address,
    pub amount: Lovelace,
}
