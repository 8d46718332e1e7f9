// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{amount::Lovelace, Network};
use thiserror::Error;

/// Specialisation of `std::Result`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building, signing or submitting a payment.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Insufficient funds: {available} available, {required} required")]
    InsufficientFunds {
        available: Lovelace,
        required: Lovelace,
    },
    #[error("The signed transaction exposes no usable serialization")]
    SerializationUnsupported,
    #[error("Indexer rejected the transaction ({status}): {body}")]
    Submit { status: u16, body: String },
    #[error("Indexer request failed ({status}): {body}")]
    Indexer { status: u16, body: String },
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Output of {amount} is below the minimum of {minimum}")]
    OutputBelowMinimum { amount: Lovelace, minimum: Lovelace },
    #[error("Transaction of {size} bytes exceeds the maximum of {max} bytes")]
    TransactionTooLarge { size: usize, max: u64 },
    #[error("Invalid transaction hash: {0:?}")]
    InvalidTxHash(String),
    /// The indexer took the transaction, so it may be on chain, but no hash is known for it.
    #[error("Indexer accepted the transaction without a readable hash: {0:?}")]
    UnknownSubmittedHash(String),
    #[error("Address belongs to network id {found}, expected {expected}")]
    NetworkMismatch { expected: u8, found: u8 },
    #[error("Wallet could not sign the transaction: {0}")]
    Signing(String),
    #[error("Wallet error: {0}")]
    Wallet(String),
    #[error("Lovelace arithmetic overflowed")]
    NumericOverflow,
    #[error("Could not encode transaction: {0}")]
    Encoding(String),
    #[error("Unknown network {0:?}")]
    UnknownNetwork(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

impl Error {
    pub(crate) fn network_mismatch(expected: Network, found: u8) -> Self {
        Self::NetworkMismatch {
            expected: expected.network_id(),
            found,
        }
    }
}
