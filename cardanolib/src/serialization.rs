// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Getting raw bytes out of whatever a wallet hands back after signing.
//!
//! Wallet integrations disagree on how a signed transaction is exported. Some give bytes,
//! some a hex string, some a CBOR hex string. [`serialize`] probes these in a fixed order
//! and is the only place that knows about the differences.

use crate::{
    common::TxHash,
    error::{Error, Result},
    transaction,
};
use std::fmt::Debug;

/// Hex encoding used for wire payloads, handed to the [`ChainClient`](crate::chain::ChainClient)
/// instead of being assumed globally.
pub trait ByteCodec: Send + Sync + Debug {
    fn encode_hex(&self, bytes: &[u8]) -> String;
    fn decode_hex(&self, s: &str) -> Result<Vec<u8>>;
}

/// Lowercase hex, tolerant of a `0x` prefix and surrounding whitespace when decoding.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexCodec;

impl ByteCodec for HexCodec {
    fn encode_hex(&self, bytes: &[u8]) -> String {
        hex::encode(bytes)
    }

    fn decode_hex(&self, s: &str) -> Result<Vec<u8>> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(s).map_err(|err| Error::Encoding(err.to_string()))
    }
}

/// A transaction signed by a wallet.
///
/// Implementors override whichever exports they actually support.
pub trait SignedTransaction: Send + Sync + Debug {
    fn to_bytes(&self) -> Option<Vec<u8>> {
        None
    }

    fn to_hex(&self) -> Option<String> {
        None
    }

    fn to_cbor_hex(&self) -> Option<String> {
        None
    }
}

/// The export paths, in the order they are tried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportProbe {
    Bytes,
    Hex,
    CborHex,
}

pub const PROBE_ORDER: [ExportProbe; 3] = [ExportProbe::Bytes, ExportProbe::Hex, ExportProbe::CborHex];

/// Raw bytes of a signed transaction plus the probe that produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    pub bytes: Vec<u8>,
    pub probe: ExportProbe,
}

impl RawTransaction {
    /// Hash of the body inside the signed bytes, if they decode as a transaction.
    pub fn tx_hash(&self) -> Option<TxHash> {
        transaction::signed_tx_hash(&self.bytes)
    }
}

/// Returns the first non-empty export in [`PROBE_ORDER`].
///
/// A probe that yields nothing, yields an empty payload or yields undecodable hex is skipped.
/// Fails with [`Error::SerializationUnsupported`] once every probe has been tried.
pub fn serialize(signed: &dyn SignedTransaction, codec: &dyn ByteCodec) -> Result<RawTransaction> {
    for probe in PROBE_ORDER {
        let exported = match probe {
            ExportProbe::Bytes => signed.to_bytes(),
            ExportProbe::Hex => decode(signed.to_hex(), codec, probe),
            ExportProbe::CborHex => decode(signed.to_cbor_hex(), codec, probe),
        };
        match exported {
            Some(bytes) if !bytes.is_empty() => {
                debug!("Serialized signed transaction via {probe:?}");
                return Ok(RawTransaction { bytes, probe });
            }
            _ => trace!("Signed transaction has no usable {probe:?} export"),
        }
    }

    error!("Signed transaction exposes none of {PROBE_ORDER:?}");
    Err(Error::SerializationUnsupported)
}

fn decode(hex: Option<String>, codec: &dyn ByteCodec, probe: ExportProbe) -> Option<Vec<u8>> {
    let hex = hex?;
    match codec.decode_hex(&hex) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            warn!("Ignoring {probe:?} export: {err}");
            None
        }
    }
}
