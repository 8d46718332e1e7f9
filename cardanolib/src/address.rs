// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::error::{Error, Result};
use bech32::{Bech32, Hrp};
use std::{fmt, str::FromStr};

const MAINNET_ID: u8 = 1;
const KEY_HASH_LEN: usize = 28;
/// Header plus payment and stake credentials.
const BASE_ADDRESS_LEN: usize = 1 + 2 * KEY_HASH_LEN;
/// Header plus a single credential.
const SINGLE_CREDENTIAL_LEN: usize = 1 + KEY_HASH_LEN;

/// A Shelley era address.
///
/// Holds the raw bytes and the bech32 form derived from them. The human readable part is
/// picked from the header byte so that hex and bech32 inputs always render the same way.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Address {
    bytes: Vec<u8>,
    bech32: String,
}

impl Address {
    /// Validates the header and length of `bytes`.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let header = *bytes
            .first()
            .ok_or_else(|| Error::InvalidAddress("address is empty".to_string()))?;
        let kind = header >> 4;
        let len_ok = match kind {
            0..=3 => bytes.len() == BASE_ADDRESS_LEN,
            // pointer addresses carry variable length varints after the credential
            4 | 5 => bytes.len() > SINGLE_CREDENTIAL_LEN,
            6 | 7 | 14 | 15 => bytes.len() == SINGLE_CREDENTIAL_LEN,
            8 => {
                return Err(Error::InvalidAddress(
                    "byron addresses are not supported".to_string(),
                ))
            }
            _ => {
                return Err(Error::InvalidAddress(format!(
                    "unknown address type {kind}"
                )))
            }
        };
        if !len_ok {
            return Err(Error::InvalidAddress(format!(
                "type {kind} address has unexpected length {}",
                bytes.len()
            )));
        }

        let hrp = Hrp::parse(hrp_for_header(header))
            .map_err(|err| Error::InvalidAddress(err.to_string()))?;
        let bech32 = bech32::encode::<Bech32>(hrp, &bytes)
            .map_err(|err| Error::InvalidAddress(err.to_string()))?;

        Ok(Self { bytes, bech32 })
    }

    /// Parses an `addr`, `addr_test`, `stake` or `stake_test` string.
    ///
    /// The prefix must agree with what the header byte says.
    pub fn from_bech32(s: &str) -> Result<Self> {
        let (hrp, bytes) =
            bech32::decode(s.trim()).map_err(|err| Error::InvalidAddress(err.to_string()))?;
        let address = Self::from_bytes(bytes)?;
        let hrp = hrp.to_lowercase();
        let expected = hrp_for_header(address.header());
        if hrp != expected {
            return Err(Error::InvalidAddress(format!(
                "prefix {hrp:?} does not match address header, expected {expected:?}"
            )));
        }
        Ok(address)
    }

    /// Parses the hex encoding CIP-30 wallets hand out.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|err| Error::InvalidAddress(err.to_string()))?;
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bech32(&self) -> String {
        self.bech32.clone()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// `1` on mainnet, `0` on the test networks.
    pub fn network_id(&self) -> u8 {
        self.header() & 0x0f
    }

    pub fn is_stake_address(&self) -> bool {
        self.header() >> 4 >= 14
    }

    /// Shortened form for display, e.g. `addr_test1qz...k3j9d0xq`.
    pub fn abbreviate(&self) -> String {
        abbreviate(&self.bech32)
    }

    fn header(&self) -> u8 {
        // from_bytes rejects empty input
        self.bytes.first().copied().unwrap_or_default()
    }
}

fn hrp_for_header(header: u8) -> &'static str {
    let stake = header >> 4 >= 14;
    let mainnet = header & 0x0f == MAINNET_ID;
    match (stake, mainnet) {
        (false, true) => "addr",
        (false, false) => "addr_test",
        (true, true) => "stake",
        (true, false) => "stake_test",
    }
}

/// Keeps the first 12 and last 8 characters of long strings.
pub fn abbreviate(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 20 {
        return s.to_string();
    }
    let head: String = chars[..12].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{head}...{tail}")
}

impl FromStr for Address {
    type Err = Error;

    /// Accepts either bech32 or hex.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with("addr") || s.starts_with("stake") {
            Self::from_bech32(s)
        } else {
            Self::from_hex(s)
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bech32)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.bech32)
    }
}
