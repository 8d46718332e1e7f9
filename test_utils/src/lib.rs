// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

pub mod wallet;

use cardanolib::{Address, TxHash};

/// Length of a key hash credential.
const CREDENTIAL_LEN: usize = 28;

/// A preprod/preview base address whose credentials are all `fill`.
pub fn testnet_address(fill: u8) -> Address {
    base_address(0x00, fill)
}

/// A mainnet base address whose credentials are all `fill`.
pub fn mainnet_address(fill: u8) -> Address {
    base_address(0x01, fill)
}

fn base_address(header: u8, fill: u8) -> Address {
    let mut bytes = vec![header];
    bytes.extend([fill; 2 * CREDENTIAL_LEN]);
    match Address::from_bytes(bytes) {
        Ok(address) => address,
        Err(err) => panic!("base address with header {header:#04x} must be valid: {err}"),
    }
}

/// Deterministic transaction hash for fixtures.
pub fn tx_hash(seed: u8) -> TxHash {
    let mut bytes = [seed; 32];
    bytes[0] = 0xf0;
    TxHash::new(bytes)
}
