// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Number of lovelace in one ada.
pub const LOVELACE_PER_ADA: u64 = 1_000_000;

/// An amount of lovelace, the smallest unit of ada.
///
/// Amounts are whole numbers only. Parsing never goes through floating point and
/// rejects anything that is not a plain run of ASCII digits.
#[derive(
    Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Lovelace(u64);

impl Lovelace {
    pub const ZERO: Self = Self(0);

    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Like `checked_add` but reports overflow as an error.
    pub fn try_add(self, rhs: Self) -> Result<Self> {
        self.checked_add(rhs).ok_or(Error::NumericOverflow)
    }

    /// Formats the amount as ada with all six decimals, e.g. `2.000000`.
    pub fn to_ada_string(self) -> String {
        let whole = self.0 / LOVELACE_PER_ADA;
        let fraction = self.0 % LOVELACE_PER_ADA;
        format!("{whole}.{fraction:06}")
    }
}

impl From<u64> for Lovelace {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for Lovelace {
    type Err = Error;

    fn from_str(value_str: &str) -> Result<Self> {
        let value_str = value_str.trim();
        if value_str.is_empty() {
            return Err(Error::InvalidAmount("amount is empty".to_string()));
        }
        // checked before parsing so that "1.0" is never read as one
        if value_str.contains(['.', ',']) {
            return Err(Error::InvalidAmount(format!(
                "{value_str:?} is not a whole number of lovelace"
            )));
        }
        if !value_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAmount(format!(
                "{value_str:?} contains characters other than digits"
            )));
        }

        value_str
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::InvalidAmount(format!("{value_str:?} does not fit in 64 bits")))
    }
}

impl Display for Lovelace {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
