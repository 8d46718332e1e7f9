// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Connecting a wallet and paying for a note.

mod controller;
mod modal;
mod state;

pub use controller::{PaymentController, StateWatcher};
pub use modal::{ModalStep, PaymentModal};
pub use state::PaymentState;

use cardanolib::{ConnectError, TxHash};
use serde::Serialize;

/// Result of one payment attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum PaymentOutcome {
    Success {
        #[serde(rename = "txHash")]
        tx_hash: TxHash,
    },
    Failure {
        message: String,
    },
}

impl PaymentOutcome {
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            PaymentOutcome::Success { tx_hash } => Some(*tx_hash),
            PaymentOutcome::Failure { .. } => None,
        }
    }
}

/// Why the controller refused an action. Failures of an accepted action end up in
/// [`PaymentState::Failed`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Cannot {action} while {state}")]
    Busy {
        action: &'static str,
        state: &'static str,
    },
    #[error("Connect a wallet before paying")]
    NotConnected,
    #[error("No wallet selected")]
    NoWalletSelected,
    #[error("Cannot {action} when {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error(transparent)]
    Connect(#[from] ConnectError),
}
