// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use cardanolib::{SessionView, TxHash, WalletSession};
use serde::Serialize;

/// Controller state as the UI sees it. The wallet is a read-only projection; the
/// signing capability never leaves the controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PaymentState {
    Idle,
    Connecting {
        provider: String,
    },
    Connected {
        wallet: SessionView,
    },
    Paying {
        wallet: SessionView,
    },
    Succeeded {
        wallet: SessionView,
        #[serde(rename = "txHash")]
        tx_hash: TxHash,
    },
    Failed {
        wallet: Option<SessionView>,
        message: String,
    },
}

impl PaymentState {
    pub fn name(&self) -> &'static str {
        match self {
            PaymentState::Idle => IDLE,
            PaymentState::Connecting { .. } => CONNECTING,
            PaymentState::Connected { .. } => CONNECTED,
            PaymentState::Paying { .. } => PAYING,
            PaymentState::Succeeded { .. } => SUCCEEDED,
            PaymentState::Failed { .. } => FAILED,
        }
    }

    pub fn wallet(&self) -> Option<&SessionView> {
        match self {
            PaymentState::Idle | PaymentState::Connecting { .. } => None,
            PaymentState::Connected { wallet }
            | PaymentState::Paying { wallet }
            | PaymentState::Succeeded { wallet, .. } => Some(wallet),
            PaymentState::Failed { wallet, .. } => wallet.as_ref(),
        }
    }

    /// Connecting or paying.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PaymentState::Connecting { .. } | PaymentState::Paying { .. }
        )
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PaymentState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            PaymentState::Succeeded { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}

const IDLE: &str = "idle";
const CONNECTING: &str = "connecting";
const CONNECTED: &str = "connected";
const PAYING: &str = "paying";
const SUCCEEDED: &str = "succeeded";
const FAILED: &str = "failed";

/// What the controller actually holds, session included.
#[derive(Clone)]
pub(super) enum Phase {
    Idle,
    Connecting { provider: String },
    Connected(WalletSession),
    Paying(WalletSession),
    Succeeded {
        session: WalletSession,
        tx_hash: TxHash,
    },
    Failed {
        session: Option<WalletSession>,
        message: String,
    },
}

impl Phase {
    pub(super) fn name(&self) -> &'static str {
        match self {
            Phase::Idle => IDLE,
            Phase::Connecting { .. } => CONNECTING,
            Phase::Connected(_) => CONNECTED,
            Phase::Paying(_) => PAYING,
            Phase::Succeeded { .. } => SUCCEEDED,
            Phase::Failed { .. } => FAILED,
        }
    }

    pub(super) fn session(&self) -> Option<&WalletSession> {
        match self {
            Phase::Idle | Phase::Connecting { .. } => None,
            Phase::Connected(session)
            | Phase::Paying(session)
            | Phase::Succeeded { session, .. } => Some(session),
            Phase::Failed { session, .. } => session.as_ref(),
        }
    }

    pub(super) fn is_busy(&self) -> bool {
        matches!(self, Phase::Connecting { .. } | Phase::Paying(_))
    }

    pub(super) fn project(&self) -> PaymentState {
        match self {
            Phase::Idle => PaymentState::Idle,
            Phase::Connecting { provider } => PaymentState::Connecting {
                provider: provider.clone(),
            },
            Phase::Connected(session) => PaymentState::Connected {
                wallet: session.view(),
            },
            Phase::Paying(session) => PaymentState::Paying {
                wallet: session.view(),
            },
            Phase::Succeeded { session, tx_hash } => PaymentState::Succeeded {
                wallet: session.view(),
                tx_hash: *tx_hash,
            },
            Phase::Failed { session, message } => PaymentState::Failed {
                wallet: session.as_ref().map(WalletSession::view),
                message: message.clone(),
            },
        }
    }
}
