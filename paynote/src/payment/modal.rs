// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{PaymentController, PaymentError, PaymentOutcome, PaymentState};
use cardanolib::{address::abbreviate, SessionView, TxHash};
use serde::Serialize;
use std::{collections::BTreeSet, sync::Arc};

/// Offered first when injected.
const PREFERRED_WALLET: &str = "lace";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalStep {
    Connect,
    Pay,
    Processing,
    Success,
    Error,
}

/// What the payment dialog shows and which of its buttons work, derived from the
/// controller state on every read.
pub struct PaymentModal {
    controller: Arc<PaymentController>,
    providers: BTreeSet<String>,
    selected: Option<String>,
}

impl PaymentModal {
    pub fn new(controller: Arc<PaymentController>) -> Self {
        let mut modal = Self {
            controller,
            providers: BTreeSet::new(),
            selected: None,
        };
        modal.refresh_providers();
        modal
    }

    /// Re-reads the injected wallets, keeping the selection when it is still there.
    pub fn refresh_providers(&mut self) -> &BTreeSet<String> {
        self.providers = self.controller.list_available_providers();
        let still_there = self
            .selected
            .as_ref()
            .is_some_and(|selected| self.providers.contains(selected));
        if !still_there {
            self.selected = if self.providers.contains(PREFERRED_WALLET) {
                Some(PREFERRED_WALLET.to_string())
            } else {
                self.providers.iter().next().cloned()
            };
        }
        &self.providers
    }

    pub fn providers(&self) -> &BTreeSet<String> {
        &self.providers
    }

    pub fn selected_wallet(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Ignored for wallets that are not injected.
    pub fn select_wallet(&mut self, provider_id: &str) -> bool {
        if !self.providers.contains(provider_id) {
            return false;
        }
        self.selected = Some(provider_id.to_string());
        true
    }

    pub fn state(&self) -> PaymentState {
        self.controller.state()
    }

    pub fn step(&self) -> ModalStep {
        step_for(&self.controller.state())
    }

    /// Closing is refused while a payment is in flight and once it succeeded, where
    /// [`PaymentModal::complete`] is the way out.
    pub fn can_cancel(&self) -> bool {
        !matches!(self.step(), ModalStep::Processing | ModalStep::Success)
    }

    pub fn connect_enabled(&self) -> bool {
        matches!(self.controller.state(), PaymentState::Idle) && self.selected.is_some()
    }

    pub fn pay_enabled(&self) -> bool {
        matches!(self.controller.state(), PaymentState::Connected { .. })
    }

    pub async fn connect(&self) -> Result<SessionView, PaymentError> {
        let provider = self
            .selected
            .as_deref()
            .ok_or(PaymentError::NoWalletSelected)?;
        self.controller.connect(provider).await
    }

    pub async fn pay(&self) -> Result<PaymentOutcome, PaymentError> {
        self.controller.pay().await
    }

    /// "Try again": back to paying when a wallet is still connected, else to choosing one.
    pub fn retry(&self) -> ModalStep {
        let _ = self.controller.clear_error();
        self.step()
    }

    /// Closes the dialog. Returns false when closing is not allowed right now.
    pub fn cancel(&self) -> bool {
        if !self.can_cancel() {
            return false;
        }
        let _ = self.controller.clear_error();
        true
    }

    /// Hands the transaction hash to the caller once; later calls get `None`.
    pub fn complete(&self) -> Option<TxHash> {
        self.controller.acknowledge()
    }

    /// `first12...last8` of the connected address.
    pub fn wallet_address(&self) -> Option<String> {
        self.controller
            .session()
            .map(|session| abbreviate(&session.address))
    }

    pub fn recipient(&self) -> String {
        self.controller.request().recipient().abbreviate()
    }

    /// e.g. `2.000000 ADA`
    pub fn amount(&self) -> String {
        format!("{} ADA", self.controller.request().amount().to_ada_string())
    }

    pub fn error_message(&self) -> Option<String> {
        self.controller.state().error_message().map(str::to_string)
    }

    pub fn explorer_url(&self) -> Option<String> {
        let tx_hash = self.controller.state().tx_hash()?;
        Some(self.controller.network().explorer_tx_url(&tx_hash))
    }
}

fn step_for(state: &PaymentState) -> ModalStep {
    match state {
        PaymentState::Idle | PaymentState::Connecting { .. } => ModalStep::Connect,
        PaymentState::Connected { .. } => ModalStep::Pay,
        PaymentState::Paying { .. } => ModalStep::Processing,
        PaymentState::Succeeded { .. } => ModalStep::Success,
        PaymentState::Failed { .. } => ModalStep::Error,
    }
}
