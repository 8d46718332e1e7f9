// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{
    state::{Phase, PaymentState},
    PaymentError, PaymentOutcome,
};
use cardanolib::{
    ChainClient, ExtensionHost, Network, PaymentRequest, SessionView, TxHash, WalletConnector,
};
use std::{collections::BTreeSet, fmt, sync::Arc};
use tokio::sync::watch;

const CONNECT: &str = "connect";
const PAY: &str = "pay";
const DISCONNECT: &str = "disconnect";

const CONNECT_INTERRUPTED: &str = "Connecting to the wallet was interrupted";
const PAYMENT_INTERRUPTED: &str =
    "Payment was interrupted. Check your wallet before paying again.";

/// Drives connect and pay for one wallet session.
///
/// At most one of connect or pay is in flight at any time: the transition into
/// `Connecting` or `Paying` is checked and applied in a single step, and any call
/// arriving while one is in flight is rejected with [`PaymentError::Busy`].
pub struct PaymentController {
    connector: WalletConnector,
    chain: ChainClient,
    request: PaymentRequest,
    phase: watch::Sender<Phase>,
}

impl PaymentController {
    pub fn new(host: Arc<dyn ExtensionHost>, chain: ChainClient, request: PaymentRequest) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            connector: WalletConnector::new(host),
            chain,
            request,
            phase,
        }
    }

    pub fn state(&self) -> PaymentState {
        self.phase.borrow().project()
    }

    pub fn subscribe(&self) -> StateWatcher {
        StateWatcher {
            phase: self.phase.subscribe(),
        }
    }

    pub fn session(&self) -> Option<SessionView> {
        self.phase.borrow().session().map(|session| session.view())
    }

    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    pub fn network(&self) -> Network {
        self.chain.network()
    }

    /// Queried afresh on every call, extensions may still be loading.
    pub fn list_available_providers(&self) -> BTreeSet<String> {
        self.connector.list_available_providers()
    }

    /// Allowed from `Idle` and `Failed`. A failed attempt leaves whatever session
    /// existed before it untouched.
    pub async fn connect(&self, provider_id: &str) -> Result<SessionView, PaymentError> {
        let mut previous = None;
        let mut rejected = None;
        let _ = self.phase.send_if_modified(|phase| {
            if !matches!(phase, Phase::Idle | Phase::Failed { .. }) {
                rejected = Some(rejection(CONNECT, phase));
                return false;
            }
            previous = phase.session().cloned();
            *phase = Phase::Connecting {
                provider: provider_id.to_string(),
            };
            true
        });
        if let Some(err) = rejected {
            debug!("Rejected connect to {provider_id}: {err}");
            return Err(err);
        }

        let in_flight = InFlight::new(
            &self.phase,
            Phase::Failed {
                session: previous.clone(),
                message: CONNECT_INTERRUPTED.to_string(),
            },
        );
        match self.connector.connect(provider_id).await {
            Ok(session) => {
                let view = session.view();
                in_flight.finish(Phase::Connected(session));
                Ok(view)
            }
            Err(err) => {
                warn!("Failed to connect to {provider_id}: {err}");
                in_flight.finish(Phase::Failed {
                    session: previous,
                    message: err.to_string(),
                });
                Err(PaymentError::Connect(err))
            }
        }
    }

    /// Allowed from `Connected`, and from `Failed` while a session is still held so a
    /// failed payment can be retried without reconnecting.
    ///
    /// Chain failures are not errors here: they come back as [`PaymentOutcome::Failure`]
    /// and leave the controller in `Failed` with the session kept.
    pub async fn pay(&self) -> Result<PaymentOutcome, PaymentError> {
        let mut session = None;
        let mut rejected = None;
        let _ = self.phase.send_if_modified(|phase| {
            let current = match &*phase {
                Phase::Connected(current)
                | Phase::Failed {
                    session: Some(current),
                    ..
                } => current.clone(),
                other => {
                    rejected = Some(rejection(PAY, other));
                    return false;
                }
            };
            *phase = Phase::Paying(current.clone());
            session = Some(current);
            true
        });
        if let Some(err) = rejected {
            debug!("Rejected payment: {err}");
            return Err(err);
        }
        let Some(session) = session else {
            return Err(PaymentError::NotConnected);
        };

        let in_flight = InFlight::new(
            &self.phase,
            Phase::Failed {
                session: Some(session.clone()),
                message: PAYMENT_INTERRUPTED.to_string(),
            },
        );
        info!(
            "Paying {} to {} from {}",
            self.request.amount(),
            self.request.recipient().abbreviate(),
            session.provider()
        );
        match self.chain.pay(&session, &self.request).await {
            Ok(tx_hash) => {
                info!("Payment submitted as {tx_hash}");
                in_flight.finish(Phase::Succeeded { session, tx_hash });
                Ok(PaymentOutcome::Success { tx_hash })
            }
            Err(err) => {
                let message = err.to_string();
                error!("Payment failed: {message}");
                in_flight.finish(Phase::Failed {
                    session: Some(session),
                    message: message.clone(),
                });
                Ok(PaymentOutcome::Failure { message })
            }
        }
    }

    /// `Failed` goes back to `Connected` when a session is held, else to `Idle`.
    /// Anywhere else this does nothing. Returns whether the state changed.
    pub fn clear_error(&self) -> bool {
        self.phase.send_if_modified(|phase| {
            if !matches!(phase, Phase::Failed { .. }) {
                return false;
            }
            if let Phase::Failed { session, .. } = std::mem::replace(phase, Phase::Idle) {
                *phase = session.map_or(Phase::Idle, Phase::Connected);
            }
            true
        })
    }

    /// Takes the hash out of `Succeeded`, returning to `Connected`. Only the first call
    /// after a success gets it.
    pub fn acknowledge(&self) -> Option<TxHash> {
        let mut acknowledged = None;
        let _ = self.phase.send_if_modified(|phase| {
            if !matches!(phase, Phase::Succeeded { .. }) {
                return false;
            }
            if let Phase::Succeeded { session, tx_hash } = std::mem::replace(phase, Phase::Idle) {
                acknowledged = Some(tx_hash);
                *phase = Phase::Connected(session);
            }
            true
        });
        acknowledged
    }

    /// Drops the session. Refused while connecting or paying.
    pub fn disconnect(&self) -> Result<(), PaymentError> {
        let mut rejected = None;
        let _ = self.phase.send_if_modified(|phase| {
            if phase.is_busy() {
                rejected = Some(rejection(DISCONNECT, phase));
                return false;
            }
            let changed = !matches!(phase, Phase::Idle);
            *phase = Phase::Idle;
            changed
        });
        match rejected {
            Some(err) => Err(err),
            None => {
                info!("Wallet disconnected");
                Ok(())
            }
        }
    }
}

impl fmt::Debug for PaymentController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentController")
            .field("state", &self.phase.borrow().name())
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

fn rejection(action: &'static str, phase: &Phase) -> PaymentError {
    match phase {
        Phase::Connecting { .. } | Phase::Paying(_) => PaymentError::Busy {
            action,
            state: phase.name(),
        },
        Phase::Idle | Phase::Failed { session: None, .. } if action == PAY => {
            PaymentError::NotConnected
        }
        _ => PaymentError::InvalidTransition {
            action,
            state: phase.name(),
        },
    }
}

/// Receives every state change of a [`PaymentController`].
pub struct StateWatcher {
    phase: watch::Receiver<Phase>,
}

impl StateWatcher {
    pub fn current(&self) -> PaymentState {
        self.phase.borrow().project()
    }

    /// Waits for the next change. `None` once the controller is gone.
    pub async fn changed(&mut self) -> Option<PaymentState> {
        self.phase.changed().await.ok()?;
        Some(self.phase.borrow_and_update().project())
    }
}

/// Puts the controller into a fallback state if a connect or pay future is dropped
/// before it finishes, so the state never stays busy.
struct InFlight<'a> {
    phase: &'a watch::Sender<Phase>,
    fallback: Option<Phase>,
}

impl<'a> InFlight<'a> {
    fn new(phase: &'a watch::Sender<Phase>, fallback: Phase) -> Self {
        Self {
            phase,
            fallback: Some(fallback),
        }
    }

    fn finish(mut self, next: Phase) {
        self.fallback = None;
        let _ = self.phase.send_replace(next);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(fallback) = self.fallback.take() {
            warn!("{} abandoned before completion", self.phase.borrow().name());
            let _ = self.phase.send_replace(fallback);
        }
    }
}
