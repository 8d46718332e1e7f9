// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    api::{self, NotesApi, NotesClient, UsersClient},
    config::{ClientConfig, ConfigError, PaymentConfig},
    notes::{NoteSaveCoordinator, NoteWorkspace},
    payment::PaymentController,
};
use cardanolib::{ChainClient, ExtensionHost, Network};
use std::sync::Arc;

/// Entry point tying the notes backend to the chain.
///
/// # Example
///
/// ```no_run
/// # use paynote::Client;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::from_env()?;
/// let notes = client.notes().list_by_user(3).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    notes: Arc<NotesClient>,
    users: UsersClient,
    chain: ChainClient,
}

/// Error returned while setting up a [`Client`] or its payment controller.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] api::Error),
    #[error(transparent)]
    Chain(#[from] cardanolib::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Payments are configured for {payment} but the chain client uses {chain}")]
    NetworkMismatch { payment: Network, chain: Network },
}

impl Client {
    pub fn new(config: &ClientConfig, chain: ChainClient) -> Result<Self, ClientError> {
        info!(
            "Using notes backend {} and {}",
            config.notes_api_url,
            chain.network()
        );
        Ok(Self {
            notes: Arc::new(NotesClient::new(&config.notes_api_url)?),
            users: UsersClient::new(&config.notes_api_url)?,
            chain,
        })
    }

    /// Backend and chain settings from the environment, see [`crate::config`].
    pub fn from_env() -> Result<Self, ClientError> {
        let chain = cardanolib::utils::chain_client_from_env()?;
        Self::new(&ClientConfig::from_env(), chain)
    }

    pub fn notes(&self) -> Arc<dyn NotesApi> {
        Arc::<NotesClient>::clone(&self.notes)
    }

    pub fn users(&self) -> &UsersClient {
        &self.users
    }

    pub fn chain(&self) -> &ChainClient {
        &self.chain
    }

    /// Fails when the payment targets a different network than the chain client.
    pub fn payment_controller(
        &self,
        host: Arc<dyn ExtensionHost>,
        payment: &PaymentConfig,
    ) -> Result<PaymentController, ClientError> {
        let request = payment.request()?;
        if request.network() != self.chain.network() {
            return Err(ClientError::NetworkMismatch {
                payment: request.network(),
                chain: self.chain.network(),
            });
        }
        Ok(PaymentController::new(host, self.chain.clone(), request))
    }

    pub fn save_coordinator(&self, user_id: u64) -> NoteSaveCoordinator {
        NoteSaveCoordinator::new(self.notes(), user_id)
    }

    pub async fn workspace(&self, user_id: u64) -> Result<NoteWorkspace, api::Error> {
        NoteWorkspace::load(self.notes.as_ref(), user_id).await
    }
}
