// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    address::Address, common::Utxo, serialization::SignedTransaction,
    transaction::UnsignedTransaction,
};
use async_trait::async_trait;
use serde::Serialize;
use std::{collections::BTreeSet, fmt, str::FromStr, sync::Arc};

/// Error reported by a wallet extension. The message is kept as the wallet wrote it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletApiError {
    /// The user dismissed the wallet's own consent or signing dialog.
    #[error("{0}")]
    Refused(String),
    #[error("{0}")]
    Failed(String),
}

/// The CIP-30 API object an enabled extension hands out.
#[async_trait]
pub trait WalletApi: Send + Sync {
    /// Address to send change to, usually hex encoded.
    async fn change_address(&self) -> Result<String, WalletApiError>;

    async fn utxos(&self) -> Result<Vec<Utxo>, WalletApiError>;

    /// May wait on the user for as long as they take.
    async fn sign_tx(
        &self,
        tx: &UnsignedTransaction,
    ) -> Result<Box<dyn SignedTransaction>, WalletApiError>;
}

/// An injected wallet extension, before the user granted access.
#[async_trait]
pub trait WalletExtension: Send + Sync {
    async fn enable(&self) -> Result<Arc<dyn WalletApi>, WalletApiError>;
}

/// Where extensions are discovered. The set can grow while the app runs as extensions
/// finish loading, so it is queried each time rather than cached.
pub trait ExtensionHost: Send + Sync {
    fn injected(&self) -> BTreeSet<String>;

    fn extension(&self, id: &str) -> Option<Arc<dyn WalletExtension>>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("{0} wallet not found. Please install it first.")]
    ProviderNotFound(String),
    #[error("Connection to {0} was rejected")]
    UserRejected(String),
    #[error("{0}")]
    ProviderError(String),
}

/// A connected wallet. Holds the signing capability, which only this crate can reach.
#[derive(Clone)]
pub struct WalletSession {
    provider: String,
    address: Address,
    api: Arc<dyn WalletApi>,
}

impl WalletSession {
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub(crate) fn api(&self) -> &dyn WalletApi {
        self.api.as_ref()
    }

    /// Read-only projection for display.
    pub fn view(&self) -> SessionView {
        SessionView {
            provider: self.provider.clone(),
            address: self.address.to_bech32(),
            connected: true,
        }
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("provider", &self.provider)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub provider: String,
    pub address: String,
    pub connected: bool,
}

/// Connects to wallet extensions found on an [`ExtensionHost`].
#[derive(Clone)]
pub struct WalletConnector {
    host: Arc<dyn ExtensionHost>,
}

impl WalletConnector {
    pub fn new(host: Arc<dyn ExtensionHost>) -> Self {
        Self { host }
    }

    pub fn list_available_providers(&self) -> BTreeSet<String> {
        self.host.injected()
    }

    /// Asks the named extension for access and reads its change address.
    ///
    /// Nothing is retained on failure.
    pub async fn connect(&self, provider_id: &str) -> Result<WalletSession, ConnectError> {
        if !self.host.injected().contains(provider_id) {
            warn!("Wallet {provider_id} is not injected");
            return Err(ConnectError::ProviderNotFound(provider_id.to_string()));
        }
        let extension = self
            .host
            .extension(provider_id)
            .ok_or_else(|| ConnectError::ProviderNotFound(provider_id.to_string()))?;

        info!("Requesting access to wallet {provider_id}");
        let api = extension.enable().await.map_err(|err| match err {
            WalletApiError::Refused(reason) => {
                info!("User rejected {provider_id}: {reason}");
                ConnectError::UserRejected(provider_id.to_string())
            }
            WalletApiError::Failed(message) => {
                error!("Wallet {provider_id} failed to enable: {message}");
                ConnectError::ProviderError(message)
            }
        })?;

        let raw_address = api
            .change_address()
            .await
            .map_err(|err| ConnectError::ProviderError(err.to_string()))?;
        let address = Address::from_str(&raw_address)
            .map_err(|err| ConnectError::ProviderError(err.to_string()))?;

        info!("Connected to {provider_id} as {}", address.abbreviate());
        Ok(WalletSession {
            provider: provider_id.to_string(),
            address,
            api,
        })
    }

    /// The bech32 form of the session's address, whatever encoding the wallet used.
    pub fn address(&self, session: &WalletSession) -> String {
        session.address.to_bech32()
    }
}

impl fmt::Debug for WalletConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConnector")
            .field("injected", &self.host.injected())
            .finish()
    }
}
