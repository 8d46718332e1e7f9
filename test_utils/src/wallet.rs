// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use async_trait::async_trait;
use cardanolib::{
    Address, ByteCodec, ExtensionHost, HexCodec, Lovelace, SignedTransaction, TxInput,
    UnsignedTransaction, Utxo, WalletApi, WalletApiError, WalletExtension,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use tokio::sync::Notify;

/// How a fake extension answers `enable()`.
#[derive(Clone)]
pub enum EnableBehaviour {
    Grant(Arc<FakeWallet>),
    /// The user closes the consent popup.
    Refuse,
    Fail(String),
}

/// How a fake wallet answers `signTx`.
#[derive(Clone, Debug)]
pub enum SignBehaviour {
    /// Signed tx only offers a cbor hex export.
    CborHex,
    /// Signed tx offers raw bytes.
    Bytes,
    /// Signed tx offers no export at all.
    Opaque,
    Decline,
    Fail(String),
}

/// Signed transaction whose exports are picked by [`SignBehaviour`].
#[derive(Debug)]
pub struct FakeSignedTx {
    bytes: Option<Vec<u8>>,
    cbor_hex: Option<String>,
}

impl SignedTransaction for FakeSignedTx {
    fn to_bytes(&self) -> Option<Vec<u8>> {
        self.bytes.clone()
    }

    fn to_cbor_hex(&self) -> Option<String> {
        self.cbor_hex.clone()
    }
}

/// Wallet with a fixed UTXO set that hands out its change address as hex.
///
/// Signing can be held back with [`FakeWallet::hold_signatures`] to keep a payment in flight.
pub struct FakeWallet {
    address: Address,
    utxos: Vec<Utxo>,
    sign: SignBehaviour,
    release: Option<Arc<Notify>>,
    signing_started: Arc<Notify>,
    sign_calls: AtomicUsize,
}

impl FakeWallet {
    /// A wallet owning one UTXO per entry of `amounts`.
    pub fn with_funds(address: Address, amounts: &[u64]) -> Self {
        let utxos = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| Utxo {
                input: TxInput {
                    tx_hash: crate::tx_hash(i as u8),
                    index: i as u32,
                },
                address: address.clone(),
                amount: Lovelace::from_u64(*amount),
            })
            .collect();
        Self {
            address,
            utxos,
            sign: SignBehaviour::CborHex,
            release: None,
            signing_started: Arc::new(Notify::new()),
            sign_calls: AtomicUsize::new(0),
        }
    }

    pub fn sign_with(mut self, sign: SignBehaviour) -> Self {
        self.sign = sign;
        self
    }

    /// Every `sign_tx` waits until the returned handle is notified.
    pub fn hold_signatures(&mut self) -> Arc<Notify> {
        let release = Arc::new(Notify::new());
        self.release = Some(Arc::clone(&release));
        release
    }

    /// Notified each time `sign_tx` is entered.
    pub fn signing_started(&self) -> Arc<Notify> {
        Arc::clone(&self.signing_started)
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }
}

#[async_trait]
impl WalletApi for FakeWallet {
    async fn change_address(&self) -> Result<String, WalletApiError> {
        Ok(self.address.to_hex())
    }

    async fn utxos(&self) -> Result<Vec<Utxo>, WalletApiError> {
        Ok(self.utxos.clone())
    }

    async fn sign_tx(
        &self,
        tx: &UnsignedTransaction,
    ) -> Result<Box<dyn SignedTransaction>, WalletApiError> {
        let _ = self.sign_calls.fetch_add(1, Ordering::SeqCst);
        self.signing_started.notify_one();
        if let Some(release) = &self.release {
            release.notified().await;
        }

        let cbor = tx
            .to_cbor()
            .map_err(|err| WalletApiError::Failed(err.to_string()))?;
        let signed = match &self.sign {
            SignBehaviour::CborHex => FakeSignedTx {
                bytes: None,
                cbor_hex: Some(HexCodec.encode_hex(&cbor)),
            },
            SignBehaviour::Bytes => FakeSignedTx {
                bytes: Some(cbor),
                cbor_hex: None,
            },
            SignBehaviour::Opaque => FakeSignedTx {
                bytes: None,
                cbor_hex: None,
            },
            SignBehaviour::Decline => {
                return Err(WalletApiError::Refused("user declined sign tx".to_string()))
            }
            SignBehaviour::Fail(message) => return Err(WalletApiError::Failed(message.clone())),
        };
        Ok(Box::new(signed))
    }
}

/// An injected extension.
pub struct FakeExtension {
    behaviour: EnableBehaviour,
    enable_calls: AtomicUsize,
}

impl FakeExtension {
    pub fn enable_calls(&self) -> usize {
        self.enable_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletExtension for FakeExtension {
    async fn enable(&self) -> Result<Arc<dyn WalletApi>, WalletApiError> {
        let _ = self.enable_calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            EnableBehaviour::Grant(wallet) => {
                let api: Arc<dyn WalletApi> = Arc::<FakeWallet>::clone(wallet);
                Ok(api)
            }
            EnableBehaviour::Refuse => {
                Err(WalletApiError::Refused("user declined access".to_string()))
            }
            EnableBehaviour::Fail(message) => Err(WalletApiError::Failed(message.clone())),
        }
    }
}

/// Stand-in for the page's `window.cardano` object. Extensions can be injected at any time.
#[derive(Default)]
pub struct FakeExtensionHost {
    extensions: Mutex<BTreeMap<String, Arc<FakeExtension>>>,
}

impl FakeExtensionHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects an extension that grants access to `wallet`.
    pub fn inject(&self, id: &str, wallet: Arc<FakeWallet>) -> Arc<FakeExtension> {
        self.inject_with(id, EnableBehaviour::Grant(wallet))
    }

    pub fn inject_with(&self, id: &str, behaviour: EnableBehaviour) -> Arc<FakeExtension> {
        let extension = Arc::new(FakeExtension {
            behaviour,
            enable_calls: AtomicUsize::new(0),
        });
        if let Ok(mut extensions) = self.extensions.lock() {
            let _ = extensions.insert(id.to_string(), Arc::clone(&extension));
        }
        extension
    }
}

impl ExtensionHost for FakeExtensionHost {
    fn injected(&self) -> BTreeSet<String> {
        self.extensions
            .lock()
            .map(|extensions| extensions.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn extension(&self, id: &str) -> Option<Arc<dyn WalletExtension>> {
        let extensions = self.extensions.lock().ok()?;
        let extension = extensions.get(id)?;
        let extension: Arc<dyn WalletExtension> = Arc::<FakeExtension>::clone(extension);
        Some(extension)
    }
}
