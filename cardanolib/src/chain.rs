// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    address::Address,
    common::TxHash,
    error::{Error, Result},
    indexer::{Accepted, IndexerClient, TxStatus},
    parameters::{self, FetchedParameters},
    serialization::{self, ByteCodec, RawTransaction},
    transaction::{self, PaymentRequest, UnsignedTransaction},
    wallet::{WalletApiError, WalletSession},
    Network,
};
use std::{str::FromStr, sync::Arc};

/// Builds, signs and submits payments against one network's indexer.
#[derive(Clone, Debug)]
pub struct ChainClient {
    indexer: IndexerClient,
    codec: Arc<dyn ByteCodec>,
    network: Network,
}

impl ChainClient {
    /// `codec` is used for every hex conversion the client performs.
    pub fn new(indexer: IndexerClient, codec: Arc<dyn ByteCodec>, network: Network) -> Self {
        Self {
            indexer,
            codec,
            network,
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn indexer(&self) -> &IndexerClient {
        &self.indexer
    }

    /// Never fails: whatever the indexer omits, or the whole table when it cannot be
    /// reached, comes from the defaults. The defaulted fields are listed on the result.
    pub async fn fetch_protocol_parameters(&self) -> FetchedParameters {
        let fetched = match self.indexer.protocol_parameters().await {
            Ok(response) => parameters::normalize(&response),
            Err(err) => {
                warn!("Could not fetch protocol parameters, using defaults: {err}");
                return FetchedParameters::all_defaults();
            }
        };
        if fetched.is_degraded() {
            warn!(
                "Indexer omitted protocol parameters {:?}, defaults applied",
                fetched.defaulted
            );
        }
        fetched
    }

    /// Balances a payment from the session's UTXOs, sending change back to the wallet.
    pub async fn build_payment(
        &self,
        session: &WalletSession,
        request: &PaymentRequest,
    ) -> Result<UnsignedTransaction> {
        if request.network() != self.network {
            return Err(Error::network_mismatch(
                self.network,
                request.network().network_id(),
            ));
        }

        let params = self.fetch_protocol_parameters().await.params;
        let api = session.api();
        let utxos = api.utxos().await.map_err(wallet_error)?;
        let change_address = match api.change_address().await {
            Ok(raw) => Address::from_str(&raw)?,
            Err(err) => {
                debug!("Change address unavailable ({err}), using the session address");
                session.address().clone()
            }
        };
        if change_address.network_id() != self.network.network_id() {
            return Err(Error::network_mismatch(
                self.network,
                change_address.network_id(),
            ));
        }

        debug!(
            "Building payment of {} to {} from {} utxo(s)",
            request.amount(),
            request.recipient().abbreviate(),
            utxos.len()
        );
        transaction::build_payment(utxos, request, &change_address, &params)
    }

    /// Asks the wallet to sign and extracts the raw bytes through the export probes.
    pub async fn sign(
        &self,
        session: &WalletSession,
        tx: &UnsignedTransaction,
    ) -> Result<RawTransaction> {
        info!("Requesting signature from {}", session.provider());
        let signed = session.api().sign_tx(tx).await.map_err(|err| match err {
            WalletApiError::Refused(reason) => {
                Error::Signing(format!("signing was declined: {reason}"))
            }
            WalletApiError::Failed(message) => Error::Signing(message),
        })?;
        serialization::serialize(signed.as_ref(), self.codec.as_ref())
    }

    /// Posts the raw bytes straight to the indexer's submit endpoint.
    ///
    /// The hash comes from the signed body itself. What the indexer answers is only cross-checked.
    pub async fn submit(&self, signed: &RawTransaction) -> Result<TxHash> {
        self.submit_expecting(signed, None).await
    }

    /// Build, sign and submit in one go.
    pub async fn pay(&self, session: &WalletSession, request: &PaymentRequest) -> Result<TxHash> {
        let unsigned = self.build_payment(session, request).await?;
        let signed = self.sign(session, &unsigned).await?;
        self.submit_expecting(&signed, Some(unsigned.tx_hash())).await
    }

    async fn submit_expecting(
        &self,
        signed: &RawTransaction,
        built: Option<TxHash>,
    ) -> Result<TxHash> {
        trace!(
            "Submitting signed transaction {}",
            self.codec.encode_hex(&signed.bytes)
        );
        let accepted = self.indexer.submit_tx(signed.bytes.clone()).await?;
        let tx_hash = submitted_hash(signed.tx_hash().or(built), accepted)?;
        info!("Transaction {tx_hash} submitted");
        Ok(tx_hash)
    }

    /// A successful submit only means the indexer accepted the transaction.
    pub async fn transaction_status(&self, tx_hash: &TxHash) -> Result<TxStatus> {
        self.indexer.transaction_status(tx_hash).await
    }
}

/// The locally computed hash wins, the indexer's answer is the fallback.
fn submitted_hash(local: Option<TxHash>, accepted: Accepted) -> Result<TxHash> {
    match (local, accepted.reported) {
        (Some(local), Some(reported)) if local != reported => {
            warn!("Indexer reported {reported} for transaction {local}, keeping {local}");
            Ok(local)
        }
        (Some(local), _) => Ok(local),
        (None, Some(reported)) => Ok(reported),
        (None, None) => Err(Error::UnknownSubmittedHash(accepted.body)),
    }
}

fn wallet_error(err: WalletApiError) -> Error {
    Error::Wallet(err.to_string())
}
