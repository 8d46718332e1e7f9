// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use assert_matches::assert_matches;
use async_trait::async_trait;
use cardanolib::{
    serialization::ExportProbe,
    transaction::{fee_for_size, signed_tx_hash},
    Address, ChainClient, ConnectError,
    Error, ExtensionHost, HexCodec, IndexerClient, Lovelace, Network, PaymentRequest,
    ProtocolParameters, SignedTransaction, TxHash, TxInput, UnsignedTransaction, Utxo, WalletApi,
    WalletApiError, WalletConnector, WalletExtension, WalletSession,
};
use color_eyre::{eyre::eyre, Result};
use mockall::mock;
use serde_json::json;
use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const SUBMITTED: &str = "0b9d3c1f6a5e4d3c2b1a09f8e7d6c5b4a39281706f5e4d3c2b1a0f9e8d7c6b5a";

mock! {
    pub Wallet {}

    #[async_trait]
    impl WalletApi for Wallet {
        async fn change_address(&self) -> Result<String, WalletApiError>;
        async fn utxos(&self) -> Result<Vec<Utxo>, WalletApiError>;
        async fn sign_tx(
            &self,
            tx: &UnsignedTransaction,
        ) -> Result<Box<dyn SignedTransaction>, WalletApiError>;
    }
}

#[derive(Debug)]
struct CborOnly(String);

impl SignedTransaction for CborOnly {
    fn to_cbor_hex(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[derive(Debug)]
struct Opaque;

impl SignedTransaction for Opaque {}

struct SingleExtension {
    id: String,
    api: Arc<MockWallet>,
}

#[async_trait]
impl WalletExtension for SingleExtension {
    async fn enable(&self) -> Result<Arc<dyn WalletApi>, WalletApiError> {
        let api: Arc<dyn WalletApi> = Arc::<MockWallet>::clone(&self.api);
        Ok(api)
    }
}

impl ExtensionHost for SingleExtension {
    fn injected(&self) -> BTreeSet<String> {
        BTreeSet::from([self.id.clone()])
    }

    fn extension(&self, id: &str) -> Option<Arc<dyn WalletExtension>> {
        (id == self.id).then(|| {
            let extension: Arc<dyn WalletExtension> = Arc::new(SingleExtension {
                id: self.id.clone(),
                api: Arc::clone(&self.api),
            });
            extension
        })
    }
}

fn testnet_address(fill: u8) -> Result<Address> {
    let mut bytes = vec![0x00];
    bytes.extend([fill; 56]);
    Ok(Address::from_bytes(bytes)?)
}

fn wallet_with_funds(amounts: &[u64]) -> Result<MockWallet> {
    let owner = testnet_address(0x11)?;
    let owner_hex = owner.to_hex();
    let utxos: Vec<Utxo> = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| Utxo {
            input: TxInput {
                tx_hash: TxHash::new([i as u8 + 1; 32]),
                index: 0,
            },
            address: owner.clone(),
            amount: Lovelace::from_u64(*amount),
        })
        .collect();

    let mut wallet = MockWallet::new();
    wallet
        .expect_change_address()
        .returning(move || Ok(owner_hex.clone()));
    wallet.expect_utxos().returning(move || Ok(utxos.clone()));
    Ok(wallet)
}

async fn connect(wallet: MockWallet) -> Result<WalletSession> {
    let host = Arc::new(SingleExtension {
        id: "lace".to_string(),
        api: Arc::new(wallet),
    });
    let connector = WalletConnector::new(host);
    Ok(connector.connect("lace").await?)
}

async fn indexer_with_params(params: serde_json::Value) -> Result<(MockServer, ChainClient)> {
    indexer_answering(params, format!("\"{SUBMITTED}\"")).await
}

async fn indexer_answering(
    params: serde_json::Value,
    submit_answer: String,
) -> Result<(MockServer, ChainClient)> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/epochs/latest/parameters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(params))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tx/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(submit_answer))
        .mount(&server)
        .await;

    let indexer = IndexerClient::new(&server.uri(), "preprodTestKey")?;
    let client = ChainClient::new(indexer, Arc::new(HexCodec), Network::Preprod);
    Ok((server, client))
}

fn payment_request(amount: u64) -> Result<PaymentRequest> {
    Ok(PaymentRequest::new(
        testnet_address(0xaa)?,
        Lovelace::from_u64(amount),
        Network::Preprod,
    )?)
}

fn wallet_echoing_the_unsigned_tx() -> Result<MockWallet> {
    let mut wallet = wallet_with_funds(&[10_000_000])?;
    wallet
        .expect_sign_tx()
        .times(1)
        .returning(|tx| {
            let hex = tx.to_cbor_hex().map_err(|err| WalletApiError::Failed(err.to_string()))?;
            let signed: Box<dyn SignedTransaction> = Box::new(CborOnly(hex));
            Ok(signed)
        });
    Ok(wallet)
}

async fn submitted_bodies(server: &MockServer) -> Vec<Vec<u8>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == "/tx/submit")
        .map(|request| request.body)
        .collect()
}

#[tokio::test]
async fn pay_builds_signs_and_submits() -> Result<()> {
    let session = connect(wallet_echoing_the_unsigned_tx()?).await?;
    let (server, client) = indexer_with_params(json!({ "min_fee_a": 44, "min_fee_b": 155381 })).await?;

    let tx_hash = client.pay(&session, &payment_request(2_000_000)?).await?;

    let submits = submitted_bodies(&server).await;
    assert_eq!(submits.len(), 1);
    // the unsigned transaction envelope, exported as cbor hex by the fake signer
    assert_eq!(submits[0].first(), Some(&0x84));
    // the hash is taken from the submitted body, not from the indexer's answer
    assert_eq!(Some(tx_hash), signed_tx_hash(&submits[0]));
    assert_ne!(tx_hash.to_string(), SUBMITTED);
    Ok(())
}

#[tokio::test]
async fn accepted_submit_with_unexpected_answer_still_pays() -> Result<()> {
    let session = connect(wallet_echoing_the_unsigned_tx()?).await?;
    let (server, client) =
        indexer_answering(json!({}), "Transaction accepted".to_string()).await?;

    let tx_hash = client.pay(&session, &payment_request(2_000_000)?).await?;

    let submits = submitted_bodies(&server).await;
    assert_eq!(submits.len(), 1);
    assert_eq!(Some(tx_hash), signed_tx_hash(&submits[0]));
    Ok(())
}

#[tokio::test]
async fn missing_min_fee_a_uses_default_of_44() -> Result<()> {
    let captured = Arc::new(Mutex::new(None));
    let mut wallet = wallet_with_funds(&[10_000_000])?;
    let sink = Arc::clone(&captured);
    wallet.expect_sign_tx().returning(move |tx| {
        if let Ok(mut slot) = sink.lock() {
            *slot = Some(tx.clone());
        }
        let signed: Box<dyn SignedTransaction> = Box::new(CborOnly("84a0".to_string()));
        Ok(signed)
    });
    let session = connect(wallet).await?;
    let (_server, client) = indexer_with_params(json!({ "min_fee_b": 155381 })).await?;

    let fetched = client.fetch_protocol_parameters().await;
    assert_eq!(fetched.params.min_fee_a, 44);
    assert!(fetched.defaulted.contains(&"min_fee_a"));

    let unsigned = client
        .build_payment(&session, &payment_request(2_000_000)?)
        .await?;
    let required = fee_for_size(&ProtocolParameters::default(), unsigned.estimated_size())?;
    assert!(unsigned.fee() >= required);
    assert!(unsigned.fee().as_u64() > 155_381 + 44 * 100);

    let signed = client.sign(&session, &unsigned).await?;
    assert_eq!(signed.probe, ExportProbe::CborHex);
    let seen = captured
        .lock()
        .map_err(|_| eyre!("capture lock poisoned"))?
        .clone()
        .ok_or_else(|| eyre!("wallet was never asked to sign"))?;
    assert_eq!(seen, unsigned);
    Ok(())
}

#[tokio::test]
async fn unreachable_indexer_degrades_to_full_defaults() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/epochs/latest/parameters"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let indexer = IndexerClient::new(&server.uri(), "key")?;
    let client = ChainClient::new(indexer, Arc::new(HexCodec), Network::Preprod);

    let fetched = client.fetch_protocol_parameters().await;
    assert_eq!(fetched.params, ProtocolParameters::default());
    assert_eq!(fetched.defaulted.len(), 10);
    Ok(())
}

#[tokio::test]
async fn insufficient_funds_never_reaches_the_signer() -> Result<()> {
    let mut wallet = wallet_with_funds(&[1_000_000])?;
    wallet.expect_sign_tx().never();
    let session = connect(wallet).await?;
    let (_server, client) = indexer_with_params(json!({})).await?;

    let result = client.pay(&session, &payment_request(2_000_000)?).await;
    assert_matches!(result, Err(Error::InsufficientFunds { .. }));
    Ok(())
}

#[tokio::test]
async fn signer_without_exports_is_unsupported() -> Result<()> {
    let mut wallet = wallet_with_funds(&[10_000_000])?;
    wallet.expect_sign_tx().returning(|_| {
        let signed: Box<dyn SignedTransaction> = Box::new(Opaque);
        Ok(signed)
    });
    let session = connect(wallet).await?;
    let (_server, client) = indexer_with_params(json!({})).await?;

    let result = client.pay(&session, &payment_request(2_000_000)?).await;
    assert_matches!(result, Err(Error::SerializationUnsupported));
    Ok(())
}

#[tokio::test]
async fn declined_signature_is_a_signing_error() -> Result<()> {
    let mut wallet = wallet_with_funds(&[10_000_000])?;
    wallet
        .expect_sign_tx()
        .returning(|_| Err(WalletApiError::Refused("user declined sign tx".to_string())));
    let session = connect(wallet).await?;
    let (_server, client) = indexer_with_params(json!({})).await?;

    let result = client.pay(&session, &payment_request(2_000_000)?).await;
    assert_matches!(result, Err(Error::Signing(message)) if message.contains("declined"));
    Ok(())
}

#[tokio::test]
async fn hex_change_address_is_shown_as_bech32() -> Result<()> {
    let session = connect(wallet_with_funds(&[])?).await?;
    assert!(session.view().address.starts_with("addr_test1"));
    assert_eq!(session.provider(), "lace");
    Ok(())
}

#[tokio::test]
async fn unknown_provider_is_not_found() -> Result<()> {
    let host = Arc::new(SingleExtension {
        id: "lace".to_string(),
        api: Arc::new(MockWallet::new()),
    });
    let connector = WalletConnector::new(host);
    assert_eq!(
        connector.list_available_providers(),
        BTreeSet::from(["lace".to_string()])
    );
    assert_matches!(
        connector.connect("nami").await,
        Err(ConnectError::ProviderNotFound(id)) if id == "nami"
    );
    Ok(())
}
