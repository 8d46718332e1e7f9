// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use assert_matches::assert_matches;
use cardanolib::{
    transaction::signed_tx_hash, ChainClient, HexCodec, IndexerClient, Lovelace, Network,
    PaymentRequest, TxHash,
};
use eyre::{eyre, Result};
use paynote::{
    api::{NotesApi, NotesClient},
    notes::{NoteId, ValidationError},
    payment::{ModalStep, PaymentError},
    NoteDraft, NoteSaveCoordinator, PaymentController, PaymentModal, PaymentOutcome,
    PaymentState, SaveError, SaveOutcome,
};
use paynote_logging::LogBuilder;
use serde_json::{json, Value};
use std::sync::Arc;
use test_utils::wallet::{FakeExtensionHost, FakeWallet};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const SUBMITTED: &str = "0b9d3c1f6a5e4d3c2b1a09f8e7d6c5b4a39281706f5e4d3c2b1a0f9e8d7c6b5a";
const USER_ID: u64 = 3;
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn full_parameters() -> Value {
    json!({
        "min_fee_a": 44,
        "min_fee_b": 155381,
        "max_tx_size": 16384,
        "coins_per_utxo_size": "4310",
        "key_deposit": "2000000",
        "pool_deposit": "500000000",
    })
}

/// Indexer serving `parameters` and answering every submit with [`SUBMITTED`], which is not
/// the hash of what was sent.
async fn indexer(parameters: Value) -> MockServer {
    indexer_answering(parameters, format!("\"{SUBMITTED}\"")).await
}

async fn indexer_answering(parameters: Value, submit_answer: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/epochs/latest/parameters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(parameters))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tx/submit"))
        .and(header("content-type", "application/cbor"))
        .respond_with(ResponseTemplate::new(200).set_body_string(submit_answer))
        .mount(&server)
        .await;
    server
}

/// Hash of the one transaction the indexer received.
async fn submitted_tx(indexer: &MockServer) -> Result<TxHash> {
    let bodies: Vec<_> = indexer
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == "/tx/submit")
        .map(|request| request.body)
        .collect();
    match bodies.as_slice() {
        [body] => signed_tx_hash(body).ok_or_else(|| eyre!("submitted bytes are not a transaction")),
        _ => Err(eyre!("expected one submit, got {}", bodies.len())),
    }
}

fn controller(indexer_url: &str, host: Arc<FakeExtensionHost>) -> Result<Arc<PaymentController>> {
    let indexer = IndexerClient::new(indexer_url, "preprodtestproject")?;
    let chain = ChainClient::new(indexer, Arc::new(HexCodec), Network::Preprod);
    let request = PaymentRequest::new(
        test_utils::testnet_address(0x42),
        Lovelace::from_u64(2_000_000),
        Network::Preprod,
    )?;
    Ok(Arc::new(PaymentController::new(host, chain, request)))
}

fn wallet(amounts: &[u64]) -> FakeWallet {
    FakeWallet::with_funds(test_utils::testnet_address(0x07), amounts)
}

fn draft() -> NoteDraft {
    NoteDraft {
        id: NoteId::Placeholder(4),
        title: "Groceries".to_string(),
        content: "milk, eggs".to_string(),
    }
}

fn coordinator(backend_url: &str) -> Result<NoteSaveCoordinator> {
    let api: Arc<dyn NotesApi> = Arc::new(NotesClient::new(backend_url)?);
    Ok(NoteSaveCoordinator::new(api, USER_ID))
}

#[tokio::test]
async fn paid_note_is_created_once_with_the_submitted_hash() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test("payment_flow");

    let indexer = indexer(full_parameters()).await;
    let backend = MockServer::start().await;
    let host = Arc::new(FakeExtensionHost::new());
    let _ = host.inject("lace", Arc::new(wallet(&[10_000_000])));
    let controller = controller(&indexer.uri(), host)?;
    let modal = PaymentModal::new(Arc::clone(&controller));
    let mut coordinator = coordinator(&backend.uri())?;

    assert_eq!(
        coordinator.request_save(&draft()).await?,
        SaveOutcome::PaymentRequired
    );

    assert_eq!(modal.selected_wallet(), Some("lace"));
    let view = modal.connect().await?;
    assert!(view.address.starts_with("addr_test1"));

    let outcome = modal.pay().await?;
    let expected = submitted_tx(&indexer).await?;
    assert_eq!(outcome, PaymentOutcome::Success { tx_hash: expected });
    assert_eq!(modal.step(), ModalStep::Success);
    assert!(!modal.can_cancel());
    assert_matches!(modal.explorer_url(), Some(url) if url.ends_with(&expected.to_hex()));

    Mock::given(method("POST"))
        .and(path(format!("/notes/user/{USER_ID}")))
        .and(body_json(json!({
            "title": "Groceries",
            "content": "milk, eggs",
            "txHash": expected.to_hex(),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "noteId": 21,
            "title": "Groceries",
            "content": "milk, eggs",
            "txHash": expected.to_hex(),
        })))
        .expect(1)
        .mount(&backend)
        .await;

    assert_eq!(modal.complete(), Some(expected));
    assert_eq!(modal.complete(), None);
    assert_eq!(modal.step(), ModalStep::Pay);

    let saved = coordinator.on_payment_outcome(&outcome).await?;
    assert_matches!(saved, SaveOutcome::Created { placeholder: NoteId::Placeholder(4), record, tx_hash }
        if record.id == 21 && tx_hash == expected);
    assert!(coordinator.pending().is_none());
    Ok(())
}

#[tokio::test]
async fn insufficient_funds_can_be_retried_without_reconnecting() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test("payment_flow");

    let indexer = indexer(full_parameters()).await;
    let host = Arc::new(FakeExtensionHost::new());
    let wallet = Arc::new(wallet(&[1_000_000]));
    let extension = host.inject("lace", Arc::clone(&wallet));
    let controller = controller(&indexer.uri(), host)?;

    let _ = controller.connect("lace").await?;
    let outcome = controller.pay().await?;
    assert_matches!(&outcome, PaymentOutcome::Failure { message } if message.starts_with("Insufficient funds"));
    assert_matches!(controller.state(), PaymentState::Failed { wallet: Some(view), .. } if view.provider == "lace");

    let again = controller.pay().await?;
    assert_matches!(again, PaymentOutcome::Failure { .. });
    assert_eq!(extension.enable_calls(), 1);
    assert_eq!(wallet.sign_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn placeholder_title_is_rejected_before_any_wallet_call() -> Result<()> {
    let host = Arc::new(FakeExtensionHost::new());
    let extension = host.inject("lace", Arc::new(wallet(&[10_000_000])));
    let controller = controller(UNREACHABLE, host)?;
    let mut coordinator = coordinator(UNREACHABLE)?;

    let draft = NoteDraft {
        title: "Untitled-3".to_string(),
        ..draft()
    };
    assert_matches!(
        coordinator.request_save(&draft).await,
        Err(SaveError::Validation(ValidationError::PlaceholderTitle))
    );
    assert_eq!(extension.enable_calls(), 0);
    assert_eq!(controller.state(), PaymentState::Idle);
    Ok(())
}

#[tokio::test]
async fn backend_failure_after_payment_keeps_hash_and_draft() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test("payment_flow");

    let indexer = indexer(full_parameters()).await;
    let host = Arc::new(FakeExtensionHost::new());
    let _ = host.inject("lace", Arc::new(wallet(&[10_000_000])));
    let controller = controller(&indexer.uri(), host)?;
    let mut coordinator = coordinator(UNREACHABLE)?;

    let _ = coordinator.request_save(&draft()).await?;
    let _ = controller.connect("lace").await?;
    let outcome = controller.pay().await?;
    let expected = submitted_tx(&indexer).await?;

    let result = coordinator.on_payment_outcome(&outcome).await;
    assert_matches!(&result, Err(SaveError::PostPaymentSave { tx_hash, .. }) if *tx_hash == expected);
    let message = result.err().map(|err| err.to_string()).unwrap_or_default();
    assert!(message.contains(&expected.to_hex()));

    let pending = coordinator
        .pending()
        .ok_or_else(|| eyre!("pending save was dropped"))?;
    assert_eq!(pending.draft(), &draft());
    assert_eq!(pending.paid(), Some(expected));
    assert_eq!(controller.state().tx_hash(), Some(expected));
    Ok(())
}

#[tokio::test]
async fn accepted_submit_with_unexpected_answer_is_a_success() -> Result<()> {
    let _log_guard = LogBuilder::init_single_threaded_tokio_test("payment_flow");

    let indexer = indexer_answering(full_parameters(), "Transaction accepted".to_string()).await;
    let host = Arc::new(FakeExtensionHost::new());
    let wallet = Arc::new(wallet(&[10_000_000]));
    let _ = host.inject("lace", Arc::clone(&wallet));
    let controller = controller(&indexer.uri(), host)?;

    let _ = controller.connect("lace").await?;
    let outcome = controller.pay().await?;
    let expected = submitted_tx(&indexer).await?;
    assert_eq!(outcome, PaymentOutcome::Success { tx_hash: expected });
    assert_matches!(controller.state(), PaymentState::Succeeded { .. });

    // a succeeded payment is not paid a second time
    assert_matches!(
        controller.pay().await,
        Err(PaymentError::InvalidTransition { action: "pay", .. })
    );
    assert_eq!(wallet.sign_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_fee_coefficient_falls_back_to_default() -> Result<()> {
    let mut parameters = full_parameters();
    if let Some(fields) = parameters.as_object_mut() {
        let _ = fields.remove("min_fee_a");
    }
    let indexer = indexer(parameters).await;
    let host = Arc::new(FakeExtensionHost::new());
    let _ = host.inject("lace", Arc::new(wallet(&[10_000_000])));
    let controller = controller(&indexer.uri(), host)?;

    let _ = controller.connect("lace").await?;
    assert_matches!(controller.pay().await?, PaymentOutcome::Success { .. });
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn nothing_else_runs_while_paying() -> Result<()> {
    let indexer = indexer(full_parameters()).await;
    let host = Arc::new(FakeExtensionHost::new());
    let mut wallet = wallet(&[10_000_000]);
    let release = wallet.hold_signatures();
    let started = wallet.signing_started();
    let _ = host.inject("lace", Arc::new(wallet));
    let controller = controller(&indexer.uri(), host)?;
    let modal = PaymentModal::new(Arc::clone(&controller));
    let _ = controller.connect("lace").await?;

    let paying = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.pay().await }
    });
    started.notified().await;

    assert!(controller.state().is_busy());
    assert_eq!(modal.step(), ModalStep::Processing);
    assert!(!modal.can_cancel());
    assert!(!modal.pay_enabled());
    assert_matches!(
        controller.pay().await,
        Err(PaymentError::Busy { action: "pay", state: "paying" })
    );
    assert_matches!(
        controller.connect("lace").await,
        Err(PaymentError::Busy { action: "connect", .. })
    );
    assert_matches!(controller.disconnect(), Err(PaymentError::Busy { .. }));
    assert!(!controller.clear_error());

    release.notify_one();
    let outcome = paying.await??;
    assert_matches!(outcome, PaymentOutcome::Success { .. });
    assert!(!controller.state().is_busy());
    Ok(())
}

#[tokio::test]
async fn unknown_wallet_leaves_existing_session_alone() -> Result<()> {
    let indexer = indexer(full_parameters()).await;
    let host = Arc::new(FakeExtensionHost::new());
    let _ = host.inject("lace", Arc::new(wallet(&[1_000_000])));
    let controller = controller(&indexer.uri(), host)?;

    let before = controller.connect("lace").await?;
    let _ = controller.pay().await?;
    assert_matches!(controller.state(), PaymentState::Failed { .. });

    assert_matches!(
        controller.connect("nami").await,
        Err(PaymentError::Connect(cardanolib::ConnectError::ProviderNotFound(_)))
    );
    assert_eq!(controller.session(), Some(before));
    Ok(())
}
