// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    common::TxHash,
    error::{Error, Result},
};
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};
use url::Url;

/// The client fetch timeout
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Header the indexer reads the API key from.
const PROJECT_ID_HEADER: &str = "project_id";
const CBOR_CONTENT_TYPE: &str = "application/cbor";

/// Whether a submitted transaction has made it into a block yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TxStatus {
    /// Accepted by the indexer but not seen on chain.
    Submitted,
    Confirmed { block_height: u64 },
}

#[derive(Deserialize)]
struct TxInfo {
    block_height: Option<u64>,
}

/// Answer to a submit the indexer accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accepted {
    /// The hash in the response, when there is one.
    pub reported: Option<TxHash>,
    pub body: String,
}

/// A bare or quoted hash, or a JSON object holding one as a string value.
fn reported_hash(body: &str) -> Option<TxHash> {
    let body = body.trim();
    if let Ok(hash) = TxHash::from_str(body.trim_matches('"')) {
        return Some(hash);
    }
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .as_object()?
        .values()
        .filter_map(|value| value.as_str())
        .find_map(|value| TxHash::from_str(value).ok())
}

/// HTTP client for a Blockfrost compatible indexer.
#[derive(Clone)]
pub struct IndexerClient {
    http: Client,
    base_url: Url,
    project_id: String,
}

impl IndexerClient {
    pub fn new(base_url: &str, project_id: impl Into<String>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // without the trailing slash `join` would replace the last path segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let project_id = project_id.into();
        if project_id.is_empty() {
            warn!("No indexer project id configured, requests to {base_url} will likely be refused");
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url,
            project_id,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Raw JSON of the latest epoch's protocol parameters.
    pub async fn protocol_parameters(&self) -> Result<serde_json::Value> {
        let url = self.base_url.join("epochs/latest/parameters")?;
        debug!("Fetching protocol parameters from {url}");
        let response = self
            .http
            .get(url)
            .header(PROJECT_ID_HEADER, &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Indexer {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Posts the signed transaction bytes.
    ///
    /// Only a non-2xx status is a rejection. Once the indexer accepted the bytes this returns
    /// [`Accepted`] whatever the body holds, since the funds may already be spent.
    pub async fn submit_tx(&self, tx_bytes: Vec<u8>) -> Result<Accepted> {
        let url = self.base_url.join("tx/submit")?;
        info!("Submitting {} byte transaction to {url}", tx_bytes.len());
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, CBOR_CONTENT_TYPE)
            .header(PROJECT_ID_HEADER, &self.project_id)
            .body(tx_bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Indexer refused transaction with {status}: {body}");
            return Err(Error::Submit {
                status: status.as_u16(),
                body,
            });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!("Indexer accepted the transaction but its answer was unreadable: {err}");
                String::new()
            }
        };
        let reported = reported_hash(&body);
        if reported.is_none() {
            warn!("Indexer accepted the transaction with an unexpected answer: {body:?}");
        }
        Ok(Accepted { reported, body })
    }

    pub async fn transaction_status(&self, tx_hash: &TxHash) -> Result<TxStatus> {
        let url = self.base_url.join(&format!("txs/{tx_hash}"))?;
        let response = self
            .http
            .get(url)
            .header(PROJECT_ID_HEADER, &self.project_id)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(TxStatus::Submitted);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Indexer {
                status: status.as_u16(),
                body,
            });
        }

        let info: TxInfo = response.json().await?;
        Ok(match info.block_height {
            Some(block_height) => TxStatus::Confirmed { block_height },
            None => TxStatus::Submitted,
        })
    }
}

impl fmt::Debug for IndexerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.project_id.chars().take(8).collect();
        f.debug_struct("IndexerClient")
            .field("base_url", &self.base_url.as_str())
            .field("project_id", &format!("{prefix}..."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use color_eyre::Result;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const HASH: &str = "8f3b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b";

    #[tokio::test]
    async fn submit_posts_cbor_with_project_id() -> Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v0/tx/submit"))
            .and(header("content-type", "application/cbor"))
            .and(header("project_id", "preprodKey"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("\"{HASH}\"\n")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = IndexerClient::new(&format!("{}/api/v0", mock_server.uri()), "preprodKey")?;
        let accepted = client.submit_tx(vec![0x84, 0xa3]).await?;
        assert_eq!(accepted.reported, Some(TxHash::from_str(HASH)?));

        let requests = mock_server.received_requests().await.unwrap_or_default();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, vec![0x84, 0xa3]);
        Ok(())
    }

    #[tokio::test]
    async fn submit_error_keeps_status_and_body() -> Result<()> {
        let mock_server = MockServer::start().await;
        let body = r#"{"error":"Bad Request","message":"BadInputsUTxO"}"#;
        Mock::given(method("POST"))
            .and(path("/tx/submit"))
            .respond_with(ResponseTemplate::new(400).set_body_string(body))
            .mount(&mock_server)
            .await;

        let client = IndexerClient::new(&mock_server.uri(), "key")?;
        let result = client.submit_tx(vec![1]).await;
        assert_matches!(result, Err(Error::Submit { status: 400, body: returned }) if returned == body);
        Ok(())
    }

    #[tokio::test]
    async fn accepted_submit_with_unexpected_body_is_still_accepted() -> Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tx/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let client = IndexerClient::new(&mock_server.uri(), "key")?;
        let accepted = client.submit_tx(vec![1]).await?;
        assert_eq!(accepted.reported, None);
        assert_eq!(accepted.body, "ok");
        Ok(())
    }

    #[test]
    fn reported_hash_reads_json_objects() -> Result<()> {
        let expected = Some(TxHash::from_str(HASH)?);
        assert_eq!(reported_hash(&format!("{{\"tx_hash\":\"{HASH}\"}}")), expected);
        assert_eq!(reported_hash(&format!(" \"{HASH}\"\n")), expected);
        assert_eq!(reported_hash("{\"status\":\"ok\"}"), None);
        Ok(())
    }

    #[tokio::test]
    async fn parameters_are_fetched_from_latest_epoch() -> Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/epochs/latest/parameters"))
            .and(header("project_id", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "min_fee_a": 44 })))
            .mount(&mock_server)
            .await;

        let client = IndexerClient::new(&mock_server.uri(), "key")?;
        let value = client.protocol_parameters().await?;
        assert_eq!(value["min_fee_a"], 44);
        Ok(())
    }

    #[tokio::test]
    async fn status_distinguishes_submitted_and_confirmed() -> Result<()> {
        let mock_server = MockServer::start().await;
        let pending = TxHash::new([1; 32]);
        let confirmed = TxHash::new([2; 32]);
        Mock::given(method("GET"))
            .and(path(format!("/txs/{pending}")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/txs/{confirmed}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "block_height": 1_234_567 })),
            )
            .mount(&mock_server)
            .await;

        let client = IndexerClient::new(&mock_server.uri(), "key")?;
        assert_eq!(client.transaction_status(&pending).await?, TxStatus::Submitted);
        assert_eq!(
            client.transaction_status(&confirmed).await?,
            TxStatus::Confirmed {
                block_height: 1_234_567
            }
        );
        Ok(())
    }

    #[test]
    fn debug_output_hides_project_id() -> Result<()> {
        let client = IndexerClient::new("http://localhost:3000", "preprodSecretKey123")?;
        let debug = format!("{client:?}");
        assert!(debug.contains("preprodS..."));
        assert!(!debug.contains("SecretKey123"));
        Ok(())
    }
}
