// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! HTTP client for the notes backend (`/notes`, `/users`).

pub mod error;
#[cfg(test)]
pub(crate) mod mock;
pub mod notes;
pub mod users;

pub use error::{Error, Result};
pub use notes::{CreateNote, NoteRecord, NotesApi, NotesClient, UpdateNote};
pub use users::{LoginRequest, LoginResponse, RegisterRequest, UserRecord, UsersClient};

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// The client fetch timeout
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared plumbing of the backend clients: base url and HTTP client.
#[derive(Clone, Debug)]
pub(crate) struct Backend {
    http: Client,
    base_url: Url,
}

impl Backend {
    pub(crate) fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, base_url })
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Turns non-2xx responses into [`Error::Status`] with the body kept verbatim.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!("Backend returned {status}: {body}");
    Err(Error::Status {
        status: status.as_u16(),
        body,
    })
}

/// Reads a JSON body after checking the status.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = check_status(response).await?.text().await?;
    Ok(serde_json::from_str(&body)?)
}
