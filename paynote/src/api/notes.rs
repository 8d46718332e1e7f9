// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{check_status, read_json, Backend, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A note as stored by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    #[serde(alias = "noteId", alias = "note_id")]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "ownerId", alias = "userId", alias = "user_id")]
    pub owner_id: Option<u64>,
    #[serde(default, rename = "txHash", alias = "tx_hash")]
    pub tx_hash: Option<String>,
}

/// Body of `POST /notes/user/{userId}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    #[serde(rename = "txHash", skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Body of `PUT /notes/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpdateNote {
    pub title: String,
    pub content: String,
}

/// The notes endpoints the save flow relies on.
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn list_by_user(&self, user_id: u64) -> Result<Vec<NoteRecord>>;

    async fn get(&self, id: u64) -> Result<NoteRecord>;

    async fn create(&self, user_id: u64, note: &CreateNote) -> Result<NoteRecord>;

    async fn update(&self, id: u64, note: &UpdateNote) -> Result<NoteRecord>;

    async fn delete(&self, id: u64) -> Result<()>;
}

/// `/notes` over HTTP.
#[derive(Clone, Debug)]
pub struct NotesClient {
    backend: Backend,
}

impl NotesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            backend: Backend::new(base_url)?,
        })
    }
}

#[async_trait]
impl NotesApi for NotesClient {
    async fn list_by_user(&self, user_id: u64) -> Result<Vec<NoteRecord>> {
        let url = self.backend.url(&format!("notes/user/{user_id}"))?;
        let response = self.backend.http().get(url).send().await?;
        read_json(response).await
    }

    async fn get(&self, id: u64) -> Result<NoteRecord> {
        let url = self.backend.url(&format!("notes/{id}"))?;
        let response = self.backend.http().get(url).send().await?;
        read_json(response).await
    }

    async fn create(&self, user_id: u64, note: &CreateNote) -> Result<NoteRecord> {
        let url = self.backend.url(&format!("notes/user/{user_id}"))?;
        debug!(
            "Creating note {:?} for user {user_id} with tx hash {:?}",
            note.title, note.tx_hash
        );
        let response = self.backend.http().post(url).json(note).send().await?;
        let record: NoteRecord = read_json(response).await?;
        info!("Created note {} for user {user_id}", record.id);
        Ok(record)
    }

    async fn update(&self, id: u64, note: &UpdateNote) -> Result<NoteRecord> {
        let url = self.backend.url(&format!("notes/{id}"))?;
        let response = self.backend.http().put(url).json(note).send().await?;
        read_json(response).await
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let url = self.backend.url(&format!("notes/{id}"))?;
        let response = self.backend.http().delete(url).send().await?;
        let _ = check_status(response).await?;
        info!("Deleted note {id}");
        Ok(())
    }
}
