// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{CreateNote, NoteRecord, NotesApi, Result, UpdateNote};
use async_trait::async_trait;
use mockall::mock;

mock! {
    pub Notes {}
    #[async_trait]
    impl NotesApi for Notes {
        async fn list_by_user(&self, user_id: u64) -> Result<Vec<NoteRecord>>;
        async fn get(&self, id: u64) -> Result<NoteRecord>;
        async fn create(&self, user_id: u64, note: &CreateNote) -> Result<NoteRecord>;
        async fn update(&self, id: u64, note: &UpdateNote) -> Result<NoteRecord>;
        async fn delete(&self, id: u64) -> Result<()>;
    }
}
