// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod coordinator;
mod workspace;

pub use coordinator::{NoteSaveCoordinator, PendingSave, SaveError, SaveOutcome};
pub use workspace::{NoteTab, NoteWorkspace, WorkspaceError};

use serde::Serialize;
use std::fmt;

/// Titles starting with this are the ones handed out to new tabs.
pub const PLACEHOLDER_TITLE_PREFIX: &str = "Untitled";

/// Identity of a note in the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NoteId {
    /// Assigned by the backend.
    Persisted(u64),
    /// Local only, never sent to the backend.
    Placeholder(u64),
}

impl NoteId {
    pub fn is_persisted(&self) -> bool {
        matches!(self, NoteId::Persisted(_))
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteId::Persisted(id) => write!(f, "{id}"),
            NoteId::Placeholder(id) => write!(f, "temp-{id}"),
        }
    }
}

/// Title and content as typed by the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a proper title before saving (not \"Untitled\").")]
    PlaceholderTitle,
    #[error("Please enter some content before saving.")]
    EmptyContent,
}

impl NoteDraft {
    /// A new note needs a real title and some content before it is worth paying for.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let title = self.title.trim();
        if title.is_empty() || title.starts_with(PLACEHOLDER_TITLE_PREFIX) {
            return Err(ValidationError::PlaceholderTitle);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(())
    }
}
