// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{NoteDraft, NoteId, SaveOutcome, PLACEHOLDER_TITLE_PREFIX};
use crate::api::{self, NoteRecord, NotesApi};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("The last open note cannot be closed")]
    LastTab,
    #[error("No open note with id {0}")]
    UnknownTab(NoteId),
    #[error(transparent)]
    Backend(#[from] api::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NoteTab {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub unsaved_changes: bool,
}

impl NoteTab {
    pub fn draft(&self) -> NoteDraft {
        NoteDraft {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// The open notes of the editor, one tab each. There is always at least one tab.
#[derive(Clone, Debug)]
pub struct NoteWorkspace {
    tabs: Vec<NoteTab>,
    active: NoteId,
    next_placeholder: u64,
}

impl Default for NoteWorkspace {
    fn default() -> Self {
        Self::from_records(Vec::new())
    }
}

impl NoteWorkspace {
    /// Opens every note of the user.
    pub async fn load(api: &dyn NotesApi, user_id: u64) -> Result<Self, api::Error> {
        let records = api.list_by_user(user_id).await?;
        debug!("Loaded {} note(s) for user {user_id}", records.len());
        Ok(Self::from_records(records))
    }

    /// One tab per record, or a single blank tab when there are none. Placeholder
    /// numbering starts past the largest backend id.
    pub fn from_records(records: Vec<NoteRecord>) -> Self {
        let next_placeholder = records
            .iter()
            .map(|record| record.id)
            .max()
            .map_or(1, |id| id.saturating_add(1));
        let tabs: Vec<NoteTab> = records
            .into_iter()
            .map(|record| NoteTab {
                id: NoteId::Persisted(record.id),
                title: if record.title.is_empty() {
                    PLACEHOLDER_TITLE_PREFIX.to_string()
                } else {
                    record.title
                },
                content: record.content,
                unsaved_changes: false,
            })
            .collect();

        let mut workspace = Self {
            active: tabs
                .first()
                .map_or(NoteId::Placeholder(next_placeholder), |tab| tab.id),
            tabs,
            next_placeholder,
        };
        if workspace.tabs.is_empty() {
            let _ = workspace.add_tab();
        }
        workspace
    }

    pub fn tabs(&self) -> &[NoteTab] {
        &self.tabs
    }

    /// Opens a blank `Untitled-n` tab and makes it active.
    pub fn add_tab(&mut self) -> NoteId {
        let n = self.next_placeholder;
        self.next_placeholder = n.saturating_add(1);
        let id = NoteId::Placeholder(n);
        self.tabs.push(NoteTab {
            id,
            title: format!("{PLACEHOLDER_TITLE_PREFIX}-{n}"),
            content: String::new(),
            unsaved_changes: false,
        });
        self.active = id;
        id
    }

    pub fn select(&mut self, id: NoteId) -> bool {
        if self.tab(id).is_none() {
            return false;
        }
        self.active = id;
        true
    }

    pub fn active(&self) -> Option<&NoteTab> {
        self.tab(self.active)
    }

    pub fn tab(&self, id: NoteId) -> Option<&NoteTab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    /// An emptied title falls back to `Untitled-n`.
    pub fn set_title(&mut self, title: &str) {
        if let Some(tab) = self.active_mut() {
            tab.title = if title.is_empty() {
                let n = match tab.id {
                    NoteId::Persisted(n) | NoteId::Placeholder(n) => n,
                };
                format!("{PLACEHOLDER_TITLE_PREFIX}-{n}")
            } else {
                title.to_string()
            };
            tab.unsaved_changes = true;
        }
    }

    pub fn set_content(&mut self, content: &str) {
        if let Some(tab) = self.active_mut() {
            tab.content = content.to_string();
            tab.unsaved_changes = true;
        }
    }

    /// Literal find and replace over the active note. Returns the number of matches.
    pub fn replace_all(&mut self, find: &str, replace: &str) -> usize {
        if find.is_empty() {
            return 0;
        }
        let Some(tab) = self.active_mut() else {
            return 0;
        };
        let matches = tab.content.matches(find).count();
        if matches > 0 {
            tab.content = tab.content.replace(find, replace);
            tab.unsaved_changes = true;
        }
        matches
    }

    /// Closing a saved note deletes it from the backend; the tab stays open if the
    /// delete fails. The last tab cannot be closed.
    pub async fn close(&mut self, id: NoteId, api: &dyn NotesApi) -> Result<(), WorkspaceError> {
        let index = self
            .tabs
            .iter()
            .position(|tab| tab.id == id)
            .ok_or(WorkspaceError::UnknownTab(id))?;
        if self.tabs.len() == 1 {
            return Err(WorkspaceError::LastTab);
        }
        if let NoteId::Persisted(note_id) = id {
            api.delete(note_id).await?;
        }

        let _ = self.tabs.remove(index);
        if self.active == id {
            let next = index.min(self.tabs.len() - 1);
            if let Some(tab) = self.tabs.get(next) {
                self.active = tab.id;
            }
        }
        Ok(())
    }

    /// Brings the tabs in line with a save: updated notes are clean again and created
    /// notes swap their placeholder for the backend id.
    pub fn apply(&mut self, outcome: &SaveOutcome) {
        match outcome {
            SaveOutcome::Updated(record) => {
                if let Some(tab) = self.tab_mut(NoteId::Persisted(record.id)) {
                    tab.unsaved_changes = false;
                }
            }
            SaveOutcome::Created {
                placeholder,
                record,
                ..
            } => self.mark_saved(*placeholder, record.id),
            SaveOutcome::PaymentRequired => {}
        }
    }

    pub fn mark_saved(&mut self, placeholder: NoteId, note_id: u64) {
        let saved = NoteId::Persisted(note_id);
        if let Some(tab) = self.tab_mut(placeholder) {
            tab.id = saved;
            tab.unsaved_changes = false;
            if self.active == placeholder {
                self.active = saved;
            }
        }
    }

    fn active_mut(&mut self) -> Option<&mut NoteTab> {
        let active = self.active;
        self.tab_mut(active)
    }

    fn tab_mut(&mut self, id: NoteId) -> Option<&mut NoteTab> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }
}
