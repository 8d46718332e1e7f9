// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! The logged in user, persisted between runs.

use crate::api::LoginResponse;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

const SESSION_FILE: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Stored session is unreadable: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not obtain the data directory")]
    NoDataDir,
    #[error("Login response did not include a user id")]
    MissingUserId,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl TryFrom<LoginResponse> for AuthSession {
    type Error = AuthError;

    fn try_from(login: LoginResponse) -> Result<Self, Self::Error> {
        let id = login.user_id().ok_or(AuthError::MissingUserId)?;
        Ok(Self {
            id,
            username: login.username,
            email: login.email,
            avatar_url: login.avatar_url,
            token: login.token,
        })
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// JSON file holding the current [`AuthSession`].
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store the session in `dir/session.json`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    /// `<data dir>/paynote/client/session.json`
    pub fn in_data_dir() -> Result<Self, AuthError> {
        let dir = dirs_next::data_dir()
            .ok_or(AuthError::NoDataDir)?
            .join("paynote")
            .join("client");
        Ok(Self::new(dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nobody is logged in.
    pub fn load(&self) -> Result<Option<AuthSession>, AuthError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let session = serde_json::from_str(&contents)?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &AuthSession) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        debug!("Saved session for user {} to {:?}", session.id, self.path);
        Ok(())
    }

    /// Removes the stored session. Clearing when nothing is stored is fine.
    pub fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
