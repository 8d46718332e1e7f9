// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::data_dir::get_client_data_dir_path;
use color_eyre::{
    eyre::{eyre, Context, Result},
    Section,
};
use paynote::{AuthSession, SessionStore};

pub fn session_store() -> Result<SessionStore> {
    Ok(SessionStore::new(get_client_data_dir_path()?))
}

/// The stored session, or an error telling the user to log in.
pub fn require_login() -> Result<AuthSession> {
    let store = session_store()?;
    store
        .load()
        .wrap_err_with(|| format!("Failed to read the session at {:?}", store.path()))?
        .ok_or_else(|| eyre!("Not logged in"))
        .with_suggestion(|| "log in with `paynote account login <email>`")
}
