// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::{
    eyre::{eyre, Context, Result},
    Section,
};
use std::path::PathBuf;

/// `<data dir>/paynote/client`, created if missing. The login session lives here.
pub fn get_client_data_dir_path() -> Result<PathBuf> {
    let dir = dirs_next::data_dir()
        .map(|data_dir| data_dir.join("paynote").join("client"))
        .ok_or_else(|| eyre!("No data directory is known for this platform"))?;
    std::fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("Failed to create {dir:?}"))
        .suggestion("check the permissions of the parent directory")?;
    Ok(dir)
}
