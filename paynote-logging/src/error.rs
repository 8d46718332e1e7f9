// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use thiserror::Error;

pub(super) type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to swap the log filter: {0}")]
    Reload(#[from] tracing_subscriber::reload::Error),

    #[error("No data directory on this platform, pass an explicit log path instead")]
    NoDataDir,

    #[error("Unknown log format {0:?}, expected \"default\" or \"json\"")]
    UnknownFormat(String),

    #[error("Log filter entry {0:?} has no target")]
    MissingTarget(String),

    #[error("Unsupported log level {0:?}")]
    UnsupportedLevel(String),
}
