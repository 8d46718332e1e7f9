// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Notes that cost a Cardano micro-payment to create.
//!
//! # Flow
//!
//! Saving a note that already exists on the backend is a plain update. Saving a
//! new note first validates the draft, then parks it as a pending save while the
//! [`PaymentController`] connects a wallet and pays. Only a successful payment
//! creates the note, and the transaction hash travels with it. When the backend
//! create fails after the money was spent the draft and the hash are both kept
//! so the save can be retried without paying again.
//!
//! # Modules
//!
//! - [`api`]: HTTP clients for the `/notes` and `/users` endpoints.
//! - [`payment`]: the connect and pay state machine and the modal built on it.
//! - [`notes`]: the save coordinator and the tabbed note workspace.

#[macro_use]
extern crate tracing;

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod notes;
pub mod payment;

pub use auth::{AuthSession, SessionStore};
pub use client::{Client, ClientError};
pub use config::{ClientConfig, PaymentConfig};
pub use notes::{NoteDraft, NoteSaveCoordinator, NoteWorkspace, SaveError, SaveOutcome};
pub use payment::{PaymentController, PaymentModal, PaymentOutcome, PaymentState};

#[doc(no_inline)] // Place this under 'Re-exports' in the docs.
pub use cardanolib::{Lovelace, Network, TxHash};
