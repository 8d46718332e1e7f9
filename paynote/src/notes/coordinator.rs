// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use super::{NoteDraft, NoteId, ValidationError};
use crate::{
    api::{self, CreateNote, NoteRecord, NotesApi, UpdateNote},
    payment::PaymentOutcome,
};
use cardanolib::TxHash;
use chrono::{DateTime, Utc};
use std::{str::FromStr, sync::Arc};

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to save note: {0}")]
    Backend(#[from] api::Error),
    #[error("Another note is waiting for its payment")]
    PaymentPending,
    #[error("No note is waiting for a payment")]
    NoPendingSave,
    #[error("Payment failed: {0}")]
    PaymentFailed(String),
    /// The money was spent, the note does not exist. Never retried by paying again.
    #[error(
        "Payment succeeded (transaction {tx_hash}) but the note could not be saved. \
         Please retry or contact support with the transaction hash."
    )]
    PostPaymentSave {
        tx_hash: TxHash,
        #[source]
        source: api::Error,
    },
    #[error("Transaction {tx_hash} paid for a note that is not saved yet")]
    UnsavedPayment { tx_hash: TxHash },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// An existing note was updated, nothing was paid.
    Updated(NoteRecord),
    /// The draft is parked until the payment outcome arrives.
    PaymentRequired,
    /// A paid note was created. `placeholder` is the id the editor knew it by.
    Created {
        placeholder: NoteId,
        record: NoteRecord,
        tx_hash: TxHash,
    },
}

/// A new note waiting on its payment, or on its backend create once paid.
#[derive(Debug, Clone)]
pub struct PendingSave {
    draft: NoteDraft,
    attempted_at: DateTime<Utc>,
    paid: Option<TxHash>,
}

impl PendingSave {
    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn attempted_at(&self) -> DateTime<Utc> {
        self.attempted_at
    }

    /// Set once the payment succeeded.
    pub fn paid(&self) -> Option<TxHash> {
        self.paid
    }
}

/// Decides whether a save needs a payment and creates paid notes with their hash.
///
/// Holds at most one [`PendingSave`]. A paid pending save is only released by a
/// successful create, so its hash is never dropped.
pub struct NoteSaveCoordinator {
    api: Arc<dyn NotesApi>,
    user_id: u64,
    pending: Option<PendingSave>,
}

impl NoteSaveCoordinator {
    pub fn new(api: Arc<dyn NotesApi>, user_id: u64) -> Self {
        Self {
            api,
            user_id,
            pending: None,
        }
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn pending(&self) -> Option<&PendingSave> {
        self.pending.as_ref()
    }

    /// Persisted notes are updated straight away. New notes are validated and parked,
    /// and the caller has to collect a payment before anything reaches the backend.
    pub async fn request_save(&mut self, draft: &NoteDraft) -> Result<SaveOutcome, SaveError> {
        if let NoteId::Persisted(id) = draft.id {
            let update = UpdateNote {
                title: draft.title.clone(),
                content: draft.content.clone(),
            };
            let record = self.api.update(id, &update).await?;
            debug!("Updated note {id}");
            return Ok(SaveOutcome::Updated(record));
        }

        draft.validate()?;
        if let Some(pending) = &self.pending {
            return Err(match pending.paid {
                Some(tx_hash) => SaveError::UnsavedPayment { tx_hash },
                None => SaveError::PaymentPending,
            });
        }

        info!("Note {} needs a payment before it is created", draft.id);
        self.pending = Some(PendingSave {
            draft: draft.clone(),
            attempted_at: Utc::now(),
            paid: None,
        });
        Ok(SaveOutcome::PaymentRequired)
    }

    /// Success creates the note carrying the hash. Failure discards the pending save
    /// without touching the backend; the draft stays in the editor.
    pub async fn on_payment_outcome(
        &mut self,
        outcome: &PaymentOutcome,
    ) -> Result<SaveOutcome, SaveError> {
        let Some(pending) = self.pending.as_mut() else {
            warn!("Payment outcome arrived with nothing waiting for it: {outcome:?}");
            return Err(SaveError::NoPendingSave);
        };

        match outcome {
            PaymentOutcome::Failure { message } => {
                if let Some(tx_hash) = pending.paid {
                    return Err(SaveError::UnsavedPayment { tx_hash });
                }
                self.pending = None;
                info!("Discarded pending save after failed payment: {message}");
                Err(SaveError::PaymentFailed(message.clone()))
            }
            PaymentOutcome::Success { tx_hash } => {
                match pending.paid {
                    Some(paid) if paid != *tx_hash => {
                        return Err(SaveError::UnsavedPayment { tx_hash: paid });
                    }
                    _ => pending.paid = Some(*tx_hash),
                }
                self.create_paid().await
            }
        }
    }

    /// Retries after a [`SaveError::PostPaymentSave`]. A failed create may still have
    /// landed on the backend, so a note already carrying the paid hash is adopted
    /// instead of being created a second time.
    pub async fn retry_paid_save(&mut self) -> Result<SaveOutcome, SaveError> {
        let pending = self.pending.as_ref().ok_or(SaveError::NoPendingSave)?;
        let tx_hash = pending.paid.ok_or(SaveError::PaymentPending)?;
        let placeholder = pending.draft.id;

        let existing = match self.api.list_by_user(self.user_id).await {
            Ok(records) => records
                .into_iter()
                .find(|record| paid_with(record, &tx_hash)),
            Err(source) => {
                error!("Could not look up notes paid with {tx_hash}: {source}");
                return Err(SaveError::PostPaymentSave { tx_hash, source });
            }
        };
        let Some(record) = existing else {
            return self.create_paid().await;
        };

        info!(
            "Note {} already carries transaction {tx_hash}, adopting it for {placeholder}",
            record.id
        );
        self.pending = None;
        Ok(SaveOutcome::Created {
            placeholder,
            record,
            tx_hash,
        })
    }

    /// Saves a new note for a transaction paid outside this coordinator, such as a
    /// hash given on the command line. Nothing is paid here.
    pub async fn resume_paid(
        &mut self,
        draft: &NoteDraft,
        tx_hash: TxHash,
    ) -> Result<SaveOutcome, SaveError> {
        draft.validate()?;
        if let Some(pending) = &self.pending {
            return Err(match pending.paid {
                Some(paid) => SaveError::UnsavedPayment { tx_hash: paid },
                None => SaveError::PaymentPending,
            });
        }

        self.pending = Some(PendingSave {
            draft: draft.clone(),
            attempted_at: Utc::now(),
            paid: Some(tx_hash),
        });
        self.retry_paid_save().await
    }

    async fn create_paid(&mut self) -> Result<SaveOutcome, SaveError> {
        let pending = self.pending.as_ref().ok_or(SaveError::NoPendingSave)?;
        let tx_hash = pending.paid.ok_or(SaveError::PaymentPending)?;
        let placeholder = pending.draft.id;
        let note = CreateNote {
            title: pending.draft.title.clone(),
            content: pending.draft.content.clone(),
            tx_hash: Some(tx_hash.to_hex()),
        };

        match self.api.create(self.user_id, &note).await {
            Ok(record) => {
                info!(
                    "Created note {} for {placeholder} with transaction {tx_hash}",
                    record.id
                );
                self.pending = None;
                Ok(SaveOutcome::Created {
                    placeholder,
                    record,
                    tx_hash,
                })
            }
            Err(source) => {
                error!("Transaction {tx_hash} was paid but creating the note failed: {source}");
                Err(SaveError::PostPaymentSave { tx_hash, source })
            }
        }
    }

    /// The payment dialog was closed. Refused once the payment went through.
    pub fn cancel(&mut self) -> Result<Option<NoteDraft>, SaveError> {
        if let Some(tx_hash) = self.pending.as_ref().and_then(PendingSave::paid) {
            return Err(SaveError::UnsavedPayment { tx_hash });
        }
        Ok(self.pending.take().map(|pending| pending.draft))
    }
}

fn paid_with(record: &NoteRecord, tx_hash: &TxHash) -> bool {
    record
        .tx_hash
        .as_deref()
        .and_then(|hash| TxHash::from_str(hash.trim()).ok())
        .is_some_and(|hash| hash == *tx_hash)
}
