// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::access::session::require_login;
use color_eyre::{
    eyre::{eyre, Context},
    Result, Section,
};
use paynote::{
    notes::{NoteDraft, NoteId},
    Client, SaveOutcome, TxHash,
};
use std::str::FromStr;

pub async fn list(client: &Client) -> Result<()> {
    let session = require_login()?;
    let workspace = client
        .workspace(session.id)
        .await
        .wrap_err("Failed to list notes")?;

    for tab in workspace.tabs() {
        match tab.id {
            NoteId::Persisted(id) => println!("{id}\t{}", tab.title),
            NoteId::Placeholder(_) => println!("No notes yet"),
        }
    }
    Ok(())
}

pub async fn show(client: &Client, id: u64) -> Result<()> {
    let note = client
        .notes()
        .get(id)
        .await
        .wrap_err_with(|| format!("Failed to fetch note {id}"))?;

    println!("# {}", note.title);
    if let Some(tx_hash) = &note.tx_hash {
        println!("Paid with transaction {tx_hash}");
    }
    println!();
    println!("{}", note.content);
    Ok(())
}

pub async fn update(
    client: &Client,
    id: u64,
    title: Option<String>,
    content: Option<String>,
) -> Result<()> {
    let session = require_login()?;
    if title.is_none() && content.is_none() {
        return Err(eyre!("Nothing to update")).suggestion("pass --title and/or --content");
    }

    let existing = client
        .notes()
        .get(id)
        .await
        .wrap_err_with(|| format!("Failed to fetch note {id}"))?;
    let draft = NoteDraft {
        id: NoteId::Persisted(id),
        title: title.unwrap_or(existing.title),
        content: content.unwrap_or(existing.content),
    };

    let mut coordinator = client.save_coordinator(session.id);
    match coordinator.request_save(&draft).await? {
        SaveOutcome::Updated(record) => println!("✅ Note {} updated", record.id),
        other => warn!("Unexpected outcome for an update: {other:?}"),
    }
    Ok(())
}

pub async fn delete(client: &Client, id: u64) -> Result<()> {
    let _session = require_login()?;
    client
        .notes()
        .delete(id)
        .await
        .wrap_err_with(|| format!("Failed to delete note {id}"))?;
    println!("Note {id} deleted");
    Ok(())
}

/// Only for payments that already went through: nothing is paid here.
pub async fn create(client: &Client, title: String, content: String, tx_hash: &str) -> Result<()> {
    let session = require_login()?;
    let tx_hash = TxHash::from_str(tx_hash.trim())
        .wrap_err("Invalid transaction hash")
        .suggestion("a transaction hash is 64 hexadecimal characters")?;
    let draft = NoteDraft {
        id: NoteId::Placeholder(0),
        title,
        content,
    };
    draft.validate()?;

    let status = client.chain().transaction_status(&tx_hash).await;
    match &status {
        Ok(status) => info!("Transaction {tx_hash} is {status:?}"),
        Err(err) => warn!("Could not check transaction {tx_hash}: {err}"),
    }

    let mut coordinator = client.save_coordinator(session.id);
    let outcome = coordinator
        .resume_paid(&draft, tx_hash)
        .await
        .wrap_err("Failed to create the note")
        .with_suggestion(|| {
            format!("keep the transaction hash {tx_hash}, it is proof of the payment")
        })?;
    match outcome {
        SaveOutcome::Created { record, .. } => {
            println!("✅ Note {} saved with transaction {tx_hash}", record.id)
        }
        other => warn!("Unexpected outcome for a paid note: {other:?}"),
    }
    Ok(())
}
