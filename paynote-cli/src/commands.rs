// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod account;
mod chain;
mod notes;

use clap::Subcommand;
use color_eyre::{eyre::Context, Result};
use paynote::Client;

use crate::opt::Opt;

#[derive(Subcommand, Debug)]
pub enum SubCmd {
    /// Operations related to the user account.
    Account {
        #[command(subcommand)]
        command: AccountCmd,
    },

    /// Operations related to notes of the logged in user.
    Notes {
        #[command(subcommand)]
        command: NotesCmd,
    },

    /// Read only queries against the Cardano indexer.
    Chain {
        #[command(subcommand)]
        command: ChainCmd,
    },
}

#[derive(Subcommand, Debug)]
pub enum AccountCmd {
    /// Create an account.
    Register {
        username: String,
        email: String,
        /// Prompted for when not given.
        #[arg(long)]
        password: Option<String>,
    },

    /// Log in and remember the session.
    Login {
        email: String,
        /// Prompted for when not given.
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session.
    Logout,

    /// Show the logged in user.
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum NotesCmd {
    /// List your notes.
    List,

    /// Print a note.
    Show { id: u64 },

    /// Change the title and/or content of a saved note. No payment is needed.
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note.
    Delete { id: u64 },

    /// Create a note for a payment that already went through.
    ///
    /// Use this when a payment succeeded but saving the note failed afterwards.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Hash of the transaction that paid for the note.
        #[arg(long)]
        tx_hash: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChainCmd {
    /// Print the current protocol parameters and which ones fell back to defaults.
    Params,

    /// Check whether a submitted transaction made it into a block.
    Status { tx_hash: String },

    /// Check a lovelace amount the way the payment configuration parses it.
    ParseAmount { value: String },
}

pub async fn handle_subcommand(opt: Opt) -> Result<()> {
    let cmd = opt.command;

    match cmd {
        SubCmd::Account { command } => match command {
            AccountCmd::Register {
                username,
                email,
                password,
            } => account::register(&client()?, username, email, password).await,
            AccountCmd::Login { email, password } => {
                account::login(&client()?, email, password).await
            }
            AccountCmd::Logout => account::logout(),
            AccountCmd::Whoami => account::whoami(),
        },
        SubCmd::Notes { command } => match command {
            NotesCmd::List => notes::list(&client()?).await,
            NotesCmd::Show { id } => notes::show(&client()?, id).await,
            NotesCmd::Update { id, title, content } => {
                notes::update(&client()?, id, title, content).await
            }
            NotesCmd::Delete { id } => notes::delete(&client()?, id).await,
            NotesCmd::Create {
                title,
                content,
                tx_hash,
            } => notes::create(&client()?, title, content, &tx_hash).await,
        },
        SubCmd::Chain { command } => match command {
            ChainCmd::Params => chain::params(&client()?).await,
            ChainCmd::Status { tx_hash } => chain::status(&client()?, &tx_hash).await,
            ChainCmd::ParseAmount { value } => chain::parse_amount(&value),
        },
    }
}

fn client() -> Result<Client> {
    Client::from_env().wrap_err("Failed to set up the paynote client")
}
