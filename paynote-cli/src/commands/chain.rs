// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use cardanolib::{Lovelace, TxStatus};
use color_eyre::{eyre::Context, Result, Section};
use paynote::{Client, TxHash};
use std::str::FromStr;

pub async fn params(client: &Client) -> Result<()> {
    let network = client.chain().network();
    println!("Fetching protocol parameters for {network}...");
    let fetched = client.chain().fetch_protocol_parameters().await;

    println!("{}", serde_json::to_string_pretty(&fetched.params)?);
    if fetched.is_degraded() {
        println!("Defaults used for: {}", fetched.defaulted.join(", "));
    }
    Ok(())
}

pub async fn status(client: &Client, tx_hash: &str) -> Result<()> {
    let tx_hash = TxHash::from_str(tx_hash.trim())
        .wrap_err("Invalid transaction hash")
        .suggestion("a transaction hash is 64 hexadecimal characters")?;
    let status = client
        .chain()
        .transaction_status(&tx_hash)
        .await
        .wrap_err("Failed to query the indexer")?;

    match status {
        TxStatus::Submitted => println!("Transaction {tx_hash} is not in a block yet"),
        TxStatus::Confirmed { block_height } => {
            println!("Transaction {tx_hash} confirmed in block {block_height}")
        }
    }
    println!("{}", client.chain().network().explorer_tx_url(&tx_hash));
    Ok(())
}

pub fn parse_amount(value: &str) -> Result<()> {
    let amount = Lovelace::from_str(value)
        .wrap_err_with(|| format!("{value:?} is not a lovelace amount"))
        .suggestion("amounts are whole numbers of lovelace, 1 ADA is 1000000")?;
    println!("{amount} lovelace ({} ADA)", amount.to_ada_string());
    Ok(())
}
