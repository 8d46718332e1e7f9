// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

#[macro_use]
extern crate tracing;

mod access;
mod commands;
mod opt;

use clap::Parser;
use color_eyre::Result;

use opt::Opt;
use paynote_logging::{Level, LogBuilder, LogFormat, ReloadHandle, WorkerGuard};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let opt = Opt::parse();
    let _log_guards = init_logging(&opt)?;

    // Log the full command that was run
    info!("\"{}\"", std::env::args().collect::<Vec<_>>().join(" "));
    info!("paynote client version {}", env!("CARGO_PKG_VERSION"));

    commands::handle_subcommand(opt).await?;

    Ok(())
}

fn init_logging(opt: &Opt) -> Result<(ReloadHandle, Option<WorkerGuard>)> {
    let logging_targets = vec![
        ("cardanolib".to_string(), Level::TRACE),
        ("paynote".to_string(), Level::TRACE),
        ("paynote_cli".to_string(), Level::TRACE),
        ("paynote_logging".to_string(), Level::TRACE),
    ];
    let mut log_builder = LogBuilder::new(logging_targets);
    log_builder.output_dest(opt.log_output_dest.clone());
    log_builder.format(opt.log_format.unwrap_or(LogFormat::Default));
    if let Some(files) = opt.max_log_files {
        log_builder.max_log_files(files);
    }
    if let Some(files) = opt.max_archived_log_files {
        log_builder.max_archived_log_files(files);
    }
    let guards = log_builder.initialize()?;
    Ok(guards)
}
