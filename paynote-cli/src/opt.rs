// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use clap::Parser;
use paynote_logging::{LogFormat, LogOutputDest};

use crate::commands::SubCmd;

// Please do not remove the blank lines in these doc comments.
// They are used for inserting line breaks when the help menu is rendered in the UI.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Opt {
    /// Specify the logging output destination.
    ///
    /// Valid values are "stdout", "stderr", "data-dir", or a custom path.
    ///
    /// `data-dir` is the default value.
    ///
    /// The data directory location is platform specific:
    ///  - Linux: $HOME/.local/share/paynote/client/logs
    ///  - macOS: $HOME/Library/Application Support/paynote/client/logs
    ///  - Windows: C:\Users\<username>\AppData\Roaming\paynote\client\logs
    #[allow(rustdoc::invalid_html_tags)]
    #[clap(long, value_parser = LogOutputDest::parse_from_str, verbatim_doc_comment, default_value = "data-dir")]
    pub log_output_dest: LogOutputDest,

    /// Specify the logging format.
    ///
    /// Valid values are "default" or "json".
    ///
    /// If the argument is not used, the default format will be applied.
    #[clap(long, value_parser = LogFormat::parse_from_str, verbatim_doc_comment)]
    pub log_format: Option<LogFormat>,

    /// Maximum number of uncompressed log files kept in a log directory.
    ///
    /// Ignored when logging to "stdout" or "stderr".
    ///
    /// Older files are compressed once this is reached.
    #[clap(long, verbatim_doc_comment)]
    pub max_log_files: Option<usize>,

    /// Maximum number of compressed log files kept on top of `--max-log-files`.
    ///
    /// Ignored when logging to "stdout" or "stderr".
    ///
    /// The oldest compressed files are deleted once this is reached.
    #[clap(long, verbatim_doc_comment)]
    pub max_archived_log_files: Option<usize>,

    /// Available sub commands.
    #[clap(subcommand)]
    pub command: SubCmd,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ChainCmd, NotesCmd};

    #[test]
    fn create_requires_a_transaction_hash() {
        let result = Opt::try_parse_from(["paynote", "notes", "create", "--title", "t"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_chain_status() -> eyre::Result<()> {
        let opt = Opt::try_parse_from([
            "paynote",
            "--log-output-dest",
            "stdout",
            "chain",
            "status",
            "abc",
        ])?;
        assert!(matches!(opt.log_output_dest, LogOutputDest::Stdout));
        match opt.command {
            SubCmd::Chain {
                command: ChainCmd::Status { tx_hash },
            } => assert_eq!(tx_hash, "abc"),
            other => panic!("unexpected command {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn log_file_limits_are_read() -> eyre::Result<()> {
        let opt = Opt::try_parse_from([
            "paynote",
            "--max-log-files",
            "3",
            "--max-archived-log-files",
            "12",
            "account",
            "whoami",
        ])?;
        assert_eq!(opt.max_log_files, Some(3));
        assert_eq!(opt.max_archived_log_files, Some(12));

        let opt = Opt::try_parse_from(["paynote", "account", "whoami"])?;
        assert_eq!(opt.max_log_files, None);
        Ok(())
    }

    #[test]
    fn update_fields_are_optional() -> eyre::Result<()> {
        let opt = Opt::try_parse_from(["paynote", "notes", "update", "7", "--content", "body"])?;
        match opt.command {
            SubCmd::Notes {
                command: NotesCmd::Update { id, title, content },
            } => {
                assert_eq!(id, 7);
                assert_eq!(title, None);
                assert_eq!(content.as_deref(), Some("body"));
            }
            other => panic!("unexpected command {other:?}"),
        }
        Ok(())
    }
}
