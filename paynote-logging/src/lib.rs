// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

mod appender;
mod error;
mod layers;

use crate::error::Result;
use layers::TracingLayers;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;
use tracing_core::dispatcher::DefaultGuard;
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt};

pub use error::Error;
pub use layers::{ReloadHandle, LOG_ENV_VAR};
pub use tracing_appender::non_blocking::WorkerGuard;

// re-exporting the tracing crate's Level as it is used in our public API
pub use tracing_core::Level;

/// Where log lines end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutputDest {
    Stderr,
    Stdout,
    Path(PathBuf),
}

impl LogOutputDest {
    /// Accepts `stdout`, `stderr`, `data-dir` or a directory path.
    ///
    /// `data-dir` resolves to a timestamped folder under `<data dir>/paynote/client/logs`.
    pub fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "stdout" => Ok(LogOutputDest::Stdout),
            "stderr" => Ok(LogOutputDest::Stderr),
            "data-dir" => {
                let dir = dirs_next::data_dir().ok_or(Error::NoDataDir)?;
                Ok(LogOutputDest::Path(timestamped_log_dir(dir)))
            }
            // may not exist yet, it is created when logging starts
            value => Ok(LogOutputDest::Path(PathBuf::from(value))),
        }
    }
}

impl std::fmt::Display for LogOutputDest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LogOutputDest::Stderr => write!(f, "stderr"),
            LogOutputDest::Stdout => write!(f, "stdout"),
            LogOutputDest::Path(p) => write!(f, "{}", p.to_string_lossy()),
        }
    }
}

fn timestamped_log_dir(data_dir: PathBuf) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    data_dir
        .join("paynote")
        .join("client")
        .join("logs")
        .join(format!("log_{timestamp}"))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    Default,
    Json,
}

impl LogFormat {
    pub fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "default" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Default => "default",
            LogFormat::Json => "json",
        }
    }
}

/// Configures the subscriber the binary installs once at startup.
pub struct LogBuilder {
    default_logging_targets: Vec<(String, Level)>,
    output_dest: LogOutputDest,
    format: LogFormat,
    uncompressed_files: Option<usize>,
    compressed_files: Option<usize>,
    announce: bool,
}

impl LogBuilder {
    /// `default_logging_targets` apply unless `PAYNOTE_LOG` is set. Output goes to stderr in
    /// the default format until changed.
    pub fn new(default_logging_targets: Vec<(String, Level)>) -> Self {
        Self {
            default_logging_targets,
            output_dest: LogOutputDest::Stderr,
            format: LogFormat::Default,
            uncompressed_files: None,
            compressed_files: None,
            announce: true,
        }
    }

    pub fn output_dest(&mut self, output_dest: LogOutputDest) {
        self.output_dest = output_dest;
    }

    pub fn format(&mut self, format: LogFormat) {
        self.format = format;
    }

    /// Only used when logging to a directory.
    pub fn max_log_files(&mut self, files: usize) {
        self.uncompressed_files = Some(files);
    }

    /// Compressed files kept on top of [`LogBuilder::max_log_files`].
    pub fn max_archived_log_files(&mut self, files: usize) {
        self.compressed_files = Some(files);
    }

    /// Whether to tell the user on stdout where the logs go.
    pub fn print_updates_to_stdout(&mut self, print: bool) {
        self.announce = print;
    }

    /// Installs the global subscriber. Hold on to the returned guard until exit or buffered
    /// file output is lost.
    pub fn initialize(self) -> Result<(ReloadHandle, Option<WorkerGuard>)> {
        let mut layers = TracingLayers::default();
        let reload_handle = layers.fmt_layer(
            self.default_logging_targets,
            &self.output_dest,
            self.format,
            self.uncompressed_files,
            self.compressed_files,
            self.announce,
        )?;

        let installed = tracing_subscriber::registry()
            .with(layers.layers)
            .try_init();
        if let Err(err) = installed {
            eprintln!("Logging was already initialized: {err}");
        }

        Ok((reload_handle, layers.log_appender_guard))
    }

    /// Scoped logging for a single test, writing to stdout.
    ///
    /// Sets `PAYNOTE_LOG` so that the test's own target and every paynote crate log at TRACE.
    /// The subscriber lives as long as the returned guard, so this is safe to call from
    /// several `#[tokio::test]` functions in the same binary.
    pub fn init_single_threaded_tokio_test(test_file_name: &str) -> DefaultGuard {
        std::env::set_var(LOG_ENV_VAR, format!("{test_file_name}=TRACE,all"));

        let mut layers = TracingLayers::default();
        if let Err(err) = layers.fmt_layer(
            vec![],
            &LogOutputDest::Stdout,
            LogFormat::Default,
            None,
            None,
            false,
        ) {
            eprintln!("Failed to build the test logging layer: {err}");
        }
        let guard = tracing_subscriber::registry()
            .with(layers.layers)
            .set_default();
        if let Some(test_name) = std::thread::current().name() {
            info!("Running test: {test_name}");
        }
        guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LogFormatter;
    use color_eyre::Result;
    use tracing::{debug, trace, warn};
    use tracing_subscriber::{
        filter::Targets,
        fmt as tracing_fmt,
        layer::{Filter, SubscriberExt},
        reload, Layer, Registry,
    };
    use tracing_test::internal::{global_buf, MockWriter};

    fn captured_lines() -> Vec<String> {
        let buf = global_buf().lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn reload_handle_swaps_filter_at_runtime() -> Result<()> {
        let layer = tracing_fmt::layer()
            .with_ansi(false)
            .event_format(LogFormatter)
            .with_writer(MockWriter::new(global_buf()))
            .boxed();
        let initial: Box<dyn Filter<Registry> + Send + Sync> = Box::new(
            Targets::new().with_target("paynote_logging::tests", Level::DEBUG),
        );
        let (filter, handle) = reload::Layer::new(initial);
        let reload_handle = ReloadHandle(handle);
        let subscriber = tracing_subscriber::registry().with(layer.with_filter(filter));

        tracing::subscriber::with_default(subscriber, || -> Result<()> {
            trace!("below the debug threshold");
            debug!("payment modal opened");
            assert_eq!(captured_lines().len(), 1);
            assert!(captured_lines()[0].contains("payment modal opened"));

            reload_handle.modify_log_level("paynote_logging::tests=WARN")?;
            debug!("filtered after reload");
            warn!("wallet rejected the request");

            let lines = captured_lines();
            assert_eq!(lines.len(), 2);
            assert!(lines[1].contains("wallet rejected the request"));
            Ok(())
        })
    }

    #[test]
    fn output_dest_parses_known_keywords_and_paths() -> Result<()> {
        assert_eq!(LogOutputDest::parse_from_str("stdout")?, LogOutputDest::Stdout);
        assert_eq!(LogOutputDest::parse_from_str("stderr")?, LogOutputDest::Stderr);
        assert_eq!(
            LogOutputDest::parse_from_str("/tmp/paynote-logs")?,
            LogOutputDest::Path(PathBuf::from("/tmp/paynote-logs"))
        );
        Ok(())
    }

    #[test]
    fn data_dir_logs_land_under_paynote_client_logs() {
        let dir = timestamped_log_dir(PathBuf::from("/data"));
        assert!(dir.starts_with("/data/paynote/client/logs"));
        let leaf = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        assert!(leaf.starts_with("log_"));
    }

    #[test]
    fn log_format_rejects_unknown_values() {
        assert!(LogFormat::parse_from_str("yaml").is_err());
        assert_eq!(LogFormat::Json.as_str(), "json");
    }
}
