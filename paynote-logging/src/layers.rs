// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    appender::{self, RotationLimits},
    error::{Error, Result},
    LogFormat, LogOutputDest,
};
use std::collections::BTreeMap;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_core::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::Targets,
    fmt::{
        self as tracing_fmt,
        format::Writer,
        time::{FormatTime, SystemTime},
        FmtContext, FormatEvent, FormatFields, MakeWriter,
    },
    layer::Filter,
    registry::LookupSpan,
    reload::{self, Handle},
    Layer, Registry,
};

/// Env var holding the CSV of `target=LEVEL` pairs.
pub const LOG_ENV_VAR: &str = "PAYNOTE_LOG";

// Every paynote crate at TRACE
const ALL_KEYWORD: &str = "all";
// Every paynote crate at TRACE, plus the http stack at DEBUG
const VERBOSE_KEYWORD: &str = "v";

const PAYNOTE_TARGETS: [&str; 4] = ["paynote", "paynote_cli", "cardanolib", "paynote_logging"];
const HTTP_TARGETS: [&str; 3] = ["reqwest", "hyper", "hyper_util"];

type BoxedFilter = Box<dyn Filter<Registry> + Send + Sync>;

/// Handle that implements functions to change the log level on the fly.
pub struct ReloadHandle(pub(crate) Handle<BoxedFilter, Registry>);

impl ReloadHandle {
    /// Replace the active filter with the one described by `logging_value`,
    /// using the same syntax as `PAYNOTE_LOG`, e.g. `all,cardanolib=WARN`.
    pub fn modify_log_level(&self, logging_value: &str) -> Result<()> {
        let targets = get_logging_targets(logging_value)?;
        self.0.modify(|old_filter| {
            let new_filter: BoxedFilter = Box::new(Targets::new().with_targets(targets));
            *old_filter = new_filter;
        })?;

        Ok(())
    }
}

/// Single line formatter: `[time LEVEL module/span/span] message fields`.
#[derive(Default)]
pub(crate) struct LogFormatter;

impl<S, N> FormatEvent<S, N> for LogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let level = *event.metadata().level();
        let module = event.metadata().module_path().unwrap_or("<unknown module>");

        write!(writer, "[")?;
        SystemTime.format_time(&mut writer)?;
        write!(writer, " {level} {module}")?;
        ctx.visit_spans(|span| write!(writer, "/{}", span.name()))?;
        write!(writer, "] ")?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// The layers composed into the global subscriber.
#[derive(Default)]
pub(crate) struct TracingLayers {
    pub(crate) layers: Vec<Box<dyn Layer<Registry> + Send + Sync>>,
    pub(crate) log_appender_guard: Option<WorkerGuard>,
}

impl TracingLayers {
    /// Adds the formatting layer for `output_dest`, filtered by `PAYNOTE_LOG` when set and by
    /// `default_logging_targets` otherwise.
    pub(crate) fn fmt_layer(
        &mut self,
        default_logging_targets: Vec<(String, Level)>,
        output_dest: &LogOutputDest,
        format: LogFormat,
        max_uncompressed_log_files: Option<usize>,
        max_compressed_log_files: Option<usize>,
        print_updates_to_stdout: bool,
    ) -> Result<ReloadHandle> {
        let layer = match output_dest {
            LogOutputDest::Stdout => {
                if print_updates_to_stdout {
                    println!("Logging to stdout");
                }
                formatted(format, std::io::stdout)
            }
            LogOutputDest::Stderr => formatted(format, std::io::stderr),
            LogOutputDest::Path(path) => {
                std::fs::create_dir_all(path)?;
                if print_updates_to_stdout {
                    println!("Logging to directory: {path:?}");
                }
                let limits =
                    RotationLimits::new(max_uncompressed_log_files, max_compressed_log_files);
                let (writer, worker_guard) = appender::rotating_writer(path, limits);
                self.log_appender_guard = Some(worker_guard);
                formatted(format, writer)
            }
        };

        let targets = match std::env::var(LOG_ENV_VAR) {
            Ok(value) => {
                if print_updates_to_stdout {
                    println!("Using {LOG_ENV_VAR}={value}");
                }
                get_logging_targets(&value)?
            }
            Err(_) => default_logging_targets,
        };

        let target_filters: BoxedFilter = Box::new(Targets::new().with_targets(targets));
        let (filter, reload_handle) = reload::Layer::new(target_filters);
        self.layers.push(Box::new(layer.with_filter(filter)));

        Ok(ReloadHandle(reload_handle))
    }
}

/// Json events are flattened; the default format never carries ansi colours since most
/// destinations are files.
fn formatted<W>(format: LogFormat, writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => tracing_fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Default => tracing_fmt::layer()
            .with_ansi(false)
            .event_format(LogFormatter)
            .with_writer(writer)
            .boxed(),
    }
}

/// Parses a `PAYNOTE_LOG` style CSV into a list of targets.
///
/// Keywords expand to a base set of targets; anything named explicitly in the CSV overrides
/// the level the keyword would have given it. A bare target without `=LEVEL` means TRACE.
pub(crate) fn get_logging_targets(logging_env_value: &str) -> Result<Vec<(String, Level)>> {
    let mut explicit = BTreeMap::new();
    let mut all = false;
    let mut verbose = false;

    for entry in logging_env_value.split(',').map(str::trim) {
        match entry {
            "" => continue,
            ALL_KEYWORD => all = true,
            VERBOSE_KEYWORD => verbose = true,
            _ => {
                let (target, level) = match entry.split_once('=') {
                    Some((target, level)) => (target.trim(), get_log_level_from_str(level)?),
                    None => (entry, Level::TRACE),
                };
                if target.is_empty() {
                    return Err(Error::MissingTarget(entry.to_string()));
                }
                let _ = explicit.insert(target.to_string(), level);
            }
        }
    }

    let mut targets = BTreeMap::new();
    if all || verbose {
        for target in PAYNOTE_TARGETS {
            let _ = targets.insert(target.to_string(), Level::TRACE);
        }
        let http_level = if verbose { Level::DEBUG } else { Level::INFO };
        for target in HTTP_TARGETS {
            let _ = targets.insert(target.to_string(), http_level);
        }
    }
    targets.extend(explicit);

    Ok(targets.into_iter().collect())
}

fn get_log_level_from_str(log_level: &str) -> Result<Level> {
    match log_level.trim().to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(Error::UnsupportedLevel(log_level.to_string())),
    }
}
