// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use std::{
    fmt,
    io::{self, Write},
    path::Path,
};
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};

const DEFAULT_LOG_FILE_STEM: &str = "paynote";
const MAX_LOG_SIZE: usize = 20 * 1024 * 1024;
const MAX_UNCOMPRESSED_LOG_FILES: usize = 10;
const MAX_LOG_FILES: usize = 1000;

/// How large a log file may grow and how many of them are retained.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RotationLimits {
    /// A file is rotated once it surpasses this many bytes.
    pub(crate) max_bytes: usize,
    /// Rotated files beyond this count are compressed.
    pub(crate) uncompressed_files: usize,
    /// Total number of files kept on disk, oldest are removed first.
    pub(crate) max_files: usize,
}

impl RotationLimits {
    /// Without a compressed count the total is just a large cap, so compression still
    /// happens past `uncompressed`.
    pub(crate) fn new(uncompressed: Option<usize>, compressed: Option<usize>) -> Self {
        let uncompressed_files = uncompressed.unwrap_or(MAX_UNCOMPRESSED_LOG_FILES);
        let max_files = match compressed {
            Some(compressed) => compressed.saturating_add(uncompressed_files),
            None => std::cmp::max(uncompressed_files, MAX_LOG_FILES),
        };
        Self {
            max_bytes: MAX_LOG_SIZE,
            uncompressed_files,
            max_files,
        }
    }
}

/// Build a non-blocking writer backed by a size-rotated file in `dir`.
///
/// The file is named after the running binary, falling back to `paynote.log`.
pub(crate) fn rotating_writer(dir: &Path, limits: RotationLimits) -> (NonBlocking, WorkerGuard) {
    let stem = std::env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_LOG_FILE_STEM.to_string());

    let file = RotatingLogFile::open(dir.join(format!("{stem}.log")), limits);

    // keep every line, the client is not hot enough for backpressure to matter
    NonBlockingBuilder::default().lossy(false).finish(file)
}

/// Log file that keeps the most recent output under a stable name so it can be followed
/// with `tail -f`, while older chunks are suffixed with a timestamp and optionally compressed.
pub(crate) struct RotatingLogFile {
    inner: FileRotate<AppendTimestamp>,
}

impl RotatingLogFile {
    pub(crate) fn open(path: impl AsRef<Path>, limits: RotationLimits) -> Self {
        let inner = FileRotate::new(
            path.as_ref(),
            AppendTimestamp::default(FileLimit::MaxFiles(limits.max_files)),
            ContentLimit::BytesSurpassed(limits.max_bytes),
            Compression::OnRotate(limits.uncompressed_files),
            #[cfg(unix)]
            None,
        );
        Self { inner }
    }
}

impl Write for RotatingLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl fmt::Debug for RotatingLogFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingLogFile").finish_non_exhaustive()
    }
}
