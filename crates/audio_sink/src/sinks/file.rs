//! FileTransport - raw bytes into a local file, no container header

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use contracts::{AudioTransport, BackendKind, ContractError};
use tracing::{debug, error, info, instrument, trace};

/// Sink that writes audio bytes to disk
///
/// Control flags are never written: they mean nothing inside a raw audio file.
#[derive(Debug)]
pub struct FileTransport {
    path: PathBuf,
    file: Option<File>,
    debug: u32,
}

impl FileTransport {
    /// Open `path` write-only, creating it if missing
    ///
    /// Existing content is not truncated; writes start at offset 0.
    #[instrument(
        name = "file_transport_open",
        skip(path, debug),
        fields(file = %path.as_ref().display())
    )]
    pub fn open(path: impl AsRef<Path>, debug: u32) -> Result<Self, ContractError> {
        let path = path.as_ref().to_path_buf();

        let mut options = OpenOptions::new();
        options.write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let file = options.open(&path).map_err(|e| {
            ContractError::sink_open("file", format!("{}: {}", path.display(), e))
        })?;

        if debug > 0 {
            info!(sink = "file", path = %path.display(), "Output file opened");
        }

        Ok(Self {
            path,
            file: Some(file),
            debug,
        })
    }
}

/// Write until the buffer is done or the OS stops accepting bytes
fn write_counted(mut file: &File, buf: &[u8]) -> usize {
    let mut written = 0;
    while written < buf.len() {
        match file.write(&buf[written..]) {
            Ok(0) => {
                error!(sink = "file", len = buf.len(), written, "Write returned zero");
                break;
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                error!(sink = "file", len = buf.len(), written, error = %e, "Write failed");
                break;
            }
        }
    }
    written
}

impl AudioTransport for FileTransport {
    fn kind(&self) -> BackendKind {
        BackendKind::File
    }

    fn accepts_control(&self) -> bool {
        false
    }

    fn send(&self, buf: &[u8], _port: u16, is_ctrl: bool) -> usize {
        if buf.is_empty() || is_ctrl {
            return 0;
        }
        let Some(file) = self.file.as_ref() else {
            return 0;
        };

        let written = write_counted(file, buf);
        if self.debug >= 10 {
            trace!(sink = "file", bytes = written, "Wrote");
        }
        written
    }

    fn close(&mut self) {
        if self.file.take().is_some() {
            debug!(sink = "file", path = %self.path.display(), "Output file closed");
        }
    }
}
