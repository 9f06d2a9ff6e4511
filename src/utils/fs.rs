//! File system utility functions
//!
//! Owner-only writes and line reads for files that may hold credentials.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, instrument};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

/// Permission bits for files only their owner may read or write
pub const PRIVATE_MODE: u32 = 0o600;

/// Utility struct for file system operations
#[derive(Debug, Default)]
pub struct FileSystemUtils;

impl FileSystemUtils {
    /// Create a new file system utilities instance
    pub fn new() -> Self {
        Self
    }

    /// Write `contents`, truncating, with owner-only permissions.
    ///
    /// A new file is created with mode 0600; an existing one is narrowed
    /// to 0600 before anything is written to it.
    #[instrument(skip(self, contents))]
    pub fn write_private_file<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        path: P,
        contents: &[u8],
    ) -> io::Result<()> {
        let path = path.as_ref();
        debug!("Writing private file: {}", path.display());

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(PRIVATE_MODE);

        let mut file = options.open(path)?;
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(PRIVATE_MODE))?;

        file.write_all(contents)?;
        file.flush()?;
        debug!("Wrote {} bytes", contents.len());
        Ok(())
    }

    /// Read a file's lines without their `\n` or `\r\n` endings, `None` if
    /// the file does not exist
    #[instrument(skip(self))]
    pub fn read_lines_if_exists<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        path: P,
    ) -> io::Result<Option<Vec<String>>> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(contents) => {
                let lines: Vec<String> = contents.lines().map(String::from).collect();
                debug!("Read {} line(s) from {}", lines.len(), path.display());
                Ok(Some(lines))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("File does not exist: {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Permission bits of a file (Unix only)
    #[cfg(unix)]
    pub fn mode<P: AsRef<Path>>(&self, path: P) -> io::Result<u32> {
        Ok(fs::metadata(path)?.permissions().mode() & 0o777)
    }
}
