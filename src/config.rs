//! Per-tool config file of saved command-line arguments
//!
//! The file lives at `~/.<toolname>` and holds one argument per line. Its
//! arguments are placed before the live command line, so anything typed
//! by the user is parsed after them.

use crate::{
    error::{Result, TermtoolError},
    utils::fs::FileSystemUtils,
};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Location of a tool's saved arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// The config file for `tool` in the user's home directory
    pub fn for_tool(tool: &str) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| TermtoolError::home_directory(tool))?;
        Ok(Self::at(home.join(format!(".{tool}"))))
    }

    /// A config file at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved arguments in file order; a missing file means none
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Vec<String>> {
        let args = FileSystemUtils::new()
            .read_lines_if_exists(&self.path)
            .map_err(|e| TermtoolError::config_file("read", &self.path, e))?
            .unwrap_or_default();

        debug!("Loaded {} saved argument(s)", args.len());
        Ok(args)
    }

    /// Replace the saved arguments, one per line, readable only by the owner
    #[instrument(skip(self, args), fields(path = %self.path.display()))]
    pub fn write<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut contents = String::new();
        for arg in args {
            let arg = arg.as_ref();
            if arg.contains('\n') {
                return Err(TermtoolError::invalid_config_argument(arg));
            }
            contents.push_str(arg);
            contents.push('\n');
        }

        FileSystemUtils::new()
            .write_private_file(&self.path, contents.as_bytes())
            .map_err(|e| TermtoolError::config_file("write", &self.path, e))?;

        debug!("Saved config file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_has_no_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::at(temp_dir.path().join(".example"));
        assert!(config.read().unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::at(temp_dir.path().join(".example"));

        config.write(["--foo", "bar"]).unwrap();
        assert_eq!(config.read().unwrap(), ["--foo", "bar"]);
        assert_eq!(
            std::fs::read_to_string(config.path()).unwrap(),
            "--foo\nbar\n"
        );
    }

    #[test]
    fn test_write_overwrites_previous_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::at(temp_dir.path().join(".example"));

        config.write(["--foo", "bar", "--baz"]).unwrap();
        config.write(["-v"]).unwrap();
        assert_eq!(config.read().unwrap(), ["-v"]);

        config.write(Vec::<String>::new()).unwrap();
        assert!(config.read().unwrap().is_empty());
    }

    #[test]
    fn test_reads_file_saved_with_crlf_endings() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::at(temp_dir.path().join(".example"));

        std::fs::write(config.path(), "--name\r\nsaved\r\n").unwrap();
        assert_eq!(config.read().unwrap(), ["--name", "saved"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::at(temp_dir.path().join(".example"));
        config.write(["--token", "s3cret"]).unwrap();

        let mode = std::fs::metadata(config.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_rejects_multiline_argument() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigFile::at(temp_dir.path().join(".example"));

        let result = config.write(["--note", "two\nlines"]);
        assert!(matches!(
            result,
            Err(TermtoolError::InvalidConfigArgument { .. })
        ));
        assert!(!config.path().exists());
    }

    #[test]
    fn test_for_tool_uses_dotfile_in_home() {
        if let Some(home) = dirs::home_dir() {
            let config = ConfigFile::for_tool("example").unwrap();
            assert_eq!(config.path(), home.join(".example"));
        }
    }
}
