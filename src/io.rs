//! File output for generated inputs and summaries.
//!
//! Every writer overwrites its target. Errors are returned to the caller
//! unchanged; nothing here retries or swallows a failed write.

use crate::controller::Derived;
use log::debug;
use std::fs;
use std::io::{self, Result};
use std::path::Path;

/// Writes the IVO parameter block.
///
/// # Examples
///
/// ```
/// use dcaspt2_input::io;
/// use std::path::Path;
///
/// fn main() -> std::io::Result<()> {
///     io::write_ivo_input(".ninact\n0\n.end\n", Path::new("doc_ivo.inp"))?;
///     std::fs::remove_file("doc_ivo.inp")?;
///     Ok(())
/// }
/// ```
pub fn write_ivo_input(content: &str, path: &Path) -> Result<()> {
    debug!("Writing IVO input to {}", path.display());
    fs::write(path, content)
}

/// Writes the CASPT2 main input block.
pub fn write_caspt2_input(content: &str, path: &Path) -> Result<()> {
    debug!("Writing CASPT2 input to {}", path.display());
    fs::write(path, content)
}

/// Writes the derived summary as pretty-printed JSON.
pub fn write_summary_json(derived: &Derived, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(derived)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    debug!("Writing JSON summary to {}", path.display());
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("active.ivo.inp");

        write_ivo_input("first\n", &path).unwrap();
        write_ivo_input("second\n", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("active.inp");
        assert!(write_caspt2_input(".end\n", &path).is_err());
    }
}
