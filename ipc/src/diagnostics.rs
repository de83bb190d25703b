//! Raw frame dumps for offline inspection
//!
//! Dumps are plain binary files (readable with any hex editor). They are used
//! both for manual inspection of a message and for capturing corrupt frames
//! before the receiver gives up on them.

use crate::DumpError;
use core_types::ProcessId;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension appended to every dump file
pub const DUMP_EXTENSION: &str = ".dump";

/// Returns `<path>.dump`
pub fn dump_path(path: &Path) -> PathBuf {
    let mut target = OsString::from(path.as_os_str());
    target.push(DUMP_EXTENSION);
    PathBuf::from(target)
}

/// Returns the file stem used for dumps keyed by process
pub fn dump_label(label: &str, pid: ProcessId) -> String {
    format!("{}_pid_{}", label, pid)
}

/// Writes `bytes` to `<path>.dump` and returns the file written
pub fn write_dump(path: &Path, bytes: &[u8]) -> Result<PathBuf, DumpError> {
    let target = dump_path(path);
    fs::write(&target, bytes).map_err(|source| DumpError {
        path: target.clone(),
        source,
    })?;
    Ok(target)
}

/// Writes `bytes` to `<directory>/<label>_pid_<pid>.dump` for the calling process
pub fn dump_raw(directory: &Path, label: &str, bytes: &[u8]) -> Result<PathBuf, DumpError> {
    write_dump(
        &directory.join(dump_label(label, ProcessId::current())),
        bytes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_path_appends_extension() {
        assert_eq!(
            dump_path(Path::new("/tmp/frame")),
            PathBuf::from("/tmp/frame.dump")
        );
        assert_eq!(
            dump_path(Path::new("msg.bin")),
            PathBuf::from("msg.bin.dump")
        );
    }

    #[test]
    fn test_dump_label() {
        assert_eq!(
            dump_label("invalid_tag", ProcessId::new(77)),
            "invalid_tag_pid_77"
        );
    }

    #[test]
    fn test_write_dump_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_dump(&dir.path().join("frame"), &[7, 1, 2, 3]).unwrap();
        assert_eq!(written, dir.path().join("frame.dump"));
        assert_eq!(fs::read(&written).unwrap(), vec![7, 1, 2, 3]);
    }

    #[test]
    fn test_dump_raw_keyed_by_pid() {
        let dir = tempfile::tempdir().unwrap();
        let written = dump_raw(dir.path(), "corrupt", &[200]).unwrap();
        let expected = format!("corrupt_pid_{}.dump", std::process::id());
        assert_eq!(written.file_name().unwrap().to_str().unwrap(), expected);
        assert_eq!(fs::read(&written).unwrap(), vec![200]);
    }

    #[test]
    fn test_write_dump_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_dir").join("frame");
        let err = write_dump(&missing, &[1]).unwrap_err();
        assert_eq!(err.path, dump_path(&missing));
    }
}
