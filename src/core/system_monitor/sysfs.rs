//! Small helpers for reading single values out of sysfs/procfs files.

use std::fs;
use std::path::Path;

use crate::error::{BarError, Result};

/// Read the first line of `path`, trimmed.
pub fn read_line<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| BarError::io(path, e))?;
    Ok(contents.lines().next().unwrap_or("").trim().to_string())
}

/// Read an unsigned integer from the first line of `path`.
pub fn read_uint<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path = path.as_ref();
    let line = read_line(path)?;
    line.parse().map_err(|_| BarError::parse(path, line))
}

/// Read a signed integer from the first line of `path`.
pub fn read_int<P: AsRef<Path>>(path: P) -> Result<i64> {
    let path = path.as_ref();
    let line = read_line(path)?;
    line.parse().map_err(|_| BarError::parse(path, line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_line_trims_and_takes_first_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("value");
        fs::write(&path, "  42 \nignored\n").unwrap();
        assert_eq!(read_line(&path).unwrap(), "42");
        assert_eq!(read_uint(&path).unwrap(), 42);
        assert_eq!(read_int(&path).unwrap(), 42);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_uint(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, BarError::Io { .. }));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("value");
        fs::write(&path, "n/a\n").unwrap();
        match read_uint(&path).unwrap_err() {
            BarError::Parse { value, .. } => assert_eq!(value, "n/a"),
            other => panic!("unexpected error: {other}"),
        }
        fs::write(&path, "-3\n").unwrap();
        assert!(read_uint(&path).is_err());
        assert_eq!(read_int(&path).unwrap(), -3);
    }
}
