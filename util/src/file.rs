/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use std::fs::File;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::from_err_msg_path;
use crate::errors::IOContext;

/// Replace the contents of `path` atomically.
///
/// `op` writes into a temporary file created in the same directory. The
/// temporary file is then renamed over `path`. A concurrent reader sees
/// either the old contents or the new contents, never a partial write.
pub fn atomic_write(path: &Path, op: impl FnOnce(&mut File) -> io::Result<()>) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) => dir,
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "cannot atomically write to '{}': no parent directory",
                    path.display()
                ),
            ));
        }
    };
    let mut temp = NamedTempFile::new_in(dir).path_context("error creating temp file under", dir)?;
    op(temp.as_file_mut()).path_context("error writing temp file for", path)?;
    temp.persist(path)
        .map(|_| ())
        .map_err(|e| from_err_msg_path(e.error, "error renaming temp file over", path))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_atomic_write_creates_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("f");
        atomic_write(&path, |f| f.write_all(b"contents")).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"contents");
    }

    #[test]
    fn test_atomic_write_replaces_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("f");
        fs::write(&path, b"old").unwrap();
        atomic_write(&path, |f| f.write_all(b"new")).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_atomic_write_failed_op_keeps_old_contents() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("f");
        fs::write(&path, b"old").unwrap();
        let res = atomic_write(&path, |_| Err(io::Error::from(io::ErrorKind::Other)));
        assert!(res.is_err());
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("f");
        atomic_write(&path, |f| f.write_all(b"contents")).unwrap();
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
