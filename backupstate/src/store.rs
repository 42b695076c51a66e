/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use std::collections::HashSet;
use std::fs;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use sha2::Digest;
use sha2::Sha256;
use types::Node;
use util::errors::from_err_msg_path;
use util::errors::IOContext;

use crate::graph::FileGenerator;
use crate::graph::Transaction;
use crate::graph::WriteLocation;

/// The only format version this code understands. A file carrying any
/// other tag is discarded and rebuilt from the backup service.
const FORMAT_VERSION: &str = "v1";

const FILENAME_PREFIX: &str = "backedupheads.";

/// On-disk storage for the backed-up heads of one remote.
///
/// Three-part, line-oriented text format:
///
/// ```text
/// v1
/// <remote name, verbatim>
/// <hex node>
/// ...
/// ```
///
/// The filename is the `backedupheads.` prefix followed by the first 8
/// hex characters of the sha256 of the remote name, so many remotes can
/// share one directory with short, stable filenames.
pub(crate) struct HeadsFileStore {
    dir: PathBuf,
    remote_name: String,
    filename: String,
}

impl HeadsFileStore {
    pub(crate) fn new(dir: impl AsRef<Path>, remote_name: &str) -> Self {
        let digest = Sha256::digest(remote_name.as_bytes());
        let suffix: String = digest[..4].iter().map(|b| format!("{:02x}", b)).collect();
        HeadsFileStore {
            dir: dir.as_ref().to_path_buf(),
            remote_name: remote_name.to_string(),
            filename: format!("{}{}", FILENAME_PREFIX, suffix),
        }
    }

    /// Filename relative to the store directory.
    pub(crate) fn filename(&self) -> &str {
        &self.filename
    }

    fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    /// Read and validate the heads file.
    ///
    /// `Ok(None)` means there is no usable local state: the file is
    /// absent, carries an unrecognized version tag, was written for a
    /// different remote, or contains a malformed node line. None of
    /// these are errors; the caller discards local state and
    /// resynchronizes. Only I/O failures propagate.
    pub(crate) fn read(&self) -> Result<Option<Vec<Node>>> {
        let path = self.path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(from_err_msg_path(e, "error reading backedupheads file", &path).into());
            }
        };
        let mut lines = text.lines();
        match lines.next() {
            Some(FORMAT_VERSION) => {}
            version => {
                tracing::debug!(
                    "unrecognised backedupheads version {:?}, ignoring",
                    version.unwrap_or("")
                );
                return Ok(None);
            }
        }
        match lines.next() {
            Some(name) if name == self.remote_name => {}
            name => {
                tracing::debug!(
                    "backedupheads file is for a different remote ({:?} instead of {:?}), reinitializing",
                    name.unwrap_or(""),
                    self.remote_name
                );
                return Ok(None);
            }
        }
        let mut heads = Vec::new();
        for line in lines {
            match Node::from_hex(line.as_bytes()) {
                Ok(node) => heads.push(node),
                Err(e) => {
                    tracing::debug!("malformed backedupheads line ({}), reinitializing", e);
                    return Ok(None);
                }
            }
        }
        Ok(Some(heads))
    }

    /// Persist `heads`.
    ///
    /// Without a transaction the file is replaced atomically in place.
    /// With a transaction a file generator is registered instead; the
    /// coordinator writes the file exactly once, iff the commit
    /// succeeds, atomically with the transaction's other files.
    pub(crate) fn write(
        &self,
        heads: &HashSet<Node>,
        txn: Option<&mut dyn Transaction>,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .path_context("error creating backedupheads directory", &self.dir)?;
        let content = self.serialize(heads);
        match txn {
            Some(txn) => {
                let generator: FileGenerator =
                    Box::new(move |f: &mut dyn Write| f.write_all(content.as_bytes()));
                txn.add_file_generator(
                    "backedupheads",
                    PathBuf::from(&self.filename),
                    WriteLocation::Shared,
                    generator,
                );
            }
            None => {
                util::file::atomic_write(&self.path(), |f| f.write_all(content.as_bytes()))?;
            }
        }
        Ok(())
    }

    /// Heads are written in sorted hex order so identical sets produce
    /// byte-identical files.
    fn serialize(&self, heads: &HashSet<Node>) -> String {
        let mut hex_heads: Vec<String> = heads.iter().map(|h| h.to_hex()).collect();
        hex_heads.sort_unstable();
        let mut content = format!("{}\n{}\n", FORMAT_VERSION, self.remote_name);
        for head in hex_heads {
            content.push_str(&head);
            content.push('\n');
        }
        content
    }
}
