/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use std::io;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
#[error("{msg}: {source}")]
pub(crate) struct IOErrorContext {
    msg: String,
    source: std::io::Error,
}

pub fn from_err_msg(source: io::Error, msg: String) -> io::Error {
    let kind = source.kind();
    let error = IOErrorContext { msg, source };
    io::Error::new(kind, error)
}

pub fn from_err_msg_path(
    err: io::Error,
    msg: impl AsRef<str>,
    path: impl AsRef<Path>,
) -> io::Error {
    let msg = format!("{}: '{}'", msg.as_ref(), path.as_ref().display());
    from_err_msg(err, msg)
}

pub trait IOContext<T> {
    fn io_context(self, msg: impl FnOnce() -> String) -> io::Result<T>;

    fn path_context(self, msg: &str, path: impl AsRef<Path>) -> io::Result<T>
    where
        Self: Sized,
    {
        let msg = format!("{}: '{}'", msg, path.as_ref().display());
        self.io_context(move || msg)
    }
}

impl<T> IOContext<T> for std::io::Result<T> {
    fn io_context(self, msg: impl FnOnce() -> String) -> io::Result<T> {
        self.map_err(|err| from_err_msg(err, msg()))
    }
}
