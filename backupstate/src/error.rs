/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use thiserror::Error;

/// The backup service broke the request/response contract.
///
/// Responses are matched to the queried nodes by position, so a
/// response of a different length cannot be interpreted safely.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("backup service returned {got} responses for {sent} queried nodes")]
    ResponseLengthMismatch { sent: usize, got: usize },
}
