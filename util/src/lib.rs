/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

//! Filesystem utilities that cannot be trivially written using the
//! Rust stdlib.
//!
//! Prefer using the Rust stdlib directly if possible.

pub mod errors;
pub mod file;
