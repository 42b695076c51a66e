/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

//! Common types shared by the backup state tracking crates.

pub mod node;

pub use crate::node::Node;
