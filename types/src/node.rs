/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Number of bytes in a [`Node`].
const NODE_LEN: usize = 20;

/// A fixed-width, content-addressed commit identifier.
///
/// Only identity matters: `Node`s are compared for equality and stored
/// in sets. `Ord` exists so callers can produce deterministic orderings
/// (ex. sorted file output), not because the byte layout means anything.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Node([u8; NODE_LEN]);

#[derive(Debug, Error)]
#[error("expect {0} bytes but got {1}")]
pub struct LengthMismatchError(usize, usize);

#[derive(Debug, Error)]
#[error("{0:?} is not a {1}-character hex string")]
pub struct HexError(String, usize);

impl Node {
    pub const fn len() -> usize {
        NODE_LEN
    }

    pub const fn hex_len() -> usize {
        NODE_LEN * 2
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, LengthMismatchError> {
        if bytes.len() != NODE_LEN {
            return Err(LengthMismatchError(NODE_LEN, bytes.len()));
        }
        let mut fixed = [0u8; NODE_LEN];
        fixed.copy_from_slice(bytes);
        Ok(Node(fixed))
    }

    pub const fn from_byte_array(bytes: [u8; NODE_LEN]) -> Self {
        Node(bytes)
    }

    pub fn from_hex(hex: &[u8]) -> Result<Self, HexError> {
        let err = || HexError(String::from_utf8_lossy(hex).into_owned(), Self::hex_len());
        if hex.len() != Self::hex_len() {
            return Err(err());
        }
        let mut bytes = [0u8; NODE_LEN];
        for (i, pair) in hex.chunks(2).enumerate() {
            match (hex_nibble(pair[0]), hex_nibble(pair[1])) {
                (Some(hi), Some(lo)) => bytes[i] = (hi << 4) | lo,
                _ => return Err(err()),
            }
        }
        Ok(Node(bytes))
    }

    pub fn to_hex(&self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut out = String::with_capacity(Self::hex_len());
        for &byte in &self.0 {
            out.push(HEX[(byte >> 4) as usize] as char);
            out.push(HEX[(byte & 0xf) as usize] as char);
        }
        out
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl AsRef<[u8]> for Node {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Node(\"{}\")", self.to_hex())
    }
}

impl FromStr for Node {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.as_bytes())
    }
}

#[cfg(any(test, feature = "for-tests"))]
impl Node {
    pub fn random(rng: &mut impl rand::Rng) -> Self {
        let mut bytes = [0u8; NODE_LEN];
        rng.fill_bytes(&mut bytes);
        Node(bytes)
    }

    pub fn random_distinct(rng: &mut impl rand::Rng, count: usize) -> Vec<Self> {
        let mut nodes = Vec::new();
        let mut seen = std::collections::HashSet::new();
        while nodes.len() < count {
            let node = Self::random(rng);
            if seen.insert(node) {
                nodes.push(node);
            }
        }
        nodes
    }
}
