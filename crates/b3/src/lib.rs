//! Portable BLAKE3 (hash, keyed hash, key derivation, and seekable XOF).
//!
//! This is a single-lane, dependency-free implementation suitable for
//! `no_std`. It covers the full BLAKE3 surface: the default hash, the keyed
//! hash, the two-phase key derivation function, and arbitrary-length,
//! seekable output.
//!
//! # Quick Start
//!
//! ```
//! use b3::{Blake3, Digest};
//!
//! // One-shot computation
//! let hash = Blake3::digest(b"hello world");
//!
//! // Streaming computation
//! let mut hasher = Blake3::new();
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//! assert_eq!(hasher.finalize(), hash);
//! ```
//!
//! The digest never depends on how updates were split: any sequence of
//! `update` calls carrying the same bytes produces the same output.
//!
//! # Extendable output
//!
//! ```
//! use b3::{Blake3, Digest, Xof};
//!
//! let mut xof = Blake3::xof(b"some input");
//! let mut out = [0u8; 100];
//! xof.squeeze(&mut out);
//!
//! // Random access into the output stream.
//! let mut tail = [0u8; 36];
//! xof.set_position(64);
//! xof.squeeze(&mut tail);
//! assert_eq!(tail, out[64..]);
//! ```
//!
//! # Fallibility Discipline
//!
//! The algorithm has no recoverable error states: every input length and
//! every output length, including zero, is valid. Library code denies
//! `unwrap`, `expect`, and indexing outside fixed-size hot paths.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod chunk;
mod compress;
mod hasher;
mod output;

pub use hasher::Blake3;
pub use output::Blake3Xof;
pub use traits::{Digest, Xof};

/// Digest size in bytes (the default output length).
pub const OUT_LEN: usize = 32;

/// Key size in bytes for the keyed hash mode.
pub const KEY_LEN: usize = 32;

/// Compression block size in bytes.
pub const BLOCK_LEN: usize = 64;

/// Chunk size in bytes: the leaf unit of the hash tree.
pub const CHUNK_LEN: usize = 1024;

/// Maximum depth of the hash tree.
///
/// The chaining-value stack holds `MAX_DEPTH + 1` entries because merging is
/// lazy: a completed subtree is only merged once the next chunk proves that
/// no further input can extend it.
pub const MAX_DEPTH: usize = 54;

/// The version of the BLAKE3 C API this crate is compatible with.
///
/// Also the crate version.
#[inline]
#[must_use]
pub fn version() -> &'static str {
  env!("CARGO_PKG_VERSION")
}
