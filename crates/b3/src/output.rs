//! Output node and the seekable output reader.
//!
//! An [`Output`] captures everything needed to re-run a node's final
//! compression: its input chaining value, block words, counter, block length,
//! and flags. Interior nodes only ever need the first 8 output words; the
//! root re-runs its compression with `ROOT` set and an output-block counter,
//! which yields an arbitrarily long, randomly accessible output stream.

#![allow(clippy::indexing_slicing)] // Fixed-size output blocks

use core::cmp::min;

use traits::Xof;

use crate::{
  BLOCK_LEN, OUT_LEN,
  compress::{ROOT, compress, first_8_words, words8_to_le_bytes, words16_to_le_bytes},
};

#[derive(Clone, Copy)]
pub(crate) struct Output {
  pub(crate) input_chaining_value: [u32; 8],
  pub(crate) block_words: [u32; 16],
  pub(crate) counter: u64,
  pub(crate) block_len: u32,
  pub(crate) flags: u32,
}

impl Output {
  /// The node's chaining value, as passed up the tree.
  #[inline]
  pub(crate) fn chaining_value(&self) -> [u32; 8] {
    first_8_words(compress(
      &self.input_chaining_value,
      &self.block_words,
      self.counter,
      self.block_len,
      self.flags,
    ))
  }

  #[inline]
  pub(crate) fn root_hash_words(&self) -> [u32; 8] {
    first_8_words(compress(
      &self.input_chaining_value,
      &self.block_words,
      0,
      self.block_len,
      self.flags | ROOT,
    ))
  }

  /// The 32-byte root digest.
  #[inline]
  pub(crate) fn root_hash(&self) -> [u8; OUT_LEN] {
    words8_to_le_bytes(&self.root_hash_words())
  }
}

/// Seekable BLAKE3 output reader.
///
/// Produced by [`Blake3::finalize_xof`](crate::Blake3::finalize_xof) (or the
/// [`Blake3::xof`](crate::Blake3::xof) one-shot). Conceptually the output is
/// a 2^64-byte stream; [`squeeze`](Xof::squeeze) reads it sequentially and
/// [`set_position`](Self::set_position) jumps to any offset without
/// recomputing the hash tree.
#[derive(Clone)]
pub struct Blake3Xof {
  output: Output,
  position: u64,
}

impl Blake3Xof {
  #[inline]
  pub(crate) fn new(output: Output) -> Self {
    Self { output, position: 0 }
  }

  /// Current offset into the output stream.
  #[inline]
  #[must_use]
  pub fn position(&self) -> u64 {
    self.position
  }

  /// Seek to an absolute offset in the output stream.
  ///
  /// The next [`squeeze`](Xof::squeeze) continues from `position`.
  #[inline]
  pub fn set_position(&mut self, position: u64) {
    self.position = position;
  }

  fn fill(&mut self, mut out: &mut [u8]) {
    let flags = self.output.flags | ROOT;

    while !out.is_empty() {
      // Output block `i` is the root compression re-run with counter `i`.
      let block_index = self.position / BLOCK_LEN as u64;
      let offset = (self.position % BLOCK_LEN as u64) as usize;
      let words = compress(
        &self.output.input_chaining_value,
        &self.output.block_words,
        block_index,
        self.output.block_len,
        flags,
      );
      let block = words16_to_le_bytes(&words);

      let take = min(BLOCK_LEN - offset, out.len());
      out[..take].copy_from_slice(&block[offset..offset + take]);
      out = &mut out[take..];

      // Squeezing past the end of the 2^64-byte stream is a caller bug.
      debug_assert!(
        self.position.checked_add(take as u64).is_some() || out.is_empty(),
        "output stream position overflow"
      );
      self.position = self.position.wrapping_add(take as u64);
    }
  }
}

impl Xof for Blake3Xof {
  #[inline]
  fn squeeze(&mut self, out: &mut [u8]) {
    if out.is_empty() {
      return;
    }
    self.fill(out);
  }
}
