//! Chunk state machine.
//!
//! Accumulates up to [`CHUNK_LEN`] bytes of input, compressing full 64-byte
//! blocks as they complete. The chunk's final block is never compressed
//! eagerly: it stays buffered so `CHUNK_END` (and, at the root, `ROOT`) can
//! be applied once the caller decides no more input is coming.

#![allow(clippy::indexing_slicing)] // Fixed-size block buffer

use core::cmp::min;

use crate::{
  BLOCK_LEN, CHUNK_LEN,
  compress::{CHUNK_END, CHUNK_START, compress, first_8_words, words16_from_le_bytes},
  output::Output,
};

#[derive(Clone, Copy)]
pub(crate) struct ChunkState {
  chaining_value: [u32; 8],
  pub(crate) chunk_counter: u64,
  block: [u8; BLOCK_LEN],
  block_len: u8,
  blocks_compressed: u8,
  flags: u32,
}

impl ChunkState {
  #[inline]
  pub(crate) fn new(key_words: [u32; 8], chunk_counter: u64, flags: u32) -> Self {
    Self {
      chaining_value: key_words,
      chunk_counter,
      block: [0u8; BLOCK_LEN],
      block_len: 0,
      blocks_compressed: 0,
      flags,
    }
  }

  /// Number of input bytes this chunk has absorbed so far.
  #[inline]
  pub(crate) fn len(&self) -> usize {
    BLOCK_LEN * self.blocks_compressed as usize + self.block_len as usize
  }

  #[inline]
  fn start_flag(&self) -> u32 {
    if self.blocks_compressed == 0 { CHUNK_START } else { 0 }
  }

  /// Absorb input bytes.
  ///
  /// The caller (the hasher) routes at most `CHUNK_LEN - self.len()` bytes
  /// here, so a chunk never compresses more than 15 blocks before `output`.
  pub(crate) fn update(&mut self, mut input: &[u8]) {
    debug_assert!(self.len() + input.len() <= CHUNK_LEN, "chunk overfilled");

    while !input.is_empty() {
      // A full buffered block with more input behind it is provably not the
      // chunk's last block, so it can be compressed now.
      if self.block_len as usize == BLOCK_LEN {
        let block_words = words16_from_le_bytes(&self.block);
        self.chaining_value = first_8_words(compress(
          &self.chaining_value,
          &block_words,
          self.chunk_counter,
          BLOCK_LEN as u32,
          self.flags | self.start_flag(),
        ));
        self.blocks_compressed += 1;
        debug_assert!(self.blocks_compressed <= 15);
        self.block = [0u8; BLOCK_LEN];
        self.block_len = 0;
      }

      let want = BLOCK_LEN - self.block_len as usize;
      let take = min(want, input.len());
      self.block[self.block_len as usize..][..take].copy_from_slice(&input[..take]);
      self.block_len += take as u8;
      input = &input[take..];
    }
  }

  /// Close the chunk: produce the output node for its final block.
  ///
  /// The final block carries `CHUNK_END`, plus `CHUNK_START` when it is the
  /// chunk's only block. Whether it also carries `ROOT` is decided by the
  /// output layer, so this borrows rather than consumes the state.
  #[inline]
  pub(crate) fn output(&self) -> Output {
    // Bytes past `block_len` are zero: the buffer is zeroed at init and
    // after every compression, which is exactly the padding the final
    // (possibly partial) block needs.
    Output {
      input_chaining_value: self.chaining_value,
      block_words: words16_from_le_bytes(&self.block),
      counter: self.chunk_counter,
      block_len: u32::from(self.block_len),
      flags: self.flags | self.start_flag() | CHUNK_END,
    }
  }
}
