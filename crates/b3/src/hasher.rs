//! The streaming BLAKE3 hasher and its tree manager.
//!
//! The hasher feeds input to a [`ChunkState`] one chunk at a time and merges
//! completed chunk chaining values through a fixed-capacity stack. Merging is
//! lazy: a chunk's CV is pushed (and merged with completed equal-sized
//! subtrees) only once the *next* chunk arrives, because until then the chunk
//! might turn out to be the root. The tree shape is a function of the total
//! chunk count alone, so update-call boundaries never affect the digest.

#![allow(clippy::indexing_slicing)] // Fixed-capacity CV stack

use core::cmp::min;

use traits::Digest;

use crate::{
  BLOCK_LEN, CHUNK_LEN, KEY_LEN, MAX_DEPTH, OUT_LEN,
  chunk::ChunkState,
  compress::{DERIVE_KEY_CONTEXT, DERIVE_KEY_MATERIAL, IV, KEYED_HASH, PARENT, words8_from_le_bytes},
  output::{Blake3Xof, Output},
};

#[inline]
fn parent_output(left_child_cv: [u32; 8], right_child_cv: [u32; 8], key_words: [u32; 8], flags: u32) -> Output {
  let mut block_words = [0u32; 16];
  block_words[..8].copy_from_slice(&left_child_cv);
  block_words[8..].copy_from_slice(&right_child_cv);
  Output {
    input_chaining_value: key_words,
    block_words,
    counter: 0, // parent nodes always use counter 0
    block_len: BLOCK_LEN as u32,
    flags: PARENT | flags,
  }
}

#[inline]
fn parent_cv(left_child_cv: [u32; 8], right_child_cv: [u32; 8], key_words: [u32; 8], flags: u32) -> [u32; 8] {
  parent_output(left_child_cv, right_child_cv, key_words, flags).chaining_value()
}

/// BLAKE3 hasher.
///
/// Construct with [`Digest::new`] (default mode), [`new_keyed`](Self::new_keyed),
/// or [`new_derive_key`](Self::new_derive_key) /
/// [`new_derive_key_raw`](Self::new_derive_key_raw); all state is held inline
/// (no allocation), and the hasher is plain data: `Clone`, `Send`, and `Sync`.
#[derive(Clone)]
pub struct Blake3 {
  key_words: [u32; 8],
  chunk_state: ChunkState,
  cv_stack: [[u32; 8]; MAX_DEPTH + 1],
  cv_stack_len: u8,
  flags: u32,
}

impl Default for Blake3 {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Blake3 {
  #[inline]
  fn new_internal(key_words: [u32; 8], flags: u32) -> Self {
    Self {
      key_words,
      chunk_state: ChunkState::new(key_words, 0, flags),
      cv_stack: [[0u32; 8]; MAX_DEPTH + 1],
      cv_stack_len: 0,
      flags,
    }
  }

  /// Construct a new hasher for the keyed hash function.
  #[must_use]
  #[inline]
  pub fn new_keyed(key: &[u8; KEY_LEN]) -> Self {
    Self::new_internal(words8_from_le_bytes(key), KEYED_HASH)
  }

  /// Construct a new hasher for the key derivation function.
  ///
  /// The context string should be hardcoded, globally unique, and
  /// application-specific.
  #[must_use]
  #[inline]
  pub fn new_derive_key(context: &str) -> Self {
    Self::new_derive_key_raw(context.as_bytes())
  }

  /// Construct a key-derivation hasher from raw context bytes.
  ///
  /// Prefer [`new_derive_key`](Self::new_derive_key); this variant exists for
  /// callers whose context is not UTF-8.
  #[must_use]
  #[inline]
  pub fn new_derive_key_raw(context: &[u8]) -> Self {
    Self::new_internal(Self::derive_context_key_words(context), DERIVE_KEY_MATERIAL)
  }

  /// Phase one of key derivation: hash the context under
  /// `DERIVE_KEY_CONTEXT` to obtain the key for the material phase.
  fn derive_context_key_words(context: &[u8]) -> [u32; 8] {
    let mut h = Self::new_internal(IV, DERIVE_KEY_CONTEXT);
    h.update(context);
    h.root_output().root_hash_words()
  }

  /// Compute the keyed hash of `data` in one shot.
  #[inline]
  #[must_use]
  pub fn keyed_digest(key: &[u8; KEY_LEN], data: &[u8]) -> [u8; OUT_LEN] {
    let mut h = Self::new_keyed(key);
    h.update(data);
    h.finalize()
  }

  /// Compute the derived key for `key_material` under `context`, in one shot.
  #[inline]
  #[must_use]
  pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; OUT_LEN] {
    let mut h = Self::new_derive_key(context);
    h.update(key_material);
    h.finalize()
  }

  /// Compute the extendable output of `data` in one shot.
  #[inline]
  #[must_use]
  pub fn xof(data: &[u8]) -> Blake3Xof {
    let mut h = Self::new();
    h.update(data);
    h.finalize_xof()
  }

  #[inline]
  fn push_stack(&mut self, cv: [u32; 8]) {
    self.cv_stack[self.cv_stack_len as usize] = cv;
    self.cv_stack_len += 1;
  }

  #[inline]
  fn pop_stack(&mut self) -> [u32; 8] {
    self.cv_stack_len -= 1;
    self.cv_stack[self.cv_stack_len as usize]
  }

  /// Merge a completed chunk's chaining value into the tree.
  ///
  /// For each trailing zero bit of `total_chunks`, the subtree completed at
  /// that level has a partner on the stack; pop and combine through a parent
  /// node, then push the final candidate. Entries therefore always summarize
  /// strictly decreasing subtree sizes from bottom to top.
  fn add_chunk_chaining_value(&mut self, mut new_cv: [u32; 8], mut total_chunks: u64) {
    while total_chunks & 1 == 0 {
      new_cv = parent_cv(self.pop_stack(), new_cv, self.key_words, self.flags);
      total_chunks >>= 1;
    }
    self.push_stack(new_cv);
  }

  /// Fold the stack and the in-progress chunk into the root node.
  ///
  /// Only the final compression (performed by the output layer) carries
  /// `ROOT`; when the whole input fit in one chunk the chunk's own output is
  /// the root.
  fn root_output(&self) -> Output {
    let mut output = self.chunk_state.output();
    let mut parent_nodes_remaining = self.cv_stack_len as usize;
    while parent_nodes_remaining > 0 {
      parent_nodes_remaining -= 1;
      output = parent_output(
        self.cv_stack[parent_nodes_remaining],
        output.chaining_value(),
        self.key_words,
        self.flags,
      );
    }
    output
  }

  /// Finalize into a seekable extendable-output reader.
  ///
  /// Non-destructive, like [`finalize`](Digest::finalize).
  #[must_use]
  #[inline]
  pub fn finalize_xof(&self) -> Blake3Xof {
    Blake3Xof::new(self.root_output())
  }

  /// Write `out.len()` output bytes starting at stream offset `seek`.
  ///
  /// Equivalent to `finalize_xof()` followed by
  /// [`set_position`](Blake3Xof::set_position) and a single squeeze; offsets
  /// anywhere in the 2^64-byte output stream are valid and cost the same.
  #[inline]
  pub fn finalize_seek(&self, seek: u64, out: &mut [u8]) {
    use traits::Xof as _;
    let mut xof = self.finalize_xof();
    xof.set_position(seek);
    xof.squeeze(out);
  }
}

impl Digest for Blake3 {
  const OUTPUT_SIZE: usize = OUT_LEN;
  type Output = [u8; OUT_LEN];

  #[inline]
  fn new() -> Self {
    Self::new_internal(IV, 0)
  }

  fn update(&mut self, mut input: &[u8]) {
    while !input.is_empty() {
      // A full chunk with more input behind it is complete; commit its CV to
      // the tree and start the next chunk. Deferring this until more input
      // arrives is what keeps a final full chunk eligible to be the root.
      if self.chunk_state.len() == CHUNK_LEN {
        let chunk_cv = self.chunk_state.output().chaining_value();
        let total_chunks = self.chunk_state.chunk_counter + 1;
        self.add_chunk_chaining_value(chunk_cv, total_chunks);
        self.chunk_state = ChunkState::new(self.key_words, total_chunks, self.flags);
      }

      let want = CHUNK_LEN - self.chunk_state.len();
      let take = min(want, input.len());
      self.chunk_state.update(&input[..take]);
      input = &input[take..];
    }
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    self.root_output().root_hash()
  }

  /// Reset to the immediately-post-init state, keeping the configured
  /// key and mode (including a derived context key).
  #[inline]
  fn reset(&mut self) {
    *self = Self::new_internal(self.key_words, self.flags);
  }
}

#[cfg(test)]
mod tests {
  use traits::{Digest, Xof};

  use super::*;

  const KEY: &[u8; 32] = b"whats the Elvish word for friend";
  const CONTEXT: &str = "BLAKE3 2019-12-27 16:29:52 test vectors context";

  fn hex_to_bytes(hex: &str, out: &mut [u8]) {
    assert_eq!(hex.len(), out.len() * 2);
    for (i, chunk) in hex.as_bytes().chunks_exact(2).enumerate() {
      let hi = (chunk[0] as char).to_digit(16).unwrap();
      let lo = (chunk[1] as char).to_digit(16).unwrap();
      out[i] = ((hi << 4) | lo) as u8;
    }
  }

  fn hex_digest(hex: &str) -> [u8; OUT_LEN] {
    let mut out = [0u8; OUT_LEN];
    hex_to_bytes(hex, &mut out);
    out
  }

  #[test]
  fn official_vector_empty_hash_and_xof_prefix() {
    let mut hasher = Blake3::new();
    hasher.update(&[]);
    assert_eq!(
      hasher.finalize(),
      hex_digest("af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262")
    );

    let expected_xof_prefix_hex = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262e00f03e7b69af26b7faaf09fcd333050338ddfe085b8cc869ca98b206c08243a26f5487789e8f660afe6c99ef9e0c52b92e7393024a80459cf91f476f9ffdbda7001c22e159b402631f277ca96f2defdf1078282314e763699a31c5363165421cce14d";
    let mut expected_xof_prefix = [0u8; 131];
    hex_to_bytes(expected_xof_prefix_hex, &mut expected_xof_prefix);

    let mut xof = hasher.finalize_xof();
    let mut out = [0u8; 131];
    xof.squeeze(&mut out);
    assert_eq!(out, expected_xof_prefix);
  }

  #[test]
  fn official_vectors_empty_keyed_and_derive() {
    let mut keyed = Blake3::new_keyed(KEY);
    keyed.update(&[]);
    assert_eq!(
      keyed.finalize(),
      hex_digest("92b2b75604ed3c761f9d6f62392c8a9227ad0ea3f09573e783f1498a4ed60d26")
    );

    let mut dk = Blake3::new_derive_key(CONTEXT);
    dk.update(&[]);
    assert_eq!(
      dk.finalize(),
      hex_digest("2cc39783c223154fea8dfb7c1b1660f2ac2dcbd1c1de8277b0b0dd39b7e50d7d")
    );
  }

  #[test]
  fn known_single_byte_digests() {
    assert_eq!(
      Blake3::digest(&[0x00]),
      hex_digest("2d3adedff11b61f14c886e35afa036736dcd87a74d27b5c1510225d0f592e213")
    );
    assert_eq!(
      Blake3::digest(&[0x01]),
      hex_digest("48fc721fbbc172e0925fa27af1671de225ba927134802998b10a1568a188652b")
    );
    assert_eq!(
      Blake3::digest(&[0xFF]),
      hex_digest("99d44d377bc5936d8cb7f5df90713d84c7587739b4724d3d2f9af1ee0e4c8efd")
    );
  }

  fn input_pattern<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    for (i, b) in buf.iter_mut().enumerate() {
      *b = (i % 251) as u8;
    }
    buf
  }

  #[test]
  fn chunking_invariance_across_chunk_boundaries() {
    // 3 chunks + 1 byte exercises the tree-merge path from several update
    // shapes; every split must agree with the one-shot digest.
    const LEN: usize = 3 * CHUNK_LEN + 1;
    let data = input_pattern::<LEN>();
    let expected = Blake3::digest(&data);

    for split in [1usize, 64, 1023, 1024, 1025, 2048, LEN - 1] {
      let mut h = Blake3::new();
      h.update(&data[..split]);
      h.update(&data[split..]);
      assert_eq!(h.finalize(), expected, "split at {split}");
    }

    let mut one_by_chunk = Blake3::new();
    for chunk in data.chunks(CHUNK_LEN) {
      one_by_chunk.update(chunk);
    }
    assert_eq!(one_by_chunk.finalize(), expected);
  }

  #[test]
  fn finalize_is_non_destructive() {
    let data = input_pattern::<2049>();
    let mut h = Blake3::new();
    h.update(&data[..1500]);
    let first = h.finalize();
    assert_eq!(h.finalize(), first);

    // Finalizing must not disturb further updates.
    h.update(&data[1500..]);
    assert_eq!(h.finalize(), Blake3::digest(&data));
  }

  #[test]
  fn reset_restores_post_init_state() {
    let data = input_pattern::<1025>();

    let mut h = Blake3::new_keyed(KEY);
    h.update(&data);
    h.reset();
    h.update(&data);
    assert_eq!(h.finalize(), Blake3::keyed_digest(KEY, &data));

    // A derive-key hasher keeps its derived context key across reset.
    let mut dk = Blake3::new_derive_key(CONTEXT);
    dk.update(&data);
    dk.reset();
    dk.update(&data);
    assert_eq!(dk.finalize(), Blake3::derive_key(CONTEXT, &data));
  }

  #[test]
  fn modes_are_domain_separated() {
    let data = input_pattern::<64>();
    let plain = Blake3::digest(&data);
    let keyed = Blake3::keyed_digest(KEY, &data);
    let derived = Blake3::derive_key(CONTEXT, &data);
    assert_ne!(plain, keyed);
    assert_ne!(plain, derived);
    assert_ne!(keyed, derived);
  }

  #[test]
  fn finalize_seek_matches_sequential_output() {
    let data = input_pattern::<100>();
    let mut h = Blake3::new();
    h.update(&data);

    let mut stream = [0u8; 256];
    let mut xof = h.finalize_xof();
    xof.squeeze(&mut stream);

    for seek in [0u64, 1, 31, 32, 63, 64, 65, 127, 128, 200] {
      let mut out = [0u8; 40];
      h.finalize_seek(seek, &mut out);
      assert_eq!(&out[..], &stream[seek as usize..seek as usize + 40], "seek {seek}");
    }
  }

  #[test]
  fn version_is_fixed() {
    assert_eq!(crate::version(), "1.5.0");
  }
}
