//! BLAKE3 compression core.
//!
//! A pure function from (chaining value, block, counter, block length, flags)
//! to a 16-word output. The first 8 output words are the new chaining value;
//! the full 16 words are only needed at the tree root, where they seed the
//! extended output stream.
//!
//! This is the one place where bit-exactness matters: any deviation from the
//! standard round function breaks interoperability with other BLAKE3
//! implementations.

#![allow(clippy::indexing_slicing)] // Fixed-size arrays + block parsing

use crate::BLOCK_LEN;

// Domain-separation flags. Passed explicitly into `compress` so the core
// stays a pure function.
pub(crate) const CHUNK_START: u32 = 1 << 0;
pub(crate) const CHUNK_END: u32 = 1 << 1;
pub(crate) const PARENT: u32 = 1 << 2;
pub(crate) const ROOT: u32 = 1 << 3;
pub(crate) const KEYED_HASH: u32 = 1 << 4;
pub(crate) const DERIVE_KEY_CONTEXT: u32 = 1 << 5;
pub(crate) const DERIVE_KEY_MATERIAL: u32 = 1 << 6;

/// Initialization vector, shared with BLAKE2s and SHA-256.
pub(crate) const IV: [u32; 8] = [
  0x6A09_E667,
  0xBB67_AE85,
  0x3C6E_F372,
  0xA54F_F53A,
  0x510E_527F,
  0x9B05_688C,
  0x1F83_D9AB,
  0x5BE0_CD19,
];

/// BLAKE3 message schedule.
///
/// `MSG_SCHEDULE[round][i]` gives the index of the message word to use.
const MSG_SCHEDULE: [[usize; 16]; 7] = [
  [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
  [2, 6, 3, 10, 7, 0, 4, 13, 1, 11, 12, 5, 9, 14, 15, 8],
  [3, 4, 10, 12, 13, 2, 7, 14, 6, 5, 9, 0, 11, 15, 8, 1],
  [10, 7, 12, 9, 14, 3, 13, 15, 4, 0, 11, 2, 5, 8, 1, 6],
  [12, 13, 9, 11, 15, 10, 14, 8, 7, 2, 5, 3, 0, 1, 6, 4],
  [9, 14, 11, 5, 8, 12, 15, 1, 13, 3, 0, 10, 2, 6, 4, 7],
  [11, 15, 5, 0, 1, 9, 8, 6, 14, 10, 2, 12, 3, 4, 7, 13],
];

#[inline(always)]
fn g(a: &mut u32, b: &mut u32, c: &mut u32, d: &mut u32, x: u32, y: u32) {
  *a = a.wrapping_add(*b).wrapping_add(x);
  *d = (*d ^ *a).rotate_right(16);
  *c = c.wrapping_add(*d);
  *b = (*b ^ *c).rotate_right(12);
  *a = a.wrapping_add(*b).wrapping_add(y);
  *d = (*d ^ *a).rotate_right(8);
  *c = c.wrapping_add(*d);
  *b = (*b ^ *c).rotate_right(7);
}

/// The BLAKE3 compression function.
///
/// Deterministic and side-effect free. `block_len` is the number of message
/// bytes in the block (trailing bytes must be zero); `counter` is the chunk
/// index for chunk blocks, zero for parent nodes, and the output-block index
/// for root output blocks.
pub(crate) fn compress(
  chaining_value: &[u32; 8],
  block_words: &[u32; 16],
  counter: u64,
  block_len: u32,
  flags: u32,
) -> [u32; 16] {
  let m = block_words;

  let mut v0 = chaining_value[0];
  let mut v1 = chaining_value[1];
  let mut v2 = chaining_value[2];
  let mut v3 = chaining_value[3];
  let mut v4 = chaining_value[4];
  let mut v5 = chaining_value[5];
  let mut v6 = chaining_value[6];
  let mut v7 = chaining_value[7];
  let mut v8 = IV[0];
  let mut v9 = IV[1];
  let mut v10 = IV[2];
  let mut v11 = IV[3];
  let mut v12 = counter as u32;
  let mut v13 = (counter >> 32) as u32;
  let mut v14 = block_len;
  let mut v15 = flags;

  macro_rules! round {
    ($r:expr) => {{
      let s = &MSG_SCHEDULE[$r];

      g(&mut v0, &mut v4, &mut v8, &mut v12, m[s[0]], m[s[1]]);
      g(&mut v1, &mut v5, &mut v9, &mut v13, m[s[2]], m[s[3]]);
      g(&mut v2, &mut v6, &mut v10, &mut v14, m[s[4]], m[s[5]]);
      g(&mut v3, &mut v7, &mut v11, &mut v15, m[s[6]], m[s[7]]);

      g(&mut v0, &mut v5, &mut v10, &mut v15, m[s[8]], m[s[9]]);
      g(&mut v1, &mut v6, &mut v11, &mut v12, m[s[10]], m[s[11]]);
      g(&mut v2, &mut v7, &mut v8, &mut v13, m[s[12]], m[s[13]]);
      g(&mut v3, &mut v4, &mut v9, &mut v14, m[s[14]], m[s[15]]);
    }};
  }

  round!(0);
  round!(1);
  round!(2);
  round!(3);
  round!(4);
  round!(5);
  round!(6);

  // Feed-forward. The low half becomes the new chaining value; the high half
  // is only consumed at the root, where the full 16 words seed the output
  // stream.
  v0 ^= v8;
  v1 ^= v9;
  v2 ^= v10;
  v3 ^= v11;
  v4 ^= v12;
  v5 ^= v13;
  v6 ^= v14;
  v7 ^= v15;

  v8 ^= chaining_value[0];
  v9 ^= chaining_value[1];
  v10 ^= chaining_value[2];
  v11 ^= chaining_value[3];
  v12 ^= chaining_value[4];
  v13 ^= chaining_value[5];
  v14 ^= chaining_value[6];
  v15 ^= chaining_value[7];

  [v0, v1, v2, v3, v4, v5, v6, v7, v8, v9, v10, v11, v12, v13, v14, v15]
}

#[inline(always)]
pub(crate) fn first_8_words(words: [u32; 16]) -> [u32; 8] {
  [
    words[0], words[1], words[2], words[3], words[4], words[5], words[6], words[7],
  ]
}

#[inline(always)]
pub(crate) fn words8_from_le_bytes(bytes: &[u8; 32]) -> [u32; 8] {
  let (chunks, _) = bytes.as_chunks::<4>();
  let mut words = [0u32; 8];
  for (w, c) in words.iter_mut().zip(chunks) {
    *w = u32::from_le_bytes(*c);
  }
  words
}

#[inline(always)]
pub(crate) fn words16_from_le_bytes(bytes: &[u8; BLOCK_LEN]) -> [u32; 16] {
  let (chunks, _) = bytes.as_chunks::<4>();
  let mut words = [0u32; 16];
  for (w, c) in words.iter_mut().zip(chunks) {
    *w = u32::from_le_bytes(*c);
  }
  words
}

#[inline(always)]
pub(crate) fn words8_to_le_bytes(words: &[u32; 8]) -> [u8; 32] {
  let mut out = [0u8; 32];
  for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
    chunk.copy_from_slice(&word.to_le_bytes());
  }
  out
}

#[inline(always)]
pub(crate) fn words16_to_le_bytes(words: &[u32; 16]) -> [u8; BLOCK_LEN] {
  let mut out = [0u8; BLOCK_LEN];
  for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
    chunk.copy_from_slice(&word.to_le_bytes());
  }
  out
}
