//! BLAKE3 benchmarks, compared against the official `blake3` crate.
//!
//! This crate is a portable single-lane implementation, so the official
//! SIMD-dispatched crate is the throughput ceiling, not the target; the
//! comparison mostly guards against regressions in the portable hot path.

use core::{hint::black_box, time::Duration};

use b3::Blake3;
use criterion::{BenchmarkId, Criterion, SamplingMode, Throughput, criterion_group, criterion_main};
use traits::{Digest as _, Xof as _};

/// Deterministic, fast pseudo-random generator suitable for benchmarks.
///
/// This is *not* cryptographically secure; it's only used to avoid
/// unrealistic all-zero / highly-structured benchmark inputs.
#[inline]
fn xorshift64star(state: &mut u64) -> u64 {
  let mut x = *state;
  x ^= x >> 12;
  x ^= x << 25;
  x ^= x >> 27;
  *state = x;
  x.wrapping_mul(0x2545F4914F6CDD1D)
}

fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut state = seed ^ (len as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
  let mut out = vec![0u8; len];
  for b in &mut out {
    *b = (xorshift64star(&mut state) >> 56) as u8;
  }
  black_box(&out);
  out
}

fn sized_inputs() -> Vec<(usize, Vec<u8>)> {
  // Edge cases plus a selection of "real-world-ish" payload sizes.
  let sizes = [0usize, 1, 32, 64, 65, 256, 1024, 1025, 4 * 1024, 64 * 1024, 1024 * 1024];
  sizes
    .into_iter()
    .map(|len| (len, pseudo_random_bytes(len, 0xB1A4_E3B1_A4E3_0001)))
    .collect()
}

fn set_throughput(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>, len: usize) {
  if len == 0 {
    group.throughput(Throughput::Elements(1));
  } else {
    group.throughput(Throughput::Bytes(len as u64));
  }
}

fn blake3_oneshot_comparison(c: &mut Criterion) {
  let inputs = sized_inputs();
  let mut group = c.benchmark_group("blake3/oneshot");
  group.sample_size(40);
  group.warm_up_time(Duration::from_secs(2));
  group.measurement_time(Duration::from_secs(4));
  group.sampling_mode(SamplingMode::Flat);

  for (len, data) in &inputs {
    set_throughput(&mut group, *len);

    group.bench_with_input(BenchmarkId::new("b3", len), data, |b, d| {
      b.iter(|| black_box(Blake3::digest(black_box(d))))
    });

    group.bench_with_input(BenchmarkId::new("official", len), data, |b, d| {
      b.iter(|| black_box(*blake3::hash(black_box(d)).as_bytes()))
    });
  }

  group.finish();
}

fn blake3_streaming(c: &mut Criterion) {
  let data_1mb = black_box(pseudo_random_bytes(1024 * 1024, 0xB1A4_E3B1_A4E3_0002));

  let mut group = c.benchmark_group("blake3/streaming");
  group.sample_size(30);
  group.warm_up_time(Duration::from_secs(2));
  group.measurement_time(Duration::from_secs(4));
  group.sampling_mode(SamplingMode::Flat);
  group.throughput(Throughput::Bytes(data_1mb.len() as u64));

  for update_len in [64usize, 1024, 64 * 1024] {
    group.bench_with_input(BenchmarkId::new("update", update_len), &data_1mb, |b, d| {
      b.iter(|| {
        let mut h = Blake3::new();
        for chunk in d.chunks(update_len) {
          h.update(chunk);
        }
        black_box(h.finalize())
      })
    });
  }

  group.finish();
}

fn blake3_xof(c: &mut Criterion) {
  let input = pseudo_random_bytes(1024, 0xB1A4_E3B1_A4E3_0003);

  let mut group = c.benchmark_group("blake3/xof");
  group.sample_size(40);
  group.warm_up_time(Duration::from_secs(2));
  group.measurement_time(Duration::from_secs(4));

  for out_len in [64usize, 1024, 64 * 1024] {
    group.throughput(Throughput::Bytes(out_len as u64));
    group.bench_with_input(BenchmarkId::new("squeeze", out_len), &out_len, |b, &n| {
      let mut out = vec![0u8; n];
      b.iter(|| {
        let mut xof = Blake3::xof(black_box(&input));
        xof.squeeze(&mut out);
        black_box(out.last().copied())
      })
    });
  }

  group.finish();
}

criterion_group!(benches, blake3_oneshot_comparison, blake3_streaming, blake3_xof);
criterion_main!(benches);
