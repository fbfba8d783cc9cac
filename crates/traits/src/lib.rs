//! Core hashing traits for the `b3` workspace.
//!
//! This crate provides the traits the hash implementations conform to. It is
//! `no_std` compatible and has zero dependencies.
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Digest`] | Streaming cryptographic hashes with a fixed-size output |
//! | [`Xof`] | Extendable-output functions (arbitrary-length output) |
//!
//! With the `std` feature (default), [`io`] provides [`DigestReader`](io::DigestReader)
//! and [`DigestWriter`](io::DigestWriter), which hash bytes transparently as
//! they pass through ordinary `std::io` pipelines.
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code to ensure
//! all error paths are handled explicitly.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod digest;
#[cfg(feature = "std")]
pub mod io;
mod xof;

pub use digest::Digest;
pub use xof::Xof;
