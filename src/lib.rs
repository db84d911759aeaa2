#![warn(missing_docs)]
//! Streaming message digests and the primitives built on them.
//!
//! [`MessageDigest`] runs SHA-1, SHA-2 and SHA-3 behind one streaming
//! interface. [`Hmac`], the key derivation functions in [`kdf`] and the SHAKE
//! family in [`shake`] are layered on top of it. The [`mt`] module provides
//! the 32 and 64-bit Mersenne Twister generators, and [`sampler`] draws
//! uniform values from integer and floating point ranges.
//!
//! # Example
//! ```
//! use mdigest::{DigestKind, Hmac, MessageDigest};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!   let kind: DigestKind = "sha2-256".parse()?;
//!   let mut md = MessageDigest::new(kind);
//!   md.update(b"hello ");
//!   let output = md.digest(b"world");
//!   println!("Result: {}", hex::encode(&output));
//!
//!   let mut mac = Hmac::new(kind, b"key");
//!   let tag = mac.compute(b"hello world");
//!   assert_eq!(tag.len(), 32);
//!
//!   Ok(())
//! }
//! ```
mod backend;
/// `error` holds the crate error type.
pub mod error;
/// `hmac` is keyed-hash message authentication (RFC 2104).
pub mod hmac;
/// `kdf` holds the HKDF, ANS X9.63 and MGF1 key derivation functions.
pub mod kdf;
/// `md` is the streaming message digest engine.
pub mod md;
/// `mt` holds the 32 and 64-bit Mersenne Twister generators.
pub mod mt;
/// `sampler` draws uniform values from integer and floating point ranges.
pub mod sampler;
/// `shake` holds the SHAKE extendable-output functions and their incremental reader.
pub mod shake;

pub use error::{Error, Result};
pub use hmac::Hmac;
pub use kdf::{hkdf, hkdf_expand, hkdf_extract, mgf1, x963_kdf};
pub use md::{Construction, DigestKind, MessageDigest};
pub use mt::{MersenneTwister, Mt19937, Mt19937_64, MtKind};
pub use sampler::{Interval, RandomRange, SampleRange, SampleUniform, UnitSource};
pub use shake::{Shake, ShakeKind, Xof, XofKind};
