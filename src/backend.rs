use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fmt::Debug;

/// Largest block (sponge rate) of any supported algorithm, in bytes.
pub(crate) const MAX_BLOCK_SIZE: usize = 168;

/// Domain separation suffix for fixed-output SHA-3.
pub(crate) const SHA3_SUFFIX: u8 = 0x06;
/// Domain separation suffix for SHAKE and the XOF.
pub(crate) const SHAKE_SUFFIX: u8 = 0x1f;

const SHA1_IV: [u32; 5] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476, 0xc3d2e1f0];

const SHA224_IV: [u32; 8] = [
    0xc1059ed8, 0x367cd507, 0x3070dd17, 0xf70e5939, 0xffc00b31, 0x68581511, 0x64f98fa7, 0xbefa4fa4,
];

const SHA256_IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const SHA384_IV: [u64; 8] = [
    0xcbbb9d5dc1059ed8,
    0x629a292a367cd507,
    0x9159015a3070dd17,
    0x152fecd8f70e5939,
    0x67332667ffc00b31,
    0x8eb44a8768581511,
    0xdb0c2e0d64f98fa7,
    0x47b5481dbefa4fa4,
];

const SHA512_IV: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

/// Backend is the block function family an engine dispatches to.
///
/// The round logic itself lives in the `sha1`, `sha2` and `keccak` crates;
/// this type only knows the initial state and the padding rule of each family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Backend {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Keccak,
}

impl Backend {
    /// initial_state returns the chaining value (or empty sponge) a fresh engine starts from.
    pub(crate) fn initial_state(self) -> State {
        match self {
            Backend::Sha1 => State::Sha1(SHA1_IV),
            Backend::Sha224 => State::Sha256(SHA224_IV),
            Backend::Sha256 => State::Sha256(SHA256_IV),
            Backend::Sha384 => State::Sha512(SHA384_IV),
            Backend::Sha512 => State::Sha512(SHA512_IV),
            Backend::Keccak => State::Keccak(Sponge::default()),
        }
    }

    /// padding returns the bytes to append after `total_bytes` of input so that
    /// the message ends exactly on a block boundary.
    pub(crate) fn padding(self, total_bytes: u64, block_size: usize) -> Vec<u8> {
        match self {
            Backend::Keccak => sponge_padding(total_bytes, block_size, SHA3_SUFFIX),
            Backend::Sha384 | Backend::Sha512 => length_padding(total_bytes, block_size, 16),
            Backend::Sha1 | Backend::Sha224 | Backend::Sha256 => {
                length_padding(total_bytes, block_size, 8)
            }
        }
    }
}

// FIPS 180-4 section 5.1: a 1 bit, zeros, then the message length in bits.
fn length_padding(total_bytes: u64, block_size: usize, length_field: usize) -> Vec<u8> {
    let cutoff = block_size - length_field;
    let rem = (total_bytes % block_size as u64) as usize;
    let fill = if rem < cutoff {
        cutoff - rem
    } else {
        block_size + cutoff - rem
    };

    let mut pad = vec![0u8; fill + length_field];
    pad[0] = 0x80;

    let bitlen = u128::from(total_bytes) << 3;
    let n = pad.len();
    if length_field == 16 {
        BigEndian::write_u128(&mut pad[n - 16..], bitlen);
    } else {
        BigEndian::write_u64(&mut pad[n - 8..], bitlen as u64);
    }
    pad
}

/// sponge_padding returns the pad10*1 bytes, prefixed with the domain `suffix`,
/// that bring `total_bytes` up to the next multiple of `block_size`.
///
/// A message already on a boundary gets a full block of padding.
pub(crate) fn sponge_padding(total_bytes: u64, block_size: usize, suffix: u8) -> Vec<u8> {
    let len = block_size - (total_bytes % block_size as u64) as usize;
    let mut pad = vec![0u8; len];
    pad[0] = suffix;
    pad[len - 1] |= 0x80;
    pad
}

/// Sponge is the 200-byte Keccak state, held as 25 little-endian lanes.
#[derive(Clone, Default)]
pub(crate) struct Sponge {
    lanes: [u64; 25],
}

impl Sponge {
    /// absorb XORs a rate-sized block into the front of the state, then permutes.
    pub(crate) fn absorb(&mut self, block: &[u8]) {
        self.lanes
            .iter_mut()
            .zip(block.chunks_exact(8))
            .for_each(|(lane, chunk)| *lane ^= LittleEndian::read_u64(chunk));
        self.permute();
    }

    pub(crate) fn permute(&mut self) {
        keccak::f1600(&mut self.lanes);
    }

    /// squeeze copies the first `out.len()` bytes of the state into `out`.
    /// `out` must not be longer than the rate.
    pub(crate) fn squeeze(&self, out: &mut [u8]) {
        out.chunks_mut(8)
            .zip(self.lanes.iter())
            .for_each(|(chunk, lane)| {
                let n = chunk.len();
                chunk.copy_from_slice(&lane.to_le_bytes()[..n]);
            });
    }
}

/// State is the chaining value of an engine, shaped per family.
#[derive(Clone)]
pub(crate) enum State {
    Sha1([u32; 5]),
    Sha256([u32; 8]),
    Sha512([u64; 8]),
    Keccak(Sponge),
}

impl State {
    /// process_block commits exactly one block to the state.
    pub(crate) fn process_block(&mut self, block: &[u8]) {
        match self {
            State::Sha1(h) => sha1::compress(h, one_block(block)),
            State::Sha256(h) => sha2::compress256(h, one_block(block)),
            State::Sha512(h) => sha2::compress512(h, one_block(block)),
            State::Keccak(s) => s.absorb(block),
        }
    }

    /// write_digest serializes the chaining value big-endian and keeps the
    /// first `out.len()` bytes. Merkle–Damgård states only.
    pub(crate) fn write_digest(&self, out: &mut [u8]) {
        let mut full = [0u8; 64];
        match self {
            State::Sha1(h) => BigEndian::write_u32_into(h, &mut full[..20]),
            State::Sha256(h) => BigEndian::write_u32_into(h, &mut full[..32]),
            State::Sha512(h) => BigEndian::write_u64_into(h, &mut full[..64]),
            State::Keccak(_) => unreachable!("sponge output is squeezed, not serialized"),
        }
        out.copy_from_slice(&full[..out.len()]);
    }
}

// The compression functions take a slice of fixed-size blocks; the engine
// always hands over exactly one.
fn one_block<'a, B>(block: &'a [u8]) -> &'a [B]
where
    &'a B: TryFrom<&'a [u8]>,
    <&'a B as TryFrom<&'a [u8]>>::Error: Debug,
{
    let block = <&B>::try_from(block).expect("block function input must be one full block");
    std::slice::from_ref(block)
}
