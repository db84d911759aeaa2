use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::backend::{Backend, State, MAX_BLOCK_SIZE};
use crate::error::Error;

/// The block-processing discipline of a digest algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Construction {
    /// Sequential compression finalized with length padding (SHA-1, SHA-2).
    MerkleDamgard,
    /// Absorb/squeeze over the Keccak-f[1600] permutation (SHA-3).
    Sponge,
}

/// The message digest algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DigestKind {
    /// SHA-1
    Sha1,
    /// SHA2-224
    Sha2_224,
    /// SHA2-256
    Sha2_256,
    /// SHA2-384
    Sha2_384,
    /// SHA2-512
    Sha2_512,
    /// SHA3-224
    Sha3_224,
    /// SHA3-256
    Sha3_256,
    /// SHA3-384
    Sha3_384,
    /// SHA3-512
    Sha3_512,
}

impl DigestKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [DigestKind; 9] = [
        DigestKind::Sha1,
        DigestKind::Sha2_224,
        DigestKind::Sha2_256,
        DigestKind::Sha2_384,
        DigestKind::Sha2_512,
        DigestKind::Sha3_224,
        DigestKind::Sha3_256,
        DigestKind::Sha3_384,
        DigestKind::Sha3_512,
    ];

    /// digest_length returns the output size in bytes.
    pub const fn digest_length(self) -> usize {
        self.params().digest_length
    }

    /// block_size returns the size of the internal buffer in bytes (the rate, for SHA-3).
    pub const fn block_size(self) -> usize {
        self.params().block_size
    }

    /// construction returns whether the kind is a Merkle–Damgård or a sponge hash.
    pub const fn construction(self) -> Construction {
        match self.params().backend {
            Backend::Keccak => Construction::Sponge,
            _ => Construction::MerkleDamgard,
        }
    }

    /// name returns the canonical algorithm name, e.g. `SHA2-256`.
    pub const fn name(self) -> &'static str {
        match self {
            DigestKind::Sha1 => "SHA-1",
            DigestKind::Sha2_224 => "SHA2-224",
            DigestKind::Sha2_256 => "SHA2-256",
            DigestKind::Sha2_384 => "SHA2-384",
            DigestKind::Sha2_512 => "SHA2-512",
            DigestKind::Sha3_224 => "SHA3-224",
            DigestKind::Sha3_256 => "SHA3-256",
            DigestKind::Sha3_384 => "SHA3-384",
            DigestKind::Sha3_512 => "SHA3-512",
        }
    }

    pub(crate) const fn params(self) -> Params {
        match self {
            DigestKind::Sha1 => Params::new(Backend::Sha1, 20, 64),
            DigestKind::Sha2_224 => Params::new(Backend::Sha224, 28, 64),
            DigestKind::Sha2_256 => Params::new(Backend::Sha256, 32, 64),
            DigestKind::Sha2_384 => Params::new(Backend::Sha384, 48, 128),
            DigestKind::Sha2_512 => Params::new(Backend::Sha512, 64, 128),
            DigestKind::Sha3_224 => Params::new(Backend::Keccak, 28, 144),
            DigestKind::Sha3_256 => Params::new(Backend::Keccak, 32, 136),
            DigestKind::Sha3_384 => Params::new(Backend::Keccak, 48, 104),
            DigestKind::Sha3_512 => Params::new(Backend::Keccak, 64, 72),
        }
    }
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_uppercase().as_str() {
            "SHA-1" | "SHA1" => DigestKind::Sha1,
            "SHA2-224" | "SHA-224" | "SHA224" => DigestKind::Sha2_224,
            "SHA2-256" | "SHA-256" | "SHA256" => DigestKind::Sha2_256,
            "SHA2-384" | "SHA-384" | "SHA384" => DigestKind::Sha2_384,
            "SHA2-512" | "SHA-512" | "SHA512" => DigestKind::Sha2_512,
            "SHA3-224" => DigestKind::Sha3_224,
            "SHA3-256" => DigestKind::Sha3_256,
            "SHA3-384" => DigestKind::Sha3_384,
            "SHA3-512" => DigestKind::Sha3_512,
            _ => return Err(Error::UnknownAlgorithm(s.to_string())),
        };
        Ok(kind)
    }
}

/// Params fixes the constants of one engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Params {
    pub(crate) backend: Backend,
    pub(crate) digest_length: usize,
    pub(crate) block_size: usize,
}

impl Params {
    /// The 128-bit security sponge (rate 168) behind SHAKE128 and XOF128.
    /// It has no public `DigestKind`.
    pub(crate) const KECCAK_128: Params = Params::new(Backend::Keccak, 16, 168);

    const fn new(backend: Backend, digest_length: usize, block_size: usize) -> Self {
        Params {
            backend,
            digest_length,
            block_size,
        }
    }
}

/// MessageDigest is a streaming hash engine for any [`DigestKind`].
///
/// Input is buffered until a full block is available; every full block is
/// committed to the state immediately. [`MessageDigest::digest`] pads,
/// extracts the output and then resets the engine, so the same instance can be
/// reused for the next message.
///
/// ```
/// use mdigest::{DigestKind, MessageDigest};
///
/// let mut md = MessageDigest::new(DigestKind::Sha2_256);
/// md.update(b"a");
/// md.update(b"bc");
/// let out = md.finalize();
/// assert_eq!(
///     hex::encode(out),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
#[derive(Clone)]
pub struct MessageDigest {
    kind: Option<DigestKind>,
    params: Params,
    state: State,
    buffer: [u8; MAX_BLOCK_SIZE],
    bytes: usize, // number of input bytes held in buffer, always < block_size
    total: u64,   // total number of input bytes written overall
}

impl MessageDigest {
    /// new returns an engine of the given kind in its initial state.
    pub fn new(kind: DigestKind) -> Self {
        Self::with_params(Some(kind), kind.params())
    }

    pub(crate) fn with_params(kind: Option<DigestKind>, params: Params) -> Self {
        MessageDigest {
            kind,
            params,
            state: params.backend.initial_state(),
            buffer: [0; MAX_BLOCK_SIZE],
            bytes: 0,
            total: 0,
        }
    }

    /// digest_length returns the output size in bytes.
    pub fn digest_length(&self) -> usize {
        self.params.digest_length
    }

    /// block_size returns the size of the internal buffer in bytes.
    pub fn block_size(&self) -> usize {
        self.params.block_size
    }

    /// reset restores the initial state and clears the buffer.
    pub fn reset(&mut self) {
        self.state = self.params.backend.initial_state();
        self.buffer = [0; MAX_BLOCK_SIZE];
        self.bytes = 0;
        self.total = 0;
    }

    /// update feeds more data into the engine.
    pub fn update(&mut self, data: &[u8]) {
        let block_size = self.params.block_size;
        let mut p = data;

        if self.bytes > 0 {
            // continue with existing buffer, if nonempty
            let n = (block_size - self.bytes).min(p.len());
            self.buffer[self.bytes..self.bytes + n].copy_from_slice(&p[..n]);
            self.bytes += n;
            p = &p[n..];
            if self.bytes == block_size {
                self.state.process_block(&self.buffer[..block_size]);
                self.bytes = 0;
            }
        }

        // whole blocks go straight from the input
        let mut blocks = p.chunks_exact(block_size);
        for block in &mut blocks {
            self.state.process_block(block);
        }

        let rest = blocks.remainder();
        if !rest.is_empty() {
            self.buffer[self.bytes..self.bytes + rest.len()].copy_from_slice(rest);
            self.bytes += rest.len();
        }

        self.total += data.len() as u64;
    }

    /// digest feeds `data`, computes the digest value and resets the engine.
    pub fn digest(&mut self, data: &[u8]) -> Vec<u8> {
        self.update(data);
        let padding = self
            .params
            .backend
            .padding(self.total, self.params.block_size);
        self.update(&padding);
        debug_assert_eq!(self.bytes, 0, "padding must end on a block boundary");

        let mut md = vec![0u8; self.params.digest_length];
        match &mut self.state {
            State::Keccak(sponge) => {
                for (i, chunk) in md.chunks_mut(self.params.block_size).enumerate() {
                    if i > 0 {
                        sponge.permute();
                    }
                    sponge.squeeze(chunk);
                }
            }
            state => state.write_digest(&mut md),
        }

        self.reset();
        md
    }

    /// finalize computes the digest value of the data written so far and resets the engine.
    pub fn finalize(&mut self) -> Vec<u8> {
        self.digest(&[])
    }

    /// pad_sponge absorbs the pad10*1 padding with the given domain suffix.
    /// Afterwards the engine sits on a block boundary, ready to squeeze.
    pub(crate) fn pad_sponge(&mut self, suffix: u8) {
        let padding =
            crate::backend::sponge_padding(self.total, self.params.block_size, suffix);
        self.update(&padding);
        assert_eq!(
            self.total % self.params.block_size as u64,
            0,
            "sponge padding must end on a block boundary"
        );
    }

    /// sponge gives direct access to the Keccak state of a sponge-mode engine.
    pub(crate) fn sponge(&mut self) -> &mut crate::backend::Sponge {
        match &mut self.state {
            State::Keccak(sponge) => sponge,
            _ => unreachable!("engine is not in sponge mode"),
        }
    }
}

impl digest::Update for MessageDigest {
    fn update(&mut self, data: &[u8]) {
        MessageDigest::update(self, data);
    }
}

impl digest::Reset for MessageDigest {
    fn reset(&mut self) {
        MessageDigest::reset(self);
    }
}

impl Write for MessageDigest {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for MessageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDigest")
            .field("kind", &self.kind)
            .field("block_size", &self.params.block_size)
            .field("buffered", &self.bytes)
            .field("total", &self.total)
            .finish()
    }
}
