use std::io::Read;

use crate::backend::{MAX_BLOCK_SIZE, SHAKE_SUFFIX};
use crate::md::{DigestKind, MessageDigest, Params};

/// The SHAKE kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShakeKind {
    /// SHAKE128 (rate 168 bytes)
    Shake128,
    /// SHAKE256 (rate 136 bytes)
    Shake256,
}

impl ShakeKind {
    fn engine(self) -> MessageDigest {
        match self {
            ShakeKind::Shake128 => MessageDigest::with_params(None, Params::KECCAK_128),
            ShakeKind::Shake256 => MessageDigest::new(DigestKind::Sha3_256),
        }
    }
}

/// The XOF kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum XofKind {
    /// 128-bit security, the SHAKE128 stream
    Xof128,
    /// 256-bit security, the SHAKE256 stream
    Xof256,
}

impl XofKind {
    /// shake returns the SHAKE kind whose output stream the XOF produces.
    pub fn shake(self) -> ShakeKind {
        match self {
            XofKind::Xof128 => ShakeKind::Shake128,
            XofKind::Xof256 => ShakeKind::Shake256,
        }
    }
}

/// Shake is a SHAKE128/SHAKE256 extendable-output function (FIPS 202).
///
/// [`Shake::digest`] produces any number of output bytes in one shot and
/// resets the instance; [`Shake::finalize_xof`] turns it into an [`Xof`] that
/// can be read incrementally.
#[derive(Clone, Debug)]
pub struct Shake {
    md: MessageDigest,
}

impl Shake {
    /// new returns a SHAKE instance of the given kind.
    pub fn new(kind: ShakeKind) -> Self {
        Shake { md: kind.engine() }
    }

    /// update feeds more data.
    pub fn update(&mut self, data: &[u8]) {
        self.md.update(data);
    }

    /// reset discards all data written so far.
    pub fn reset(&mut self) {
        self.md.reset();
    }

    /// digest returns `size` output bytes and resets `self`.
    pub fn digest(&mut self, size: usize) -> Vec<u8> {
        // FIPS 202 algorithm 8
        self.md.pad_sponge(SHAKE_SUFFIX);

        let rate = self.md.block_size();
        let sponge = self.md.sponge();
        let mut z = vec![0u8; size];
        for chunk in z.chunks_mut(rate) {
            sponge.squeeze(chunk);
            sponge.permute();
        }

        self.md.reset();
        z
    }

    /// finalize_xof pads the absorbed data and returns a reader over the output stream.
    pub fn finalize_xof(mut self) -> Xof {
        self.md.pad_sponge(SHAKE_SUFFIX);
        Xof::from_padded(self.md)
    }
}

impl digest::Update for Shake {
    fn update(&mut self, data: &[u8]) {
        Shake::update(self, data);
    }
}

impl digest::Reset for Shake {
    fn reset(&mut self) {
        Shake::reset(self);
    }
}

impl digest::ExtendableOutput for Shake {
    type Reader = Xof;

    fn finalize_xof(self) -> Self::Reader {
        Shake::finalize_xof(self)
    }
}

/// Xof is an incremental reader over a SHAKE output stream.
///
/// Successive reads continue where the previous one stopped, so the stream
/// can be consumed in pieces of any size.
///
/// ```
/// use mdigest::{Shake, ShakeKind, Xof, XofKind};
///
/// let mut xof = Xof::new(XofKind::Xof256, b"seed");
/// let mut stream = xof.read(10);
/// stream.extend(xof.read(300));
///
/// let mut shake = Shake::new(ShakeKind::Shake256);
/// shake.update(b"seed");
/// assert_eq!(stream, shake.digest(310));
/// ```
#[derive(Clone, Debug)]
pub struct Xof {
    md: MessageDigest,
    block: [u8; MAX_BLOCK_SIZE],
    ndx: usize, // next unread byte of block
}

impl Xof {
    /// new absorbs `seed` and returns a reader positioned at the start of the stream.
    pub fn new(kind: XofKind, seed: &[u8]) -> Self {
        let mut shake = Shake::new(kind.shake());
        shake.update(seed);
        shake.finalize_xof()
    }

    fn from_padded(mut md: MessageDigest) -> Self {
        let rate = md.block_size();
        let mut block = [0u8; MAX_BLOCK_SIZE];
        md.sponge().squeeze(&mut block[..rate]);
        Xof { md, block, ndx: 0 }
    }

    /// read returns the next `size` bytes of the stream.
    pub fn read(&mut self, size: usize) -> Vec<u8> {
        let mut x = vec![0u8; size];
        self.read_into(&mut x);
        x
    }

    /// read_into fills `buffer` with the next `buffer.len()` bytes of the stream.
    pub fn read_into(&mut self, buffer: &mut [u8]) {
        let rate = self.md.block_size();
        let mut filled = 0;
        while filled < buffer.len() {
            if self.ndx == rate {
                let sponge = self.md.sponge();
                sponge.permute();
                sponge.squeeze(&mut self.block[..rate]);
                self.ndx = 0;
            }
            let n = (rate - self.ndx).min(buffer.len() - filled);
            buffer[filled..filled + n].copy_from_slice(&self.block[self.ndx..self.ndx + n]);
            self.ndx += n;
            filled += n;
        }
    }
}

impl digest::XofReader for Xof {
    fn read(&mut self, buffer: &mut [u8]) {
        self.read_into(buffer);
    }
}

impl Read for Xof {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.read_into(buf);
        Ok(buf.len())
    }
}
