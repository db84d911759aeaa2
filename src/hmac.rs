use crate::md::{DigestKind, MessageDigest};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Hmac computes RFC 2104 message authentication codes over any [`DigestKind`].
///
/// The key is processed once, in [`Hmac::new`]. After every
/// [`Hmac::compute`] the instance is primed again with the inner pad, so it
/// can authenticate the next message under the same key.
#[derive(Clone, Debug)]
pub struct Hmac {
    md: MessageDigest,
    i_key_pad: Vec<u8>,
    o_key_pad: Vec<u8>,
}

impl Hmac {
    /// new derives the inner and outer pads from `key`.
    ///
    /// Keys longer than the block size are hashed first; shorter keys are
    /// zero-padded, so an empty key acts as an all-zero key.
    pub fn new(kind: DigestKind, key: &[u8]) -> Self {
        let mut md = MessageDigest::new(kind);
        let block_size = md.block_size();

        let mut mac_key = vec![0u8; block_size];
        if key.len() > block_size {
            log::trace!(
                "hmac-{}: hashing {}-byte key down to {} bytes",
                kind,
                key.len(),
                md.digest_length()
            );
            let x = md.digest(key);
            mac_key[..x.len()].copy_from_slice(&x);
        } else {
            mac_key[..key.len()].copy_from_slice(key);
        }

        let i_key_pad = mac_key.iter().map(|b| b ^ IPAD).collect();
        let o_key_pad = mac_key.iter().map(|b| b ^ OPAD).collect();

        let mut hmac = Hmac {
            md,
            i_key_pad,
            o_key_pad,
        };
        hmac.reset();
        hmac
    }

    /// mac_length returns the size of the authentication code in bytes.
    pub fn mac_length(&self) -> usize {
        self.md.digest_length()
    }

    /// reset discards any data written since the last `compute` and primes
    /// the engine with the inner key pad.
    pub fn reset(&mut self) {
        self.md.reset();
        self.md.update(&self.i_key_pad);
    }

    /// update feeds more data into the MAC.
    pub fn update(&mut self, data: &[u8]) {
        self.md.update(data);
    }

    /// compute feeds `data`, returns the authentication code and resets the MAC.
    pub fn compute(&mut self, data: &[u8]) -> Vec<u8> {
        let inner = self.md.digest(data);
        self.md.update(&self.o_key_pad);
        let result = self.md.digest(&inner);
        self.reset();
        result
    }
}

impl digest::Update for Hmac {
    fn update(&mut self, data: &[u8]) {
        Hmac::update(self, data);
    }
}

impl digest::Reset for Hmac {
    fn reset(&mut self) {
        Hmac::reset(self);
    }
}
