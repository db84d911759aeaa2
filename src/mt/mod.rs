//! Mersenne Twister pseudo-random generators.
//!
//! [`Mt19937`] and [`Mt19937_64`] are the two generators themselves.
//! [`MersenneTwister`] picks one of them at runtime from an [`MtKind`] and
//! offers the 64-bit oriented surface shared by both.
//!
//! None of these generators is suitable for cryptographic use.
mod mt32;
mod mt64;

use std::fmt;

use rand::RngCore;

pub use mt32::Mt19937;
pub use mt64::Mt19937_64;

use crate::error::Result;
use crate::sampler::{Interval, UnitSource};

/// Size in bytes of a serialized generator state, for either kind.
pub const STATE_SIZE: usize = mt32::STATE_SIZE;

const _: () = assert!(mt32::STATE_SIZE == mt64::STATE_SIZE);

/// The Mersenne Twister kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MtKind {
    /// MT19937, 32-bit words
    Mt32,
    /// MT19937-64, 64-bit words
    Mt64,
}

/// MersenneTwister is a generator of either kind.
///
/// 32-bit seeds are the low halves of the 64-bit values given here, and
/// `next_u64` on the 32-bit kind joins two outputs, the first one high.
///
/// ```
/// use mdigest::{MersenneTwister, MtKind};
/// use rand::RngCore;
///
/// let mut mt = MersenneTwister::with_seed(MtKind::Mt64, 5489);
/// assert_eq!(mt.next_u64(), 14514284786278117030);
///
/// let saved = mt.state();
/// let a = mt.next_u64();
/// mt.set_state(&saved);
/// assert_eq!(mt.next_u64(), a);
/// ```
#[derive(Clone)]
pub enum MersenneTwister {
    /// The 32-bit generator.
    Mt32(Mt19937),
    /// The 64-bit generator.
    Mt64(Mt19937_64),
}

impl MersenneTwister {
    /// new returns a generator seeded from operating system entropy.
    pub fn new(kind: MtKind) -> Self {
        match kind {
            MtKind::Mt32 => MersenneTwister::Mt32(Mt19937::new_random()),
            MtKind::Mt64 => MersenneTwister::Mt64(Mt19937_64::new_random()),
        }
    }

    /// with_seed returns a generator seeded with a single word.
    pub fn with_seed(kind: MtKind, seed: u64) -> Self {
        match kind {
            MtKind::Mt32 => MersenneTwister::Mt32(Mt19937::new(seed as u32)),
            MtKind::Mt64 => MersenneTwister::Mt64(Mt19937_64::new(seed)),
        }
    }

    /// with_seed_array returns a generator seeded from a key of any length.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is empty.
    pub fn with_seed_array(kind: MtKind, seed: &[u64]) -> Self {
        match kind {
            MtKind::Mt32 => {
                let key: Vec<u32> = seed.iter().map(|&s| s as u32).collect();
                MersenneTwister::Mt32(Mt19937::from_seed_array(&key))
            }
            MtKind::Mt64 => MersenneTwister::Mt64(Mt19937_64::from_seed_array(seed)),
        }
    }

    /// kind returns the kind of the generator.
    pub fn kind(&self) -> MtKind {
        match self {
            MersenneTwister::Mt32(_) => MtKind::Mt32,
            MersenneTwister::Mt64(_) => MtKind::Mt64,
        }
    }

    /// random_bit returns the low bit of the next native output.
    pub fn random_bit(&mut self) -> bool {
        match self {
            MersenneTwister::Mt32(mt) => mt.random_bit(),
            MersenneTwister::Mt64(mt) => mt.random_bit(),
        }
    }

    /// next_double returns a uniform value with 53 random bits in `interval`.
    pub fn next_double(&mut self, interval: Interval) -> f64 {
        match self {
            MersenneTwister::Mt32(mt) => mt.next_double(interval),
            MersenneTwister::Mt64(mt) => mt.next_double(interval),
        }
    }

    /// state serializes the generator into [`STATE_SIZE`] bytes.
    pub fn state(&self) -> Vec<u8> {
        match self {
            MersenneTwister::Mt32(mt) => mt.state(),
            MersenneTwister::Mt64(mt) => mt.state(),
        }
    }

    /// set_state restores a serialized state; malformed input is ignored.
    pub fn set_state(&mut self, state: &[u8]) {
        match self {
            MersenneTwister::Mt32(mt) => mt.set_state(state),
            MersenneTwister::Mt64(mt) => mt.set_state(state),
        }
    }

    /// try_set_state restores a serialized state or reports why it cannot.
    pub fn try_set_state(&mut self, state: &[u8]) -> Result<()> {
        match self {
            MersenneTwister::Mt32(mt) => mt.try_set_state(state),
            MersenneTwister::Mt64(mt) => mt.try_set_state(state),
        }
    }
}

impl fmt::Debug for MersenneTwister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MersenneTwister::Mt32(mt) => fmt::Debug::fmt(mt, f),
            MersenneTwister::Mt64(mt) => fmt::Debug::fmt(mt, f),
        }
    }
}

impl RngCore for MersenneTwister {
    fn next_u32(&mut self) -> u32 {
        match self {
            MersenneTwister::Mt32(mt) => mt.next_u32(),
            MersenneTwister::Mt64(mt) => mt.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            MersenneTwister::Mt32(mt) => mt.next_u64(),
            MersenneTwister::Mt64(mt) => mt.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            MersenneTwister::Mt32(mt) => mt.fill_bytes(dest),
            MersenneTwister::Mt64(mt) => mt.fill_bytes(dest),
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl UnitSource for MersenneTwister {
    fn next_unit(&mut self, interval: Interval) -> f64 {
        self.next_double(interval)
    }
}
