use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::{Error, Result};
use crate::sampler::{Interval, UnitSource};

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

const D26: f64 = (1u64 << 26) as f64;

/// Size in bytes of a serialized [`Mt19937`] state: a 2-byte index followed
/// by 624 little-endian words.
pub const STATE_SIZE: usize = 2 + 4 * N;

/// Mt19937 is the 32-bit Mersenne Twister of Matsumoto and Nishimura.
///
/// ```
/// use mdigest::Mt19937;
/// use rand::RngCore;
///
/// let mut mt = Mt19937::new(5489);
/// assert_eq!(mt.next_u32(), 3499211612);
/// ```
#[derive(Clone)]
pub struct Mt19937 {
    x: [u32; N],
    w: usize, // next word of x to temper, N when a twist is due
}

impl Mt19937 {
    /// new seeds the generator with a single word.
    pub fn new(seed: u32) -> Self {
        let mut x = [0u32; N];
        x[0] = seed;
        for i in 1..N {
            x[i] = 1_812_433_253u32
                .wrapping_mul(x[i - 1] ^ (x[i - 1] >> 30))
                .wrapping_add(i as u32);
        }
        Mt19937 { x, w: N }
    }

    /// from_seed_array seeds the generator from a key of any length.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is empty.
    pub fn from_seed_array(seed: &[u32]) -> Self {
        assert!(!seed.is_empty(), "mt19937 seed array is empty");
        let mut mt = Mt19937::new(19_650_218);
        let x = &mut mt.x;

        let (mut i, mut j) = (1, 0);
        for _ in 0..N.max(seed.len()) {
            x[i] = (x[i] ^ (x[i - 1] ^ (x[i - 1] >> 30)).wrapping_mul(1_664_525))
                .wrapping_add(seed[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                x[0] = x[N - 1];
                i = 1;
            }
            if j >= seed.len() {
                j = 0;
            }
        }
        for _ in 0..N - 1 {
            x[i] = (x[i] ^ (x[i - 1] ^ (x[i - 1] >> 30)).wrapping_mul(1_566_083_941))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                x[0] = x[N - 1];
                i = 1;
            }
        }
        // non-zero initial state is assured
        x[0] = UPPER_MASK;
        mt
    }

    /// new_random seeds the generator with 624 words from the operating system.
    pub fn new_random() -> Self {
        let mut seed = [0u32; N];
        OsRng.fill(&mut seed[..]);
        log::debug!("mt19937: seeded from os entropy");
        Mt19937::from_seed_array(&seed)
    }

    fn twist(&mut self) {
        for i in 0..N {
            let y = (self.x[i] & UPPER_MASK) | (self.x[(i + 1) % N] & LOWER_MASK);
            let mut y_a = y >> 1;
            if y & 1 == 1 {
                y_a ^= MATRIX_A;
            }
            self.x[i] = self.x[(i + M) % N] ^ y_a;
        }
        self.w = 0;
    }

    /// next_word returns the next tempered 32-bit output.
    pub fn next_word(&mut self) -> u32 {
        if self.w >= N {
            self.twist();
        }
        let mut y = self.x[self.w];
        self.w += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    /// random_bit returns the low bit of the next output.
    pub fn random_bit(&mut self) -> bool {
        self.next_word() & 1 == 1
    }

    /// next_double returns a value with 53 random bits, built from two outputs.
    pub fn next_double(&mut self, interval: Interval) -> f64 {
        let a = f64::from(self.next_word() >> 5);
        let b = f64::from(self.next_word() >> 6);
        (a * D26 + b) / interval.divisor()
    }

    /// state serializes the generator: the 2-byte little-endian index
    /// followed by the state words, [`STATE_SIZE`] bytes in total.
    pub fn state(&self) -> Vec<u8> {
        let mut state = vec![0u8; STATE_SIZE];
        LittleEndian::write_u16(&mut state[..2], self.w as u16);
        LittleEndian::write_u32_into(&self.x, &mut state[2..]);
        state
    }

    /// try_set_state restores a state produced by [`Mt19937::state`].
    ///
    /// Fails, leaving the generator untouched, if `state` has the wrong
    /// length or an index past 624.
    pub fn try_set_state(&mut self, state: &[u8]) -> Result<()> {
        if state.len() != STATE_SIZE {
            return Err(Error::StateLength {
                expected: STATE_SIZE,
                actual: state.len(),
            });
        }
        let w = LittleEndian::read_u16(&state[..2]) as usize;
        if w > N {
            return Err(Error::StateIndex { index: w, max: N });
        }
        LittleEndian::read_u32_into(&state[2..], &mut self.x);
        self.w = w;
        Ok(())
    }

    /// set_state is [`Mt19937::try_set_state`] that ignores malformed input.
    pub fn set_state(&mut self, state: &[u8]) {
        if let Err(err) = self.try_set_state(state) {
            log::debug!("mt19937: state ignored: {}", err);
        }
    }
}

impl fmt::Debug for Mt19937 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mt19937").field("index", &self.w).finish_non_exhaustive()
    }
}

impl RngCore for Mt19937 {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    // the first word forms the high half
    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(self.next_word());
        let lo = u64::from(self.next_word());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let w = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&w[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mt19937 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Mt19937::new(u32::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Mt19937::new(state as u32)
    }
}

impl UnitSource for Mt19937 {
    fn next_unit(&mut self, interval: Interval) -> f64 {
        self.next_double(interval)
    }
}
