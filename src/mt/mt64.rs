use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::{Error, Result};
use crate::sampler::{Interval, UnitSource};

const N: usize = 312;
const M: usize = 156;
const MATRIX_A: u64 = 0xb502_6f5a_a966_19e9;
const UPPER_MASK: u64 = 0xffff_ffff_8000_0000;
const LOWER_MASK: u64 = 0x7fff_ffff;

/// Size in bytes of a serialized [`Mt19937_64`] state, the same as the 32-bit one.
pub const STATE_SIZE: usize = 2 + 8 * N;

/// Mt19937_64 is the 64-bit Mersenne Twister.
#[derive(Clone)]
pub struct Mt19937_64 {
    x: [u64; N],
    w: usize,
}

impl Mt19937_64 {
    /// new seeds the generator with a single word.
    pub fn new(seed: u64) -> Self {
        let mut x = [0u64; N];
        x[0] = seed;
        for i in 1..N {
            x[i] = 6_364_136_223_846_793_005u64
                .wrapping_mul(x[i - 1] ^ (x[i - 1] >> 62))
                .wrapping_add(i as u64);
        }
        Mt19937_64 { x, w: N }
    }

    /// from_seed_array seeds the generator from a key of any length.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is empty.
    pub fn from_seed_array(seed: &[u64]) -> Self {
        assert!(!seed.is_empty(), "mt19937-64 seed array is empty");
        let mut mt = Mt19937_64::new(19_650_218);
        let x = &mut mt.x;

        let (mut i, mut j) = (1, 0);
        for _ in 0..N.max(seed.len()) {
            x[i] = (x[i] ^ (x[i - 1] ^ (x[i - 1] >> 62)).wrapping_mul(3_935_559_000_370_003_845))
                .wrapping_add(seed[j])
                .wrapping_add(j as u64);
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
            x[i] = (x[i] ^ (x[i - 1] ^ (x[i - 1] >> 62)).wrapping_mul(2_862_933_555_777_941_757))
                .wrapping_sub(i as u64);
            i += 1;
            if i >= N {
                x[0] = x[N - 1];
                i = 1;
            }
        }
        x[0] = 1 << 63;
        mt
    }

    /// new_random seeds the generator with 312 words from the operating system.
    pub fn new_random() -> Self {
        let mut seed = [0u64; N];
        OsRng.fill(&mut seed[..]);
        log::debug!("mt19937-64: seeded from os entropy");
        Mt19937_64::from_seed_array(&seed)
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

    /// next_word returns the next tempered 64-bit output.
    pub fn next_word(&mut self) -> u64 {
        if self.w >= N {
            self.twist();
        }
        let mut y = self.x[self.w];
        self.w += 1;

        y ^= (y >> 29) & 0x5555_5555_5555_5555;
        y ^= (y << 17) & 0x71d6_7fff_eda6_0000;
        y ^= (y << 37) & 0xfff7_eee0_0000_0000;
        y ^ (y >> 43)
    }

    /// random_bit returns the low bit of the next output.
    pub fn random_bit(&mut self) -> bool {
        self.next_word() & 1 == 1
    }

    /// next_double returns the top 53 bits of the next output scaled to `interval`.
    pub fn next_double(&mut self, interval: Interval) -> f64 {
        (self.next_word() >> 11) as f64 / interval.divisor()
    }

    /// state serializes the generator: the 2-byte little-endian index
    /// followed by the state words, [`STATE_SIZE`] bytes in total.
    pub fn state(&self) -> Vec<u8> {
        let mut state = vec![0u8; STATE_SIZE];
        LittleEndian::write_u16(&mut state[..2], self.w as u16);
        LittleEndian::write_u64_into(&self.x, &mut state[2..]);
        state
    }

    /// try_set_state restores a state produced by [`Mt19937_64::state`].
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
        LittleEndian::read_u64_into(&state[2..], &mut self.x);
        self.w = w;
        Ok(())
    }

    /// set_state is [`Mt19937_64::try_set_state`] that ignores malformed input.
    pub fn set_state(&mut self, state: &[u8]) {
        if let Err(err) = self.try_set_state(state) {
            log::debug!("mt19937-64: state ignored: {}", err);
        }
    }
}

impl fmt::Debug for Mt19937_64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mt19937_64").field("index", &self.w).finish_non_exhaustive()
    }
}

impl RngCore for Mt19937_64 {
    fn next_u32(&mut self) -> u32 {
        (self.next_word() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_word()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let w = self.next_word().to_le_bytes();
            chunk.copy_from_slice(&w[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mt19937_64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Mt19937_64::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Mt19937_64::new(state)
    }
}

impl UnitSource for Mt19937_64 {
    fn next_unit(&mut self, interval: Interval) -> f64 {
        self.next_double(interval)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    // mt19937-64.out from the reference distribution
    const BY_ARRAY: [u64; 5] = [
        7266447313870364031,
        4946485549665804864,
        16945909448695747420,
        16394063075524226720,
        4873882236456199058,
    ];

    #[test]
    fn test_vector() {
        let mut mt = Mt19937_64::from_seed_array(&[0x12345, 0x23456, 0x34567, 0x45678]);
        BY_ARRAY.iter().enumerate().for_each(|(i, want)| {
            let got = mt.next_word();
            assert_eq!(got, *want, "output {} failed! got {}, want {}", i, got, want);
        });
    }

    #[test]
    fn default_seed() {
        let mut mt = Mt19937_64::new(5489);
        assert_eq!(mt.next_word(), 14514284786278117030);
        for _ in 1..9999 {
            mt.next_word();
        }
        assert_eq!(mt.next_word(), 9981545732273789042);
    }

    #[test]
    fn state_round_trip() {
        let mut mt = Mt19937_64::new(7);
        for _ in 0..500 {
            mt.next_word();
        }
        let state = mt.state();
        assert_eq!(state.len(), 2498);

        let expected: Vec<u64> = (0..1000).map(|_| mt.next_word()).collect();

        let mut other = Mt19937_64::new_random();
        other.set_state(&state);
        let got: Vec<u64> = (0..1000).map(|_| other.next_word()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn malformed_state_is_ignored() {
        let mut mt = Mt19937_64::new(1);
        let before = mt.state();

        let mut long = before.clone();
        long.push(0);
        mt.set_state(&long);
        assert_eq!(mt.state(), before);

        let mut bad = before.clone();
        bad[..2].copy_from_slice(&313u16.to_le_bytes());
        mt.set_state(&bad);
        assert_eq!(mt.state(), before);
        assert_eq!(
            mt.try_set_state(&bad),
            Err(Error::StateIndex { index: 313, max: N })
        );

        // index N is valid and forces a twist on the next draw
        bad[..2].copy_from_slice(&312u16.to_le_bytes());
        assert_eq!(mt.try_set_state(&bad), Ok(()));
    }

    #[test]
    fn doubles_in_interval() {
        let mut mt = Mt19937_64::new(99);
        for _ in 0..10_000 {
            let d = mt.next_double(Interval::HalfOpen);
            assert!((0.0..1.0).contains(&d));
            let d = mt.next_double(Interval::Closed);
            assert!((0.0..=1.0).contains(&d));
        }

        let mut a = Mt19937_64::new(4);
        let mut b = Mt19937_64::new(4);
        let d = a.next_double(Interval::Closed);
        assert_eq!(d, (b.next_word() >> 11) as f64 / 9007199254740991.0);
    }

    #[test]
    fn rng_core() {
        let mut a = Mt19937_64::seed_from_u64(5489);
        let mut b = Mt19937_64::from_seed(5489u64.to_le_bytes());
        assert_eq!(a.next_u64(), 14514284786278117030);
        assert_eq!(b.next_u32(), (14514284786278117030u64 >> 32) as u32);

        let mut buf = [0u8; 12];
        a.fill_bytes(&mut buf);
        let w = b.next_word().to_le_bytes();
        assert_eq!(buf[..8], w);
    }

    #[test]
    fn random_bit_is_low_bit() {
        let mut a = Mt19937_64::new(11);
        let mut b = Mt19937_64::new(11);
        for _ in 0..1000 {
            assert_eq!(a.random_bit(), b.next_word() & 1 == 1);
        }
    }
}
