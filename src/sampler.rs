//! Uniform sampling from integer and floating point ranges.
//!
//! Integers are not drawn with a modulo reduction. A closed-interval unit
//! draw is stretched over `[lo - 1/2, hi + 1/2]` and rounded half to even, so
//! each integer of the range owns a cell of width one. Degenerate ranges
//! return their only value without drawing.
use std::ops::{Range, RangeInclusive};

const D53: f64 = (1u64 << 53) as f64;
const D53_1: f64 = ((1u64 << 53) - 1) as f64;

/// Interval selects the unit interval a floating point draw lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interval {
    /// `[0, 1)`
    HalfOpen,
    /// `[0, 1]`
    Closed,
}

impl Interval {
    /// divisor maps a 53-bit integer draw onto the interval.
    pub(crate) fn divisor(self) -> f64 {
        match self {
            Interval::HalfOpen => D53,
            Interval::Closed => D53_1,
        }
    }
}

/// UnitSource is a generator of uniform floating point values in the unit interval.
pub trait UnitSource {
    /// next_unit returns the next value in `[0, 1)` or `[0, 1]`.
    fn next_unit(&mut self, interval: Interval) -> f64;
}

/// SampleUniform is a type that can be drawn uniformly from a range.
pub trait SampleUniform: Sized + Copy + PartialOrd {
    /// sample_inclusive draws from `low..=high`.
    fn sample_inclusive<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self;

    /// sample_half_open draws from `low..high`.
    fn sample_half_open<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self;
}

/// SampleRange is a range expression (`a..b` or `a..=b`) that can be sampled.
pub trait SampleRange<T> {
    /// sample_from draws one value of the range from `source`.
    fn sample_from<S: UnitSource + ?Sized>(self, source: &mut S) -> T;
}

impl<T: SampleUniform> SampleRange<T> for Range<T> {
    fn sample_from<S: UnitSource + ?Sized>(self, source: &mut S) -> T {
        T::sample_half_open(source, self.start, self.end)
    }
}

impl<T: SampleUniform> SampleRange<T> for RangeInclusive<T> {
    fn sample_from<S: UnitSource + ?Sized>(self, source: &mut S) -> T {
        let (low, high) = self.into_inner();
        T::sample_inclusive(source, low, high)
    }
}

/// RandomRange adds ranged sampling to every [`UnitSource`].
///
/// ```
/// use mdigest::{MersenneTwister, MtKind, RandomRange};
///
/// let mut mt = MersenneTwister::with_seed(MtKind::Mt64, 5489);
/// let die: i32 = mt.random_in(1..=6);
/// assert!((1..=6).contains(&die));
/// let x: f64 = mt.random_in(-1.0..1.0);
/// assert!((-1.0..1.0).contains(&x));
/// ```
pub trait RandomRange: UnitSource {
    /// random_in returns a uniformly distributed value of `range`.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty.
    fn random_in<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        range.sample_from(self)
    }
}

impl<S: UnitSource + ?Sized> RandomRange for S {}

fn uniform_f64<S: UnitSource + ?Sized>(source: &mut S, low: f64, high: f64, interval: Interval) -> f64 {
    low + (high - low) * source.next_unit(interval)
}

// Both i64 and u64 fit in i128, so one routine serves signed and unsigned
// ranges without overflow at the extremes.
fn sample_wide<S: UnitSource + ?Sized>(source: &mut S, low: i128, high: i128) -> i128 {
    assert!(low <= high, "cannot sample empty range {}..={}", low, high);
    if low == high {
        return low;
    }
    let span = (high - low) as f64;
    let n = 2.0 * span;
    let f = uniform_f64(source, -1.0 / n, (n + 1.0) / n, Interval::Closed);
    let x = low + (span * f).round_ties_even() as i128;
    // rounding half to even may step one past either end
    x.clamp(low, high)
}

impl SampleUniform for i64 {
    fn sample_inclusive<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self {
        sample_wide(source, i128::from(low), i128::from(high)) as i64
    }

    fn sample_half_open<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self {
        assert!(low < high, "cannot sample empty range {}..{}", low, high);
        Self::sample_inclusive(source, low, high - 1)
    }
}

impl SampleUniform for u64 {
    fn sample_inclusive<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self {
        sample_wide(source, i128::from(low), i128::from(high)) as u64
    }

    fn sample_half_open<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self {
        assert!(low < high, "cannot sample empty range {}..{}", low, high);
        Self::sample_inclusive(source, low, high - 1)
    }
}

// Narrower integers widen to the 64-bit routine of the same signedness.
macro_rules! sample_via {
    ($($t:ty => $wide:ty),* $(,)?) => {
        $(
            impl SampleUniform for $t {
                fn sample_inclusive<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self {
                    <$wide>::sample_inclusive(source, low as $wide, high as $wide) as $t
                }

                fn sample_half_open<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self {
                    <$wide>::sample_half_open(source, low as $wide, high as $wide) as $t
                }
            }
        )*
    };
}

sample_via!(i32 => i64, isize => i64, u32 => u64, usize => u64);

impl SampleUniform for f64 {
    fn sample_inclusive<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self {
        assert!(low <= high, "cannot sample empty range {}..={}", low, high);
        uniform_f64(source, low, high, Interval::Closed)
    }

    fn sample_half_open<S: UnitSource + ?Sized>(source: &mut S, low: Self, high: Self) -> Self {
        assert!(low <= high, "cannot sample empty range {}..{}", low, high);
        uniform_f64(source, low, high, Interval::HalfOpen)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::mt::{MersenneTwister, MtKind};

    // Counts the unit draws taken from the wrapped generator.
    struct Counting {
        mt: MersenneTwister,
        calls: usize,
    }

    impl Counting {
        fn new(kind: MtKind) -> Self {
            Counting {
                mt: MersenneTwister::with_seed(kind, 20240418),
                calls: 0,
            }
        }
    }

    impl UnitSource for Counting {
        fn next_unit(&mut self, interval: Interval) -> f64 {
            self.calls += 1;
            self.mt.next_unit(interval)
        }
    }

    // Returns a fixed value, to drive the rounding edges.
    struct Fixed(f64);

    impl UnitSource for Fixed {
        fn next_unit(&mut self, _: Interval) -> f64 {
            self.0
        }
    }

    #[test]
    fn bounds_signed() {
        let ranges = [
            (-10i64, 10i64),
            (0, 1),
            (-5, -1),
            (1 << 40, (1 << 40) + 3),
            (i64::MIN, i64::MAX),
            (i64::MIN, i64::MIN + 2),
            (i64::MAX - 2, i64::MAX),
        ];
        for kind in [MtKind::Mt32, MtKind::Mt64] {
            let mut src = Counting::new(kind);
            for (lo, hi) in ranges {
                for _ in 0..10_000 {
                    let x = src.random_in(lo..=hi);
                    assert!(lo <= x && x <= hi, "{} outside {}..={}", x, lo, hi);
                }
            }
        }
    }

    #[test]
    fn bounds_unsigned() {
        let mut src = Counting::new(MtKind::Mt32);
        for (lo, hi) in [(0u64, 1u64), (3, 17), (0, u64::MAX), (u64::MAX - 1, u64::MAX)] {
            for _ in 0..10_000 {
                let x = src.random_in(lo..=hi);
                assert!(lo <= x && x <= hi, "{} outside {}..={}", x, lo, hi);
            }
        }
        for _ in 0..10_000 {
            let x: u32 = src.random_in(100..200);
            assert!((100..200).contains(&x));
            let y: i32 = src.random_in(i32::MIN..=i32::MAX);
            assert!((i32::MIN..=i32::MAX).contains(&y));
            let z: usize = src.random_in(0..3);
            assert!(z < 3);
        }
    }

    #[test]
    fn degenerate_range_draws_nothing() {
        let mut src = Counting::new(MtKind::Mt64);
        assert_eq!(src.random_in(42i64..=42), 42);
        assert_eq!(src.random_in(-7i32..=-7), -7);
        assert_eq!(src.random_in(9u64..10), 9);
        assert_eq!(src.random_in(u32::MAX..=u32::MAX), u32::MAX);
        assert_eq!(src.calls, 0);

        src.random_in(0i64..=1);
        assert_eq!(src.calls, 1);
    }

    #[test]
    fn every_value_reachable() {
        let mut src = Counting::new(MtKind::Mt64);
        let mut counts = [0usize; 6];
        for _ in 0..60_000 {
            let die: usize = src.random_in(1..=6);
            counts[die - 1] += 1;
        }
        for (face, count) in counts.iter().enumerate() {
            assert!(
                (9_000..11_000).contains(count),
                "face {} drawn {} times",
                face + 1,
                count
            );
        }
    }

    #[test]
    fn rounding_edges_are_clamped() {
        // lowest draw maps to -1/2 below the range, highest to +1/2 above it
        assert_eq!(i64::sample_inclusive(&mut Fixed(0.0), 10, 20), 10);
        assert_eq!(i64::sample_inclusive(&mut Fixed(1.0), 10, 20), 20);
        assert_eq!(u64::sample_inclusive(&mut Fixed(1.0), 0, 1), 1);
        assert_eq!(i64::sample_inclusive(&mut Fixed(1.0), i64::MAX - 1, i64::MAX), i64::MAX);
        assert_eq!(i64::sample_inclusive(&mut Fixed(0.0), i64::MIN, i64::MIN + 1), i64::MIN);
    }

    #[test]
    fn float_ranges() {
        let mut src = Counting::new(MtKind::Mt32);
        for _ in 0..10_000 {
            let x: f64 = src.random_in(-2.5..4.0);
            assert!((-2.5..4.0).contains(&x));
            let y: f64 = src.random_in(0.0..=1.0);
            assert!((0.0..=1.0).contains(&y));
        }
        assert_eq!(f64::sample_inclusive(&mut Fixed(1.0), 2.0, 3.0), 3.0);
        assert_eq!(f64::sample_half_open(&mut Fixed(0.5), 2.0, 3.0), 2.5);
    }

    #[test]
    #[should_panic(expected = "empty range")]
    fn empty_half_open() {
        Counting::new(MtKind::Mt32).random_in(5i64..5);
    }

    #[test]
    #[should_panic(expected = "empty range")]
    fn inverted_inclusive() {
        #[allow(clippy::reversed_empty_ranges)]
        Counting::new(MtKind::Mt32).random_in(5u64..=4);
    }
}
