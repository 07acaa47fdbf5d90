//! Multi-stream pseudo-random number generation.
//!
//! The generator is the classic Lehmer multiplicative congruential
//! generator `I <- (16807 * I) mod (2^31 - 1)` with fifteen predefined seed
//! streams, plus the standard catalogue of sampling routines built on it:
//! uniform, discrete uniform, exponential, Erlang, two-stage
//! hyperexponential and normal. Every kernel owns its own generator, so
//! independent simulations never share random state.
//!
//! [`Rand`] also implements [`rand::RngCore`], so the reproducible streams
//! can drive any adaptor from the `rand` ecosystem.

use rand::RngCore;

use crate::error::{Error, Result};

/// Default seeds for streams 1 through 15.
const STREAM_SEEDS: [i32; 15] = [
    1_973_272_912,
    747_177_549,
    20_464_843,
    640_830_765,
    1_098_742_207,
    78_126_602,
    84_743_774,
    831_312_807,
    124_667_236,
    1_172_177_002,
    1_124_933_064,
    1_223_960_546,
    1_878_892_440,
    1_449_793_615,
    553_303_732,
];

/// Multiplier of the Lehmer step, 7^5.
const A: i64 = 16_807;

/// Modulus of the Lehmer step, 2^31 - 1.
const M: i64 = 2_147_483_647;

/// Scale factor mapping a seed onto the unit interval.
const RANF_SCALE: f64 = 4.656_612_875e-10;

/// A seeded multi-stream pseudo-random number generator.
///
/// Streams are selected by number (1 through 15); re-selecting a stream
/// restarts its sequence from the predefined seed, which is what makes
/// simulation runs reproducible.
#[derive(Debug, Clone)]
pub struct Rand {
    seed: i32,
    /// Stream whose seed was loaded last; 0 before any selection.
    stream: usize,
    /// Second polar-method variate, cached across calls to `normal`.
    normal_z2: f64,
}

impl Rand {
    /// Creates a generator positioned at the start of stream 1.
    #[must_use]
    pub fn new() -> Self {
        Rand {
            seed: STREAM_SEEDS[0],
            stream: 0,
            normal_z2: 0.0,
        }
    }

    /// Selects one of the fifteen seed streams and restarts it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStream`] if `n` is outside `1..=15`.
    pub fn stream(&mut self, n: usize) -> Result<()> {
        if !(1..=15).contains(&n) {
            return Err(Error::InvalidStream);
        }
        self.select_stream(n);
        Ok(())
    }

    pub(crate) fn select_stream(&mut self, n: usize) {
        debug_assert!((1..=15).contains(&n));
        self.seed = STREAM_SEEDS[n - 1];
        self.stream = n;
        self.normal_z2 = 0.0;
    }

    /// Stream selected last, or 0 if none was ever selected.
    pub(crate) fn stream_number(&self) -> usize {
        self.stream
    }

    /// Current seed of the generator.
    #[must_use]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Replaces the seed without changing the selected stream.
    pub fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
    }

    /// One Lehmer step, returning the new seed.
    fn step(&mut self) -> i32 {
        self.seed = ((A * i64::from(self.seed)) % M) as i32;
        self.seed
    }

    /// Draws from the uniform distribution on the unit interval.
    pub fn ranf(&mut self) -> f64 {
        f64::from(self.step()) * RANF_SCALE
    }

    /// Draws from the uniform distribution on `[a, b]`.
    ///
    /// # Errors
    ///
    /// [`Error::BadRange`] if `a > b`.
    pub fn uniform(&mut self, a: f64, b: f64) -> Result<f64> {
        if a > b {
            return Err(Error::BadRange);
        }
        Ok(a + (b - a) * self.ranf())
    }

    /// Draws an integer uniformly from `i..=n`.
    ///
    /// # Errors
    ///
    /// [`Error::BadRange`] if `i > n`.
    pub fn random(&mut self, i: i32, n: i32) -> Result<i32> {
        if i > n {
            return Err(Error::BadRange);
        }
        let m = n - i;
        let d = ((f64::from(m) + 1.0) * self.ranf()) as i32;
        Ok(i + d)
    }

    /// Draws from the exponential distribution with mean `x`.
    pub fn expntl(&mut self, x: f64) -> f64 {
        -x * self.ranf().ln()
    }

    /// Draws from the Erlang distribution with mean `x` and standard
    /// deviation `s`, using `k = floor((x/s)^2)` exponential stages.
    ///
    /// # Errors
    ///
    /// [`Error::ErlangDeviation`] if `s > x`.
    pub fn erlang(&mut self, x: f64, s: f64) -> Result<f64> {
        if s > x {
            return Err(Error::ErlangDeviation);
        }
        let z1 = x / s;
        let k = (z1 * z1) as i32;
        let mut z2 = 1.0;
        for _ in 0..k {
            z2 *= self.ranf();
        }
        Ok(-(x / f64::from(k)) * z2.ln())
    }

    /// Draws from Morse's two-stage hyperexponential distribution with
    /// mean `x` and standard deviation `s`.
    ///
    /// # Errors
    ///
    /// [`Error::HyperxDeviation`] unless `s > x`.
    pub fn hyperx(&mut self, x: f64, s: f64) -> Result<f64> {
        if s <= x {
            return Err(Error::HyperxDeviation);
        }
        let cv = s / x;
        let z1 = cv * cv;
        let p = 0.5 * (1.0 - ((z1 - 1.0) / (z1 + 1.0)).sqrt());
        let z2 = if self.ranf() > p { x / (1.0 - p) } else { x / p };
        Ok(-0.5 * z2 * self.ranf().ln())
    }

    /// Draws from the normal distribution with mean `x` and standard
    /// deviation `s`, via the polar method. The second variate of each
    /// generated pair is cached for the next call.
    pub fn normal(&mut self, x: f64, s: f64) -> f64 {
        let z1 = if self.normal_z2 != 0.0 {
            let z = self.normal_z2;
            self.normal_z2 = 0.0;
            z
        } else {
            let (v1, v2, w) = loop {
                let v1 = 2.0 * self.ranf() - 1.0;
                let v2 = 2.0 * self.ranf() - 1.0;
                let w = v1 * v1 + v2 * v2;
                if w < 1.0 {
                    break (v1, v2, w);
                }
            };
            let w = ((-2.0 * w.ln()) / w).sqrt();
            self.normal_z2 = v2 * w;
            v1 * w
        };
        x + z1 * s
    }
}

impl Default for Rand {
    fn default() -> Self {
        Rand::new()
    }
}

impl RngCore for Rand {
    fn next_u32(&mut self) -> u32 {
        // 31 significant bits per step
        self.step() as u32
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
