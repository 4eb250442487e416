//! Random sampling primitives shared by every scene generator.
//!
//! [`Sampler`] wraps any [`RngCore`] and adds the handful of draws the generators need:
//! uniform reals and integers, unbiased booleans, symmetric amplitudes, gaussian deviates
//! (Marsaglia polar method with a one-slot spare cache) and Fisher–Yates shuffles.
//!
//! A sampler is owned by a single scene build. `Sampler<StdRng>` coerces to
//! `Sampler<dyn RngCore>`, which is how it travels through [`crate::scene::SceneContext`].
use rand::Rng as RngCore;

/// Upper bound on rejection rounds in [`Sampler::gaussian`].
///
/// A healthy source accepts with probability π/4 per round; only a degenerate source
/// (e.g. a constant test double) ever gets close.
const MAX_REJECTION_ROUNDS: usize = 1024;

/// Generate a random float in the range [0, 1).
///
/// Uses the 24 high bits of `next_u32`, which are exactly representable as `f32`.
#[inline]
pub(crate) fn rand01<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Random source plus the spare-deviate cache of the polar method.
pub struct Sampler<R: ?Sized> {
    spare: Option<f32>,
    rng: R,
}

impl<R: RngCore> Sampler<R> {
    /// Create a sampler with an empty spare cache.
    pub fn new(rng: R) -> Self {
        Self { spare: None, rng }
    }

    /// Consume the sampler, returning the underlying generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: RngCore + ?Sized> Sampler<R> {
    /// Uniform draw in [0, 1).
    #[inline]
    pub fn unit(&mut self) -> f32 {
        rand01(&mut self.rng)
    }

    /// Uniform draw in [lo, hi).
    #[inline]
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.unit() * (hi - lo)
    }

    /// Uniform integer in [lo, hi], inclusive at both ends. Returns `lo` when `hi <= lo`.
    pub fn uniform_int(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = i64::from(hi) - i64::from(lo) + 1;
        let offset = ((self.unit() as f64) * span as f64).floor() as i64;
        (i64::from(lo) + offset.min(span - 1)) as i32
    }

    /// Unbiased coin flip.
    #[inline]
    pub fn boolean(&mut self) -> bool {
        self.unit() < 0.5
    }

    /// Uniform draw in [center - spread, center + spread).
    #[inline]
    pub fn amplitude(&mut self, center: f32, spread: f32) -> f32 {
        self.uniform(center - spread, center + spread)
    }

    /// Gaussian deviate with the given mean and standard deviation.
    ///
    /// Either returns the cached spare (drawing nothing) or rejection-samples a pair of
    /// uniforms in [-1, 1] until their squared norm lies in (0, 1), caching one deviate.
    pub fn gaussian(&mut self, mean: f32, sd: f32) -> f32 {
        if let Some(z) = self.spare.take() {
            return mean + sd * z;
        }

        for _ in 0..MAX_REJECTION_ROUNDS {
            let u = 2.0 * self.unit() - 1.0;
            let v = 2.0 * self.unit() - 1.0;
            let q = u * u + v * v;
            if q > 0.0 && q < 1.0 {
                let r = (-2.0 * q.ln() / q).sqrt();
                self.spare = Some(u * r);
                return mean + sd * v * r;
            }
        }

        mean
    }

    /// Whether the next [`Sampler::gaussian`] call will be served from the cache.
    pub fn has_spare(&self) -> bool {
        self.spare.is_some()
    }

    /// Drop any cached spare deviate.
    pub fn clear_spare(&mut self) {
        self.spare = None;
    }

    /// Fisher–Yates shuffle in place, scanning from the last index down to 1.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.uniform_int(0, i as i32) as usize;
            items.swap(i, j);
        }
    }

    /// Uniform index into a slice of length `len`, or `None` when empty.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.uniform_int(0, (len - 1) as i32) as usize)
    }

    /// Mutable access to the underlying generator.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
