/// Deterministic LCG used by every mock-data generator in the workspace.
///
/// All simulated values (price steps, forecast noise, demo earnings) come
/// from seeded instances of this generator so ticks replay identically for
/// a given seed.
#[derive(Debug, Clone)]
pub struct DemoRng {
    state: u64,
}

impl DemoRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform sample in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform sample in `[min, max)`.
    pub fn in_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_unit() * (max - min)
    }
}

/// One observed price mutation: the new price, the value it replaced, and
/// the signed delta between them (3 decimals, for directional display).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStep {
    pub price: f64,
    pub previous: f64,
    pub delta: f64,
}

/// Bounded random-walk generator for the grid buy price.
///
/// Each step perturbs the price by a uniform amount in
/// `[-MAX_WALK_STEP, MAX_WALK_STEP]`, rounds to 3 decimals, and clamps the
/// result into `[lower, upper]`.
#[derive(Debug, Clone)]
pub struct PriceWalk {
    rng: DemoRng,
    price: f64,
}

/// Half-width of the uniform walk step applied before clamping.
pub const MAX_WALK_STEP: f64 = 0.005;

impl PriceWalk {
    pub fn new(seed: u64, start_price: f64) -> Self {
        assert!(
            start_price.is_finite() && start_price >= 0.0,
            "start_price must be finite and non-negative"
        );

        Self {
            rng: DemoRng::new(seed),
            price: start_price,
        }
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Replaces the current price without stepping, used when a manual
    /// refresh re-quotes the price while the walk is paused.
    pub fn set_price(&mut self, price: f64) {
        if price.is_finite() && price >= 0.0 {
            self.price = price;
        }
    }

    /// Advances the walk one tick inside `[lower, upper]`.
    ///
    /// Inverted bounds are normalized by swapping before the clamp, so a
    /// misconfigured `lower > upper` can never produce an out-of-band price.
    pub fn step(&mut self, lower: f64, upper: f64) -> PriceStep {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };

        let previous = self.price;
        let step = (self.rng.next_unit() - 0.5) * (MAX_WALK_STEP * 2.0);
        let next = round3(previous + step).clamp(lower, upper);
        self.price = next;

        PriceStep {
            price: next,
            previous,
            delta: round3(next - previous),
        }
    }

    /// Holds the price constant for one tick (simulation disabled).
    pub fn hold(&self) -> PriceStep {
        PriceStep {
            price: self.price,
            previous: self.price,
            delta: 0.0,
        }
    }
}

/// Fresh quote for the manual "refresh price" action: uniform in
/// `[0.20, 0.30)`, rounded to 2 decimals.
pub fn refresh_quote(rng: &mut DemoRng) -> f64 {
    round2(rng.in_range(0.20, 0.30))
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
