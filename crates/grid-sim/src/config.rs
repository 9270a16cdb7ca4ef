/// User-editable parameters for automated grid trading.
///
/// Malformed values are clamped into a sane range rather than rejected;
/// `normalized` is applied before the config reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoTradeConfig {
    /// First sell level of the ladder (AUD/kWh).
    pub baseline: f64,
    /// Geometric spacing between sell levels, in percent.
    pub step_pct: f64,
    /// Energy sold per automated trigger (kWh).
    pub chunk_kwh: f64,
    /// Upper price bound for the walk and the ladder.
    pub upper: f64,
    /// Lower price bound for the walk.
    pub lower: f64,
    /// Minimum seconds between successive automated triggers.
    pub cooldown_sec: u64,
    /// When false the price is held constant until manually refreshed.
    pub simulate_price: bool,
}

pub const MIN_STEP_PCT: f64 = 0.1;
pub const MIN_CHUNK_KWH: f64 = 0.1;
pub const MIN_COOLDOWN_SEC: u64 = 1;

impl Default for AutoTradeConfig {
    fn default() -> Self {
        Self {
            baseline: 0.24,
            step_pct: 5.0,
            chunk_kwh: 0.5,
            upper: 0.6,
            lower: 0.12,
            cooldown_sec: 15,
            simulate_price: true,
        }
    }
}

impl AutoTradeConfig {
    /// Returns a copy with every field forced into its valid range.
    ///
    /// Non-finite numbers fall back to zero before clamping, inverted
    /// bounds are swapped, and percent/chunk/cooldown floors are applied.
    pub fn normalized(self) -> Self {
        let finite = |value: f64| if value.is_finite() { value } else { 0.0 };

        let baseline = finite(self.baseline).max(0.0);
        let step_pct = finite(self.step_pct).max(MIN_STEP_PCT);
        let chunk_kwh = finite(self.chunk_kwh).max(MIN_CHUNK_KWH);
        let cooldown_sec = self.cooldown_sec.max(MIN_COOLDOWN_SEC);

        let raw_upper = finite(self.upper).max(0.0);
        let raw_lower = finite(self.lower).max(0.0);
        let (lower, upper) = if raw_lower <= raw_upper {
            (raw_lower, raw_upper)
        } else {
            (raw_upper, raw_lower)
        };

        Self {
            baseline,
            step_pct,
            chunk_kwh,
            upper,
            lower,
            cooldown_sec,
            simulate_price: self.simulate_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AutoTradeConfig, MIN_CHUNK_KWH, MIN_COOLDOWN_SEC, MIN_STEP_PCT};

    #[test]
    fn defaults_match_seeded_demo_values() {
        let config = AutoTradeConfig::default();

        assert_eq!(config.baseline, 0.24);
        assert_eq!(config.step_pct, 5.0);
        assert_eq!(config.chunk_kwh, 0.5);
        assert_eq!(config.upper, 0.6);
        assert_eq!(config.lower, 0.12);
        assert_eq!(config.cooldown_sec, 15);
        assert!(config.simulate_price);
    }

    #[test]
    fn normalized_swaps_inverted_bounds() {
        let config = AutoTradeConfig {
            lower: 0.5,
            upper: 0.2,
            ..AutoTradeConfig::default()
        }
        .normalized();

        assert_eq!(config.lower, 0.2);
        assert_eq!(config.upper, 0.5);
    }

    #[test]
    fn normalized_applies_minimum_floors() {
        let config = AutoTradeConfig {
            step_pct: 0.0,
            chunk_kwh: -1.0,
            cooldown_sec: 0,
            ..AutoTradeConfig::default()
        }
        .normalized();

        assert_eq!(config.step_pct, MIN_STEP_PCT);
        assert_eq!(config.chunk_kwh, MIN_CHUNK_KWH);
        assert_eq!(config.cooldown_sec, MIN_COOLDOWN_SEC);
    }

    #[test]
    fn normalized_replaces_non_finite_fields() {
        let config = AutoTradeConfig {
            baseline: f64::NAN,
            upper: f64::INFINITY,
            ..AutoTradeConfig::default()
        }
        .normalized();

        assert_eq!(config.baseline, 0.0);
        assert_eq!(config.upper, 0.12);
        assert_eq!(config.lower, 0.0);
    }

    #[test]
    fn normalized_is_idempotent() {
        let config = AutoTradeConfig {
            lower: 0.9,
            upper: 0.3,
            step_pct: -2.0,
            ..AutoTradeConfig::default()
        };

        let once = config.normalized();

        assert_eq!(once, once.normalized());
    }
}
