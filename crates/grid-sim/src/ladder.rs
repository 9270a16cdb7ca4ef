use crate::config::AutoTradeConfig;
use crate::walk::round3;

/// Tolerance used both when truncating the ladder at the upper bound and
/// when comparing the live price against a sell level.
pub const LEVEL_EPSILON: f64 = 1e-6;

/// Builds the geometric ladder of sell-trigger price levels.
///
/// Starting at `baseline`, each level is the previous one multiplied by
/// `1 + step_pct / 100`, rounded to 3 decimals, stopping once the raw level
/// exceeds `upper + LEVEL_EPSILON`. Levels that round onto the previous one
/// are skipped so the ladder is strictly increasing. The ladder is empty
/// when any of `{baseline, step_pct, upper}` is non-positive or non-finite.
pub fn sell_levels(config: &AutoTradeConfig) -> Vec<f64> {
    let AutoTradeConfig {
        baseline,
        step_pct,
        upper,
        ..
    } = *config;

    if !baseline.is_finite() || !step_pct.is_finite() || !upper.is_finite() {
        return Vec::new();
    }
    if baseline <= 0.0 || step_pct <= 0.0 || upper <= 0.0 {
        return Vec::new();
    }

    let factor = 1.0 + step_pct / 100.0;
    let mut levels = Vec::new();
    let mut level = baseline;
    while level <= upper + LEVEL_EPSILON {
        let rounded = round3(level);
        if levels.last().is_none_or(|last| rounded > *last) {
            levels.push(rounded);
        }
        level *= factor;
    }
    levels
}

/// Index of the next untriggered ladder level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCursor {
    index: usize,
}

impl GridCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current index clamped into `[0, len - 1]`; `None` on an empty ladder.
    pub fn position(&self, levels: &[f64]) -> Option<usize> {
        if levels.is_empty() {
            return None;
        }
        Some(self.index.min(levels.len() - 1))
    }

    /// The price of the next untriggered level, if any.
    pub fn next_level(&self, levels: &[f64]) -> Option<f64> {
        self.position(levels).map(|index| levels[index])
    }

    /// Moves to the following level, saturating at the last one.
    pub fn advance(&mut self, levels: &[f64]) {
        if let Some(position) = self.position(levels) {
            self.index = (position + 1).min(levels.len() - 1);
        }
    }

    /// Points the cursor at the first level `>=` the given price, or the
    /// last level when the price is already above the whole ladder. Used
    /// when automated trading starts.
    pub fn align_to_price(&mut self, levels: &[f64], price: f64) {
        if levels.is_empty() {
            self.index = 0;
            return;
        }
        self.index = levels
            .iter()
            .position(|level| *level >= price)
            .unwrap_or(levels.len() - 1);
    }

    /// Back to the first level (manual reset).
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Re-clamps a cursor left stale by a ladder rebuild.
    pub fn clamp_to(&mut self, levels: &[f64]) {
        if levels.is_empty() {
            self.index = 0;
        } else {
            self.index = self.index.min(levels.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{sell_levels, GridCursor, LEVEL_EPSILON};
    use crate::config::AutoTradeConfig;

    fn config(baseline: f64, step_pct: f64, upper: f64) -> AutoTradeConfig {
        AutoTradeConfig {
            baseline,
            step_pct,
            upper,
            ..AutoTradeConfig::default()
        }
    }

    #[test]
    fn ladder_matches_documented_example() {
        let levels = sell_levels(&config(0.24, 5.0, 0.30));

        assert_eq!(levels, vec![0.24, 0.252, 0.265, 0.278, 0.292]);
    }

    #[test]
    fn ladder_is_strictly_increasing_and_bounded() {
        let levels = sell_levels(&config(0.24, 5.0, 0.6));

        assert!(!levels.is_empty());
        for pair in levels.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        for level in &levels {
            assert!(*level <= 0.6 + LEVEL_EPSILON);
        }
    }

    #[test]
    fn ladder_stays_strictly_increasing_under_tiny_steps() {
        // 0.1% of 0.24 rounds away at 3 decimals; duplicates must be skipped
        let levels = sell_levels(&config(0.24, 0.1, 0.26));

        for pair in levels.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn ladder_is_empty_for_degenerate_config() {
        assert!(sell_levels(&config(0.0, 5.0, 0.3)).is_empty());
        assert!(sell_levels(&config(0.24, 0.0, 0.3)).is_empty());
        assert!(sell_levels(&config(0.24, 5.0, 0.0)).is_empty());
        assert!(sell_levels(&config(f64::NAN, 5.0, 0.3)).is_empty());
    }

    #[test]
    fn ladder_with_baseline_above_upper_has_no_levels() {
        assert!(sell_levels(&config(0.5, 5.0, 0.3)).is_empty());
    }

    #[test]
    fn cursor_advances_and_saturates() {
        let levels = sell_levels(&config(0.24, 5.0, 0.30));
        let mut cursor = GridCursor::new();

        for _ in 0..levels.len() + 3 {
            cursor.advance(&levels);
        }

        assert_eq!(cursor.position(&levels), Some(levels.len() - 1));
    }

    #[test]
    fn cursor_aligns_to_first_level_at_or_above_price() {
        let levels = sell_levels(&config(0.24, 5.0, 0.30));
        let mut cursor = GridCursor::new();

        cursor.align_to_price(&levels, 0.26);
        assert_eq!(cursor.next_level(&levels), Some(0.265));

        cursor.align_to_price(&levels, 0.9);
        assert_eq!(cursor.next_level(&levels), Some(0.292));

        cursor.align_to_price(&levels, 0.0);
        assert_eq!(cursor.next_level(&levels), Some(0.24));
    }

    #[test]
    fn stale_cursor_is_reclamped_after_ladder_rebuild() {
        let long = sell_levels(&config(0.24, 5.0, 0.6));
        let short = sell_levels(&config(0.24, 5.0, 0.30));
        let mut cursor = GridCursor::new();
        for _ in 0..long.len() - 1 {
            cursor.advance(&long);
        }

        cursor.clamp_to(&short);

        assert_eq!(cursor.position(&short), Some(short.len() - 1));
    }

    #[test]
    fn cursor_on_empty_ladder_yields_nothing() {
        let mut cursor = GridCursor::new();

        cursor.align_to_price(&[], 0.3);
        cursor.advance(&[]);

        assert_eq!(cursor.next_level(&[]), None);
        assert_eq!(cursor.position(&[]), None);
    }
}
