use grid_sim::round2;

/// Battery storage level, bounded to `[0, max_kwh]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageLevel {
    current_kwh: f64,
    max_kwh: f64,
}

pub const DEFAULT_STORAGE_KWH: f64 = 8.5;
pub const DEFAULT_MAX_STORAGE_KWH: f64 = 10.0;

impl StorageLevel {
    pub fn new(current_kwh: f64, max_kwh: f64) -> Self {
        let max_kwh = if max_kwh.is_finite() && max_kwh > 0.0 {
            max_kwh
        } else {
            DEFAULT_MAX_STORAGE_KWH
        };
        let current_kwh = if current_kwh.is_finite() {
            current_kwh.clamp(0.0, max_kwh)
        } else {
            0.0
        };

        Self {
            current_kwh,
            max_kwh,
        }
    }

    pub fn available(&self) -> f64 {
        self.current_kwh
    }

    pub fn max(&self) -> f64 {
        self.max_kwh
    }

    pub fn percentage(&self) -> f64 {
        (self.current_kwh / self.max_kwh * 100.0).clamp(0.0, 100.0)
    }

    /// Recomputes the level from the order's pre-discharge baseline and the
    /// energy discharged so far (restore-then-reapply: the level is never
    /// decremented incrementally, so replays of the same tick are
    /// idempotent and the delta can never exceed `discharged`).
    pub fn apply_discharge(&mut self, baseline_kwh: f64, discharged_kwh: f64) {
        let next = (baseline_kwh - discharged_kwh).max(0.0);
        self.current_kwh = round2(next.min(self.max_kwh));
    }
}

impl Default for StorageLevel {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KWH, DEFAULT_MAX_STORAGE_KWH)
    }
}
