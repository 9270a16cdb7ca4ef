/// Fixed multiplier compressing real discharge time into demo display time.
pub const DEMO_ACCELERATION: f64 = 120.0;

/// How long the machine lingers in `Completed` before returning to idle.
pub const COMPLETED_HOLD_MS: u64 = 2_000;

/// Rejection reasons for a sell request, surfaced directly to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellError {
    /// Requested amount is missing, non-finite, or `<= 0`.
    NonPositiveAmount,
    /// Requested amount exceeds the energy currently in storage.
    ExceedsStorage,
    /// Exactly one discharge may run at a time.
    DischargeInProgress,
    /// Discharge power must be finite and positive.
    InvalidDischargePower,
}

impl SellError {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "sell amount must be greater than zero",
            Self::ExceedsStorage => "sell amount exceeds available storage",
            Self::DischargeInProgress => "a discharge is already in progress",
            Self::InvalidDischargePower => "discharge power must be positive",
        }
    }
}

/// One in-flight energy-sell operation. The price is fixed at trigger time;
/// everything else is derived from elapsed wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DischargeOrder {
    amount_kwh: f64,
    price: f64,
    started_at_ms: u64,
    duration_ms: u64,
}

impl DischargeOrder {
    /// Creates an order discharging `amount_kwh` at `discharge_power_kw`.
    ///
    /// Real duration is `amount / power` hours; the demo acceleration
    /// factor divides it down for display.
    pub fn new(
        amount_kwh: f64,
        price: f64,
        discharge_power_kw: f64,
        started_at_ms: u64,
    ) -> Result<Self, SellError> {
        if !amount_kwh.is_finite() || amount_kwh <= 0.0 {
            return Err(SellError::NonPositiveAmount);
        }
        if !discharge_power_kw.is_finite() || discharge_power_kw <= 0.0 {
            return Err(SellError::InvalidDischargePower);
        }

        let real_secs = amount_kwh / discharge_power_kw * 3_600.0;
        let duration_ms = (real_secs * 1_000.0 / DEMO_ACCELERATION).round() as u64;

        Ok(Self {
            amount_kwh,
            price,
            started_at_ms,
            duration_ms,
        })
    }

    pub fn amount_kwh(&self) -> f64 {
        self.amount_kwh
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Completion percentage in `[0, 100]` at `now_ms`.
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 100.0;
        }
        let elapsed = now_ms.saturating_sub(self.started_at_ms) as f64;
        (elapsed / self.duration_ms as f64 * 100.0).min(100.0)
    }

    /// Energy drawn down so far: `amount * progress / 100`.
    pub fn discharged(&self, now_ms: u64) -> f64 {
        self.amount_kwh * self.progress(now_ms) / 100.0
    }

    /// Revenue accrued so far: `discharged * price`.
    pub fn revenue(&self, now_ms: u64) -> f64 {
        self.discharged(now_ms) * self.price
    }
}

#[cfg(test)]
mod tests {
    use super::{DischargeOrder, SellError};

    #[test]
    fn duration_uses_demo_acceleration() {
        // 2 kWh at 2 kW is one real hour; 120x acceleration gives 30 s
        let order = DischargeOrder::new(2.0, 0.25, 2.0, 0).unwrap();

        assert_eq!(order.duration_ms(), 30_000);
    }

    #[test]
    fn progress_interpolates_and_caps_at_hundred() {
        let order = DischargeOrder::new(2.0, 0.25, 2.0, 1_000).unwrap();

        assert_eq!(order.progress(1_000), 0.0);
        assert_eq!(order.progress(16_000), 50.0);
        assert_eq!(order.progress(31_000), 100.0);
        assert_eq!(order.progress(500_000), 100.0);
    }

    #[test]
    fn progress_before_start_time_is_zero() {
        let order = DischargeOrder::new(2.0, 0.25, 2.0, 10_000).unwrap();

        assert_eq!(order.progress(5_000), 0.0);
    }

    #[test]
    fn discharged_is_exactly_amount_times_progress() {
        let order = DischargeOrder::new(2.0, 0.25, 2.0, 0).unwrap();

        let progress = order.progress(12_000);

        assert_eq!(order.discharged(12_000), 2.0 * progress / 100.0);
        assert_eq!(order.revenue(12_000), order.discharged(12_000) * 0.25);
    }

    #[test]
    fn revenue_is_monotonic_over_the_order_lifetime() {
        let order = DischargeOrder::new(1.5, 0.3, 2.0, 0).unwrap();

        let mut last = 0.0;
        for now in (0..40_000).step_by(100) {
            let revenue = order.revenue(now);
            assert!(revenue >= last);
            last = revenue;
        }
    }

    #[test]
    fn rejects_invalid_amount_and_power() {
        assert_eq!(
            DischargeOrder::new(0.0, 0.25, 2.0, 0),
            Err(SellError::NonPositiveAmount)
        );
        assert_eq!(
            DischargeOrder::new(f64::NAN, 0.25, 2.0, 0),
            Err(SellError::NonPositiveAmount)
        );
        assert_eq!(
            DischargeOrder::new(1.0, 0.25, 0.0, 0),
            Err(SellError::InvalidDischargePower)
        );
    }
}
