use grid_sim::round2;

use crate::ledger::TradeRecord;
use crate::order::{DischargeOrder, SellError, COMPLETED_HOLD_MS};
use crate::storage::StorageLevel;

/// Publicly visible phase of the discharge cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Discharging,
    Completed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Discharging => "discharging",
            Self::Completed => "completed",
        }
    }
}

/// What started the active order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellTrigger {
    Manual,
    GridLevel,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PhaseState {
    Idle,
    Discharging {
        order: DischargeOrder,
        storage_baseline: f64,
        trigger: SellTrigger,
    },
    Completed {
        until_ms: u64,
    },
}

/// Live snapshot of the active order, recomputed every animation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DischargeSnapshot {
    pub progress: f64,
    pub discharged_kwh: f64,
    pub revenue: f64,
}

/// Result of one animation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing to do (idle, or completed hold not yet elapsed).
    Unchanged,
    /// Active order advanced; storage has been updated.
    Progressed(DischargeSnapshot),
    /// Order reached 100%: the full-amount trade record to commit.
    Completed(TradeRecord),
    /// The completed display hold elapsed; machine returned to idle.
    Released,
}

/// State machine tracking the single in-flight discharge operation.
///
/// `idle -> discharging` on a manual sell or grid trigger,
/// `discharging -> completed` at 100% progress (full-amount record),
/// `completed -> idle` after a fixed display hold, and
/// `discharging -> idle` on cancellation (partial record, no hold).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DischargeMachine {
    state: PhaseState,
}

impl DischargeMachine {
    pub fn new() -> Self {
        Self {
            state: PhaseState::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            PhaseState::Idle => Phase::Idle,
            PhaseState::Discharging { .. } => Phase::Discharging,
            PhaseState::Completed { .. } => Phase::Completed,
        }
    }

    pub fn order(&self) -> Option<&DischargeOrder> {
        match &self.state {
            PhaseState::Discharging { order, .. } => Some(order),
            _ => None,
        }
    }

    pub fn trigger(&self) -> Option<SellTrigger> {
        match self.state {
            PhaseState::Discharging { trigger, .. } => Some(trigger),
            _ => None,
        }
    }

    /// Starts a discharge of `amount_kwh` at the current `price`.
    ///
    /// Rejected while any order is active (the machine is refractory) or
    /// when the amount is non-positive or exceeds storage.
    pub fn begin(
        &mut self,
        amount_kwh: f64,
        price: f64,
        discharge_power_kw: f64,
        trigger: SellTrigger,
        now_ms: u64,
        storage: &StorageLevel,
    ) -> Result<DischargeOrder, SellError> {
        if !matches!(self.state, PhaseState::Idle) {
            return Err(SellError::DischargeInProgress);
        }
        if !amount_kwh.is_finite() || amount_kwh <= 0.0 {
            return Err(SellError::NonPositiveAmount);
        }
        if amount_kwh > storage.available() {
            return Err(SellError::ExceedsStorage);
        }

        let order = DischargeOrder::new(amount_kwh, price, discharge_power_kw, now_ms)?;
        self.state = PhaseState::Discharging {
            order,
            storage_baseline: storage.available(),
            trigger,
        };
        Ok(order)
    }

    /// Advances the active order by elapsed wall-clock time, updating
    /// `storage` from the order's pre-discharge baseline.
    pub fn tick(&mut self, now_ms: u64, storage: &mut StorageLevel) -> TickOutcome {
        match self.state {
            PhaseState::Idle => TickOutcome::Unchanged,
            PhaseState::Completed { until_ms } => {
                if now_ms >= until_ms {
                    self.state = PhaseState::Idle;
                    TickOutcome::Released
                } else {
                    TickOutcome::Unchanged
                }
            }
            PhaseState::Discharging {
                order,
                storage_baseline,
                ..
            } => {
                let progress = order.progress(now_ms);
                let discharged = order.discharged(now_ms);
                storage.apply_discharge(storage_baseline, discharged);

                if progress >= 100.0 {
                    // committed with the full order amount, not the partial
                    let record = TradeRecord {
                        ts_ms: now_ms,
                        amount_kwh: order.amount_kwh(),
                        price: order.price(),
                        revenue: round2(order.amount_kwh() * order.price()),
                    };
                    self.state = PhaseState::Completed {
                        until_ms: now_ms + COMPLETED_HOLD_MS,
                    };
                    TickOutcome::Completed(record)
                } else {
                    TickOutcome::Progressed(DischargeSnapshot {
                        progress,
                        discharged_kwh: discharged,
                        revenue: order.revenue(now_ms),
                    })
                }
            }
        }
    }

    /// Cancels the active order, committing only what was discharged so
    /// far. Returns `None` when nothing was discharged yet or no order is
    /// active. The machine goes straight back to idle, skipping the
    /// completed hold.
    pub fn cancel(&mut self, now_ms: u64, storage: &mut StorageLevel) -> Option<TradeRecord> {
        let PhaseState::Discharging {
            order,
            storage_baseline,
            ..
        } = self.state
        else {
            return None;
        };

        let discharged = order.discharged(now_ms);
        storage.apply_discharge(storage_baseline, discharged);
        self.state = PhaseState::Idle;

        if discharged <= 0.0 {
            return None;
        }
        Some(TradeRecord {
            ts_ms: now_ms,
            amount_kwh: discharged,
            price: order.price(),
            revenue: round2(discharged * order.price()),
        })
    }
}

impl Default for DischargeMachine {
    fn default() -> Self {
        Self::new()
    }
}
