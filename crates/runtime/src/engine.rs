use grid_sim::{
    refresh_quote, round2, round3, sell_levels, AutoTradeConfig, DemoRng, GridCursor, PriceWalk,
    LEVEL_EPSILON,
};
use time::{Date, OffsetDateTime};
use trading::{
    add_to_last, generate_buckets, seed_week, DischargeMachine, EarningsBucket, EarningsRange,
    HistoryFilter, Phase, SellError, SellTrigger, StorageLevel, TickOutcome, TradeLedger,
    TradeRecord,
};

use crate::events::RuntimeEvent;
use crate::power::PowerHistory;

/// Default discharge power of the demo battery (kW).
pub const DEFAULT_DISCHARGE_POWER_KW: f64 = 2.0;

/// Default grid buy price at startup (AUD/kWh).
pub const START_PRICE: f64 = 0.24;

/// Idle power samples are jittered inside this band (kW).
const IDLE_POWER_MAX_KW: f64 = 0.2;

/// Rejections for the control operations that are not sell requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// The ladder config produced no sell levels; auto mode cannot start.
    LadderEmpty,
    /// Manual price refresh is disabled while automated trading runs.
    AutoTradingActive,
}

impl ControlError {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LadderEmpty => "grid config produces no sell levels",
            Self::AutoTradingActive => "not available while auto trading is active",
        }
    }
}

/// Live view of the active order for the trading screen.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OrderSnapshot {
    pub amount_kwh: f64,
    pub price: f64,
    pub progress: f64,
    pub discharged_kwh: f64,
    pub revenue: f64,
}

/// Full trading-screen state in one read.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EngineSnapshot {
    pub price: f64,
    pub price_delta: f64,
    pub storage_kwh: f64,
    pub max_storage_kwh: f64,
    pub storage_pct: f64,
    pub phase: &'static str,
    pub order: Option<OrderSnapshot>,
    pub auto_running: bool,
    pub grid_levels: Vec<f64>,
    pub next_sell_price: Option<f64>,
    pub trade_count: usize,
}

/// Single owner of all simulator state.
///
/// Every mutation is an explicit method that applies the change and
/// returns the events it produced; the periodic tick callbacks and the
/// HTTP handlers all go through here, so derived reads within one call
/// always observe that call's own writes.
#[derive(Debug, Clone)]
pub struct TradingEngine {
    walk: PriceWalk,
    rng: DemoRng,
    price: f64,
    last_price: f64,
    price_delta: f64,
    config: AutoTradeConfig,
    levels: Vec<f64>,
    cursor: GridCursor,
    auto_running: bool,
    last_sell_at_ms: Option<u64>,
    machine: DischargeMachine,
    storage: StorageLevel,
    discharge_power_kw: f64,
    ledger: TradeLedger,
    earnings: Vec<EarningsBucket>,
    power: PowerHistory,
}

impl TradingEngine {
    pub fn new(seed: u64, now_ms: u64) -> Self {
        let config = AutoTradeConfig::default();
        let levels = sell_levels(&config);

        Self {
            walk: PriceWalk::new(seed, START_PRICE),
            rng: DemoRng::new(seed.wrapping_add(1)),
            price: START_PRICE,
            last_price: START_PRICE,
            price_delta: 0.0,
            config,
            levels,
            cursor: GridCursor::new(),
            auto_running: false,
            last_sell_at_ms: None,
            machine: DischargeMachine::new(),
            storage: StorageLevel::default(),
            discharge_power_kw: DEFAULT_DISCHARGE_POWER_KW,
            ledger: TradeLedger::seeded(now_ms),
            earnings: seed_week(),
            power: PowerHistory::new(),
        }
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn auto_running(&self) -> bool {
        self.auto_running
    }

    pub fn config(&self) -> AutoTradeConfig {
        self.config
    }

    pub fn storage(&self) -> &StorageLevel {
        &self.storage
    }

    pub fn grid_levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn earnings(&self) -> &[EarningsBucket] {
        &self.earnings
    }

    pub fn power_history(&self) -> &PowerHistory {
        &self.power
    }

    pub fn discharge_power_kw(&self) -> f64 {
        self.discharge_power_kw
    }

    pub fn set_discharge_power_kw(&mut self, power_kw: f64) {
        if power_kw.is_finite() && power_kw > 0.0 {
            self.discharge_power_kw = power_kw;
        }
    }

    /// Installs a normalized auto-trade config, rebuilding the ladder and
    /// re-clamping a cursor the rebuild may have left stale.
    pub fn set_config(&mut self, config: AutoTradeConfig) -> AutoTradeConfig {
        self.config = config.normalized();
        self.levels = sell_levels(&self.config);
        self.cursor.clamp_to(&self.levels);
        self.config
    }

    pub fn snapshot(&self, now_ms: u64) -> EngineSnapshot {
        let order = self.machine.order().map(|order| OrderSnapshot {
            amount_kwh: order.amount_kwh(),
            price: order.price(),
            progress: order.progress(now_ms),
            discharged_kwh: order.discharged(now_ms),
            revenue: order.revenue(now_ms),
        });

        EngineSnapshot {
            price: self.price,
            price_delta: self.price_delta,
            storage_kwh: self.storage.available(),
            max_storage_kwh: self.storage.max(),
            storage_pct: self.storage.percentage(),
            phase: self.machine.phase().as_str(),
            order,
            auto_running: self.auto_running,
            grid_levels: self.levels.clone(),
            next_sell_price: self.cursor.next_level(&self.levels),
            trade_count: self.ledger.len(),
        }
    }

    /// Revenue preview for the manual sell form.
    pub fn estimated_revenue(&self, amount_kwh: f64) -> f64 {
        if !amount_kwh.is_finite() || amount_kwh <= 0.0 {
            return 0.0;
        }
        round2(amount_kwh * self.price)
    }

    /// Quick-amount helper: a ratio of current storage, 1-decimal rounded.
    pub fn quick_amount(&self, ratio: f64) -> f64 {
        let amount = (self.storage.available() * ratio).clamp(0.0, self.storage.available());
        (amount * 10.0).round() / 10.0
    }

    /// Starts automated trading, aligning the cursor to the first sell
    /// level at or above the current price.
    pub fn start_auto(&mut self) -> Result<Vec<RuntimeEvent>, ControlError> {
        if self.levels.is_empty() {
            return Err(ControlError::LadderEmpty);
        }

        self.cursor.align_to_price(&self.levels, self.price);
        self.auto_running = true;
        Ok(vec![RuntimeEvent::AutoStarted {
            next_level: self.cursor.next_level(&self.levels),
        }])
    }

    pub fn stop_auto(&mut self) -> Vec<RuntimeEvent> {
        self.auto_running = false;
        vec![RuntimeEvent::AutoStopped]
    }

    pub fn reset_grid(&mut self) -> Vec<RuntimeEvent> {
        self.cursor.reset();
        vec![RuntimeEvent::GridReset]
    }

    /// Manual "refresh price": re-quotes the held price. Disallowed while
    /// automated trading is active.
    pub fn refresh_price(&mut self) -> Result<Vec<RuntimeEvent>, ControlError> {
        if self.auto_running {
            return Err(ControlError::AutoTradingActive);
        }

        let previous = self.price;
        let quote = refresh_quote(&mut self.rng);
        self.last_price = previous;
        self.price = quote;
        self.price_delta = round3(quote - previous);
        self.walk.set_price(quote);
        Ok(vec![RuntimeEvent::price_refreshed(quote, self.price_delta)])
    }

    /// Manual sell confirmation. Validation failures surface to the user.
    pub fn manual_sell(
        &mut self,
        amount_kwh: f64,
        now_ms: u64,
    ) -> Result<Vec<RuntimeEvent>, SellError> {
        let order = self.machine.begin(
            amount_kwh,
            self.price,
            self.discharge_power_kw,
            SellTrigger::Manual,
            now_ms,
            &self.storage,
        )?;
        Ok(vec![RuntimeEvent::discharge_started(
            order.amount_kwh(),
            order.price(),
            SellTrigger::Manual,
        )])
    }

    /// Cancels the active discharge, committing the partial fill if any.
    pub fn cancel_discharge(&mut self, now_ms: u64) -> Vec<RuntimeEvent> {
        let Some(record) = self.machine.cancel(now_ms, &mut self.storage) else {
            return Vec::new();
        };

        let mut events = vec![RuntimeEvent::DischargeCancelled {
            discharged_kwh: record.amount_kwh,
            revenue: record.revenue,
        }];
        events.push(self.commit(record));
        events
    }

    /// Grid price tick: mutates the price, then checks the grid trigger on
    /// the post-update value within this same call. Runs only while
    /// automated trading is active; with simulation disabled the price is
    /// held constant but the trigger check still applies.
    pub fn price_tick(&mut self, now_ms: u64) -> Vec<RuntimeEvent> {
        if !self.auto_running {
            return Vec::new();
        }

        let step = if self.config.simulate_price {
            self.walk.step(self.config.lower, self.config.upper)
        } else {
            self.walk.hold()
        };
        self.last_price = step.previous;
        self.price = step.price;
        self.price_delta = step.delta;

        let mut events = vec![RuntimeEvent::price_ticked(step.price, step.delta)];
        events.extend(self.check_grid_trigger(now_ms));
        events
    }

    /// Animation tick for the active discharge (no-op otherwise).
    pub fn discharge_tick(&mut self, now_ms: u64) -> Vec<RuntimeEvent> {
        match self.machine.tick(now_ms, &mut self.storage) {
            TickOutcome::Unchanged | TickOutcome::Released => Vec::new(),
            TickOutcome::Progressed(snapshot) => {
                self.power.append(now_ms, self.discharge_power_kw);
                vec![
                    RuntimeEvent::DischargeProgressed {
                        progress: snapshot.progress,
                        discharged_kwh: snapshot.discharged_kwh,
                        revenue: snapshot.revenue,
                    },
                    RuntimeEvent::PowerSampled {
                        ts_ms: now_ms,
                        power_kw: self.discharge_power_kw,
                    },
                ]
            }
            TickOutcome::Completed(record) => {
                self.power.append(now_ms, self.discharge_power_kw);
                let mut events = vec![RuntimeEvent::DischargeCompleted {
                    amount_kwh: record.amount_kwh,
                    revenue: record.revenue,
                }];
                events.push(self.commit(record));
                events
            }
        }
    }

    /// Once-per-second idle power sample (no-op unless idle).
    pub fn idle_power_tick(&mut self, now_ms: u64) -> Vec<RuntimeEvent> {
        if self.machine.phase() != Phase::Idle {
            return Vec::new();
        }

        let power_kw = round2(self.rng.in_range(0.0, IDLE_POWER_MAX_KW));
        self.power.append(now_ms, power_kw);
        vec![RuntimeEvent::PowerSampled {
            ts_ms: now_ms,
            power_kw,
        }]
    }

    /// Read-only history view; never reorders the ledger.
    pub fn history(&self, filter: &HistoryFilter, now_ms: u64) -> Vec<TradeRecord> {
        filter.apply(self.ledger.records(), now_ms)
    }

    /// Regenerates the earnings buckets for a new reporting range. A
    /// custom range without valid dates keeps the current buckets.
    pub fn set_earnings_range(
        &mut self,
        range: EarningsRange,
        start: Option<Date>,
        end: Option<Date>,
        now_ms: u64,
    ) -> &[EarningsBucket] {
        let next = generate_buckets(range, start, end, today(now_ms), &mut self.rng);
        if !next.is_empty() || range != EarningsRange::Custom {
            self.earnings = next;
        }
        &self.earnings
    }

    fn check_grid_trigger(&mut self, now_ms: u64) -> Vec<RuntimeEvent> {
        let Some(level) = self.cursor.next_level(&self.levels) else {
            return Vec::new();
        };
        if self.price < level - LEVEL_EPSILON {
            return Vec::new();
        }
        if self.storage.available() <= 0.0 {
            return Vec::new();
        }
        if self.machine.phase() != Phase::Idle {
            // refractory: one order at a time
            return Vec::new();
        }
        let cooldown_ms = self.config.cooldown_sec * 1_000;
        let cooldown_ok = self
            .last_sell_at_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= cooldown_ms);
        if !cooldown_ok {
            return Vec::new();
        }

        let amount = self.config.chunk_kwh.min(self.storage.available());
        let Ok(order) = self.machine.begin(
            amount,
            self.price,
            self.discharge_power_kw,
            SellTrigger::GridLevel,
            now_ms,
            &self.storage,
        ) else {
            return Vec::new();
        };

        self.last_sell_at_ms = Some(now_ms);
        self.cursor.advance(&self.levels);
        vec![RuntimeEvent::discharge_started(
            order.amount_kwh(),
            order.price(),
            SellTrigger::GridLevel,
        )]
    }

    fn commit(&mut self, record: TradeRecord) -> RuntimeEvent {
        self.ledger.record(record);
        add_to_last(&mut self.earnings, record.revenue);
        RuntimeEvent::trade_recorded(&record)
    }
}

fn today(now_ms: u64) -> Date {
    OffsetDateTime::from_unix_timestamp((now_ms / 1_000) as i64)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
        .date()
}
