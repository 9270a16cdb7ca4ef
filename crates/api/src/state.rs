use grid_sim::AutoTradeConfig;
use runtime::EngineHandle;
use trading::{parse_filter_date, EarningsRange, HistoryFilter, HistoryRange};

/// Shared handler state: a clone-cheap handle to the single engine.
#[derive(Clone)]
pub struct AppState {
    handle: EngineHandle,
}

impl AppState {
    pub fn new(handle: EngineHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &EngineHandle {
        &self.handle
    }
}

/// Wire form of the auto-trade settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ConfigPayload {
    pub baseline: f64,
    pub step_pct: f64,
    pub chunk_kwh: f64,
    pub upper: f64,
    pub lower: f64,
    pub cooldown_sec: u64,
    pub simulate_price: bool,
}

impl From<AutoTradeConfig> for ConfigPayload {
    fn from(config: AutoTradeConfig) -> Self {
        Self {
            baseline: config.baseline,
            step_pct: config.step_pct,
            chunk_kwh: config.chunk_kwh,
            upper: config.upper,
            lower: config.lower,
            cooldown_sec: config.cooldown_sec,
            simulate_price: config.simulate_price,
        }
    }
}

impl From<ConfigPayload> for AutoTradeConfig {
    fn from(payload: ConfigPayload) -> Self {
        Self {
            baseline: payload.baseline,
            step_pct: payload.step_pct,
            chunk_kwh: payload.chunk_kwh,
            upper: payload.upper,
            lower: payload.lower,
            cooldown_sec: payload.cooldown_sec,
            simulate_price: payload.simulate_price,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SellRequest {
    pub amount_kwh: f64,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ForecastQuery {
    pub region: Option<String>,
    pub sub_region: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct CrosshairQuery {
    pub region: Option<String>,
    pub sub_region: Option<String>,
    pub interval: Option<String>,
    pub ts: u64,
}

impl CrosshairQuery {
    pub fn selection(&self) -> ForecastQuery {
        ForecastQuery {
            region: self.region.clone(),
            sub_region: self.sub_region.clone(),
            interval: self.interval.clone(),
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct HistoryQuery {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl HistoryQuery {
    /// Unknown range values read as the default; malformed dates read as
    /// absent, which skips the custom window.
    pub fn to_filter(&self) -> HistoryFilter {
        HistoryFilter {
            range: self
                .range
                .as_deref()
                .and_then(HistoryRange::parse)
                .unwrap_or(HistoryRange::SevenDays),
            start: self.start.as_deref().and_then(parse_filter_date),
            end: self.end.as_deref().and_then(parse_filter_date),
            amount_min: self.amount_min,
            amount_max: self.amount_max,
            price_min: self.price_min,
            price_max: self.price_max,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct EarningsQuery {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl EarningsQuery {
    pub fn range(&self) -> EarningsRange {
        self.range
            .as_deref()
            .and_then(EarningsRange::parse)
            .unwrap_or(EarningsRange::SevenDays)
    }

    pub fn dates(&self) -> (Option<time::Date>, Option<time::Date>) {
        (
            self.start.as_deref().and_then(parse_filter_date),
            self.end.as_deref().and_then(parse_filter_date),
        )
    }
}
