mod config;
mod forecast;
mod ladder;
mod regions;
mod walk;

pub use config::{AutoTradeConfig, MIN_CHUNK_KWH, MIN_COOLDOWN_SEC, MIN_STEP_PCT};
pub use forecast::{
    crosshair, forecast_bars, partition, recommendation, selection_seed, series_stats,
    CrosshairReading, ForecastBar, Interval, SeriesPoint, SeriesStats, FUTURE_BARS, PAST_BARS,
};
pub use ladder::{sell_levels, GridCursor, LEVEL_EPSILON};
pub use regions::{resolve_sub_region, sub_regions, REGIONS};
pub use walk::{refresh_quote, round2, round3, DemoRng, PriceStep, PriceWalk, MAX_WALK_STEP};

pub fn module_ready() -> bool {
    true
}
