use crate::walk::{round2, DemoRng};

/// Sampling interval for the forecast chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    M1,
    M5,
    M15,
    H1,
    H4,
    D1,
    W1,
    Mo1,
}

impl Interval {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1m" => Some(Self::M1),
            "5m" => Some(Self::M5),
            "15m" => Some(Self::M15),
            "1h" => Some(Self::H1),
            "4h" => Some(Self::H4),
            "1d" => Some(Self::D1),
            "1w" => Some(Self::W1),
            "1mo" => Some(Self::Mo1),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::H1 => "1h",
            Self::H4 => "4h",
            Self::D1 => "1d",
            Self::W1 => "1w",
            Self::Mo1 => "1mo",
        }
    }

    pub fn step_secs(self) -> u64 {
        match self {
            Self::M1 => 60,
            Self::M5 => 300,
            Self::M15 => 900,
            Self::H1 => 3_600,
            Self::H4 => 14_400,
            Self::D1 => 86_400,
            Self::W1 => 604_800,
            Self::Mo1 => 2_592_000,
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::H1
    }
}

/// One generated OHLC bar (2-decimal values, epoch-second timestamps).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastBar {
    pub ts: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A `{timestamp, value}` chart point handed to the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub ts: u64,
    pub value: f64,
}

pub const PAST_BARS: usize = 240;
pub const FUTURE_BARS: usize = 48;

const BASE_PRICE_SEED: f64 = 25.0;
const PRICE_FLOOR: f64 = 0.1;

/// Deterministic RNG seed for a selector combination, so re-selecting the
/// same region/sub-region/interval regenerates the same mock series.
pub fn selection_seed(region: &str, sub_region: &str, interval: Interval) -> u64 {
    let mut seed = 0xcbf29ce484222325u64;
    for byte in region
        .bytes()
        .chain(sub_region.bytes())
        .chain(interval.as_str().bytes())
    {
        seed ^= u64::from(byte);
        seed = seed.wrapping_mul(0x100000001b3);
    }
    seed
}

/// Generates `past_bars + future_bars` synthetic bars around `now_sec`.
///
/// The opening price is offset by the region and sub-region initials (the
/// selectors only reseed the mock data); future bars use a gentler drift
/// and tighter noise than past bars.
pub fn forecast_bars(
    region: &str,
    sub_region: &str,
    interval: Interval,
    past_bars: usize,
    future_bars: usize,
    now_sec: u64,
    rng: &mut DemoRng,
) -> Vec<ForecastBar> {
    let step = interval.step_secs();
    let start = now_sec.saturating_sub((past_bars.saturating_sub(1) as u64) * step);
    let total = past_bars + future_bars;

    let region_offset = region.bytes().next().map_or(0, |b| b % 3);
    let sub_offset = sub_region.bytes().next().map_or(0, |b| b % 2);
    let mut price = BASE_PRICE_SEED + f64::from(region_offset) + f64::from(sub_offset);

    let mut bars = Vec::with_capacity(total);
    for k in 0..total {
        let ts = start + k as u64 * step;
        let is_future = ts > now_sec;
        let k = k as f64;

        let drift = ((k / 15.0).sin() + (k / 28.0).cos()) * if is_future { 0.06 } else { 0.1 };
        let noise = (rng.next_unit() - 0.5) * if is_future { 0.35 } else { 0.6 };
        let wick = if is_future { 0.35 } else { 0.5 };

        let open = price;
        let close = (open + drift + noise).max(PRICE_FLOOR);
        let high = open.max(close) + rng.next_unit() * wick;
        let low = (open.min(close) - rng.next_unit() * wick).max(0.0);

        bars.push(ForecastBar {
            ts,
            open: round2(open),
            high: round2(high),
            low: round2(low),
            close: round2(close),
        });
        price = close;
    }
    bars
}

/// Splits bar closes into the "actual" (past) and "forecast" (future)
/// series relative to `now_sec`.
pub fn partition(bars: &[ForecastBar], now_sec: u64) -> (Vec<SeriesPoint>, Vec<SeriesPoint>) {
    let point = |bar: &ForecastBar| SeriesPoint {
        ts: bar.ts,
        value: bar.close,
    };
    let past = bars.iter().filter(|bar| bar.ts <= now_sec).map(point).collect();
    let future = bars.iter().filter(|bar| bar.ts > now_sec).map(point).collect();
    (past, future)
}

/// Headline stats over the past series, 1-decimal rounding; all zero when
/// the series is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub current: f64,
    pub average: f64,
    pub peak: f64,
    pub low: f64,
}

pub fn series_stats(past: &[SeriesPoint]) -> SeriesStats {
    if past.is_empty() {
        return SeriesStats {
            current: 0.0,
            average: 0.0,
            peak: 0.0,
            low: 0.0,
        };
    }

    let current = past[past.len() - 1].value;
    let sum: f64 = past.iter().map(|point| point.value).sum();
    let peak = past.iter().map(|point| point.value).fold(f64::MIN, f64::max);
    let low = past.iter().map(|point| point.value).fold(f64::MAX, f64::min);

    let round1 = |value: f64| (value * 10.0).round() / 10.0;
    SeriesStats {
        current: round1(current),
        average: round1(sum / past.len() as f64),
        peak: round1(peak),
        low: round1(low),
    }
}

pub fn recommendation(stats: &SeriesStats) -> &'static str {
    if stats.current > stats.average {
        "Price above average, consider gradual selling."
    } else {
        "Price below average, consider holding."
    }
}

/// Crosshair inspection: nearest-point values for both series at `ts`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairReading {
    pub actual: Option<f64>,
    pub forecast: Option<f64>,
}

pub fn crosshair(past: &[SeriesPoint], future: &[SeriesPoint], ts: u64) -> CrosshairReading {
    CrosshairReading {
        actual: nearest_value(past, ts),
        forecast: nearest_value(future, ts),
    }
}

fn nearest_value(points: &[SeriesPoint], ts: u64) -> Option<f64> {
    points
        .iter()
        .min_by_key(|point| point.ts.abs_diff(ts))
        .map(|point| point.value)
}
