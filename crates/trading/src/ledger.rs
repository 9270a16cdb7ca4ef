use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

/// Immutable record of a completed (or partially completed) trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeRecord {
    pub ts_ms: u64,
    pub amount_kwh: f64,
    pub price: f64,
    pub revenue: f64,
}

/// Maximum number of records retained; oldest entries are evicted.
pub const LEDGER_CAP: usize = 100;

const DAY_MS: u64 = 86_400_000;

/// Append-only, capped, newest-first list of trade records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLedger {
    records: Vec<TradeRecord>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo ledger seeded with two historical trades relative to `now_ms`.
    pub fn seeded(now_ms: u64) -> Self {
        let now = OffsetDateTime::from_unix_timestamp((now_ms / 1_000) as i64)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH);
        let at = |date: Date, hour: u8, minute: u8| -> u64 {
            let time = Time::from_hms(hour, minute, 0).unwrap_or(Time::MIDNIGHT);
            let ts = date.with_time(time).assume_utc().unix_timestamp();
            ts.max(0) as u64 * 1_000
        };
        let today = now.date();
        let yesterday = today.previous_day().unwrap_or(today);

        let mut ledger = Self::new();
        ledger.record(TradeRecord {
            ts_ms: at(yesterday, 19, 10),
            amount_kwh: 3.5,
            price: 0.28,
            revenue: 0.98,
        });
        ledger.record(TradeRecord {
            ts_ms: at(today, 18, 5),
            amount_kwh: 2.0,
            price: 0.23,
            revenue: 0.46,
        });
        ledger
    }

    /// Prepends a record and evicts past the cap (newest-first invariant).
    pub fn record(&mut self, trade: TradeRecord) {
        self.records.insert(0, trade);
        self.records.truncate(LEDGER_CAP);
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Date-range selector for the trade-history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    SevenDays,
    ThirtyDays,
    All,
    Custom,
}

impl HistoryRange {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "7d" => Some(Self::SevenDays),
            "30d" => Some(Self::ThirtyDays),
            "all" => Some(Self::All),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Read-only filter over the ledger. Applying it never reorders or mutates
/// the underlying records; all bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryFilter {
    pub range: HistoryRange,
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            range: HistoryRange::SevenDays,
            start: None,
            end: None,
            amount_min: None,
            amount_max: None,
            price_min: None,
            price_max: None,
        }
    }
}

/// Parses a `YYYY-MM-DD` field; malformed input reads as "not provided"
/// (the range filter is then silently skipped, never an error).
pub fn parse_filter_date(value: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).ok()
}

impl HistoryFilter {
    pub fn apply(&self, records: &[TradeRecord], now_ms: u64) -> Vec<TradeRecord> {
        let window = self.window(now_ms);

        records
            .iter()
            .filter(|trade| {
                window.is_none_or(|(start, end)| trade.ts_ms >= start && trade.ts_ms <= end)
            })
            .filter(|trade| self.amount_min.is_none_or(|min| trade.amount_kwh >= min))
            .filter(|trade| self.amount_max.is_none_or(|max| trade.amount_kwh <= max))
            .filter(|trade| self.price_min.is_none_or(|min| trade.price >= min))
            .filter(|trade| self.price_max.is_none_or(|max| trade.price <= max))
            .copied()
            .collect()
    }

    fn window(&self, now_ms: u64) -> Option<(u64, u64)> {
        match self.range {
            HistoryRange::SevenDays => Some((now_ms.saturating_sub(7 * DAY_MS), now_ms)),
            HistoryRange::ThirtyDays => Some((now_ms.saturating_sub(30 * DAY_MS), now_ms)),
            HistoryRange::All => None,
            HistoryRange::Custom => {
                let (start, end) = (self.start?, self.end?);
                let (start, end) = if start <= end { (start, end) } else { (end, start) };
                // end bound is inclusive through the end of that day
                Some((date_start_ms(start), date_start_ms(end) + DAY_MS - 1))
            }
        }
    }
}

pub(crate) fn date_start_ms(date: Date) -> u64 {
    let ts = date.midnight().assume_utc().unix_timestamp();
    ts.max(0) as u64 * 1_000
}
