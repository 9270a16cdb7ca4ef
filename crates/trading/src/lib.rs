pub mod earnings;
pub mod ledger;
pub mod machine;
pub mod order;
pub mod storage;

pub use earnings::{add_to_last, generate_buckets, seed_week, EarningsBucket, EarningsRange};
pub use ledger::{parse_filter_date, HistoryFilter, HistoryRange, TradeLedger, TradeRecord, LEDGER_CAP};
pub use machine::{DischargeMachine, DischargeSnapshot, Phase, SellTrigger, TickOutcome};
pub use order::{DischargeOrder, SellError, COMPLETED_HOLD_MS, DEMO_ACCELERATION};
pub use storage::{StorageLevel, DEFAULT_MAX_STORAGE_KWH, DEFAULT_STORAGE_KWH};

pub fn module_ready() -> bool {
    true
}
