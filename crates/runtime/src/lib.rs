pub mod engine;
pub mod events;
pub mod journal;
pub mod power;
pub mod scheduler;

pub use engine::{
    ControlError, EngineSnapshot, OrderSnapshot, TradingEngine, DEFAULT_DISCHARGE_POWER_KW,
    START_PRICE,
};
pub use events::RuntimeEvent;
pub use journal::{EventJournal, InMemoryJournal, JsonLinesJournal};
pub use power::{PowerHistory, PowerSample, POWER_HISTORY_CAP};
pub use scheduler::{
    now_ms, spawn_tickers, EngineHandle, TickerGuard, DISCHARGE_TICK_MS, IDLE_POWER_TICK_MS,
    PRICE_TICK_MS,
};

pub fn module_ready() -> bool {
    grid_sim::module_ready() && trading::module_ready()
}
