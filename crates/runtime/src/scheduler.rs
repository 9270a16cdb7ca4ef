use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::engine::TradingEngine;
use crate::events::RuntimeEvent;

/// Grid price updates while auto trading runs.
pub const PRICE_TICK_MS: u64 = 1_200;
/// Animation rate of the active discharge.
pub const DISCHARGE_TICK_MS: u64 = 100;
/// Idle power sampling rate.
pub const IDLE_POWER_TICK_MS: u64 = 1_000;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared handle to the engine plus the event fanout channel.
///
/// All mutation goes through [`EngineHandle::with_engine`], which holds the
/// lock for the duration of one closure; tick callbacks and HTTP handlers
/// therefore serialize against each other.
#[derive(Clone)]
pub struct EngineHandle {
    engine: Arc<Mutex<TradingEngine>>,
    events: broadcast::Sender<RuntimeEvent>,
}

impl EngineHandle {
    pub fn new(engine: TradingEngine) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            events,
        }
    }

    pub fn with_engine<R>(&self, f: impl FnOnce(&mut TradingEngine) -> R) -> R {
        let mut guard = self
            .engine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Fans events out to subscribers. Lagging or absent receivers are not
    /// an error.
    pub fn publish(&self, events: Vec<RuntimeEvent>) {
        for event in events {
            let _ = self.events.send(event);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events.subscribe()
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Aborts its task on drop so shutdown is deterministic.
#[derive(Debug)]
pub struct TickerGuard {
    handle: JoinHandle<()>,
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns the periodic drivers: price ticks, discharge animation, and idle
/// power sampling. One task owns all three intervals; ticks never overlap.
pub fn spawn_tickers(handle: EngineHandle, price_tick_ms: u64) -> TickerGuard {
    let task = tokio::spawn(async move {
        let mut price = tokio::time::interval(Duration::from_millis(price_tick_ms.max(1)));
        let mut discharge = tokio::time::interval(Duration::from_millis(DISCHARGE_TICK_MS));
        let mut idle_power = tokio::time::interval(Duration::from_millis(IDLE_POWER_TICK_MS));

        loop {
            let events = tokio::select! {
                _ = price.tick() => handle.with_engine(|engine| engine.price_tick(now_ms())),
                _ = discharge.tick() => {
                    handle.with_engine(|engine| engine.discharge_tick(now_ms()))
                }
                _ = idle_power.tick() => {
                    handle.with_engine(|engine| engine.idle_power_tick(now_ms()))
                }
            };
            handle.publish(events);
        }
    });

    TickerGuard { handle: task }
}
