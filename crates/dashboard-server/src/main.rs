mod config;
mod wiring;

use std::error::Error;

use runtime::{now_ms, spawn_tickers, EngineHandle, EventJournal, JsonLinesJournal, TradingEngine};
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = config::Config::from_env()?;

    let seed = config.seed.unwrap_or_else(now_ms);
    let mut engine = TradingEngine::new(seed, now_ms());
    engine.set_discharge_power_kw(config.discharge_power_kw);
    let handle = EngineHandle::new(engine);

    let _tickers = spawn_tickers(handle.clone(), config.price_tick_ms);
    let _journal = spawn_journal(&handle);

    let listener = TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, wiring::build_app(handle)).await?;
    Ok(())
}

/// Mirrors every runtime event to stdout as JSON lines.
fn spawn_journal(handle: &EngineHandle) -> tokio::task::JoinHandle<()> {
    let mut events = handle.subscribe();
    tokio::spawn(async move {
        let mut journal = JsonLinesJournal::new(std::io::stdout());
        loop {
            match events.recv().await {
                Ok(event) => journal.append(&event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return,
            }
        }
    })
}
