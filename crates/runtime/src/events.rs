use trading::{SellTrigger, TradeRecord};

/// Everything the engine can tell the outside world, streamed to clients
/// as tagged JSON over the events WebSocket.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    Connected,
    PriceTicked {
        price: f64,
        delta: f64,
    },
    PriceRefreshed {
        price: f64,
        delta: f64,
    },
    AutoStarted {
        next_level: Option<f64>,
    },
    AutoStopped,
    GridReset,
    DischargeStarted {
        amount_kwh: f64,
        price: f64,
        trigger: &'static str,
    },
    DischargeProgressed {
        progress: f64,
        discharged_kwh: f64,
        revenue: f64,
    },
    DischargeCompleted {
        amount_kwh: f64,
        revenue: f64,
    },
    DischargeCancelled {
        discharged_kwh: f64,
        revenue: f64,
    },
    TradeRecorded {
        ts_ms: u64,
        amount_kwh: f64,
        price: f64,
        revenue: f64,
    },
    PowerSampled {
        ts_ms: u64,
        power_kw: f64,
    },
}

impl RuntimeEvent {
    pub fn connected() -> Self {
        Self::Connected
    }

    pub fn price_ticked(price: f64, delta: f64) -> Self {
        Self::PriceTicked { price, delta }
    }

    pub fn price_refreshed(price: f64, delta: f64) -> Self {
        Self::PriceRefreshed { price, delta }
    }

    pub fn discharge_started(amount_kwh: f64, price: f64, trigger: SellTrigger) -> Self {
        Self::DischargeStarted {
            amount_kwh,
            price,
            trigger: trigger_str(trigger),
        }
    }

    pub fn trade_recorded(record: &TradeRecord) -> Self {
        Self::TradeRecorded {
            ts_ms: record.ts_ms,
            amount_kwh: record.amount_kwh,
            price: record.price,
            revenue: record.revenue,
        }
    }
}

fn trigger_str(trigger: SellTrigger) -> &'static str {
    match trigger {
        SellTrigger::Manual => "manual",
        SellTrigger::GridLevel => "grid_level",
    }
}

#[cfg(test)]
mod tests {
    use trading::SellTrigger;

    use super::RuntimeEvent;

    #[test]
    fn events_serialize_with_snake_case_tags() {
        let event = RuntimeEvent::price_ticked(0.252, 0.004);

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event_type"], "price_ticked");
        assert_eq!(json["price"], 0.252);
        assert_eq!(json["delta"], 0.004);
    }

    #[test]
    fn discharge_started_names_its_trigger() {
        let manual = RuntimeEvent::discharge_started(2.0, 0.25, SellTrigger::Manual);
        let auto = RuntimeEvent::discharge_started(0.5, 0.25, SellTrigger::GridLevel);

        let manual = serde_json::to_value(&manual).unwrap();
        let auto = serde_json::to_value(&auto).unwrap();

        assert_eq!(manual["trigger"], "manual");
        assert_eq!(auto["trigger"], "grid_level");
    }
}
