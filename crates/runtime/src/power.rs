/// Display-only time series of recent power draw samples.
pub const POWER_HISTORY_CAP: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PowerSample {
    pub ts_ms: u64,
    pub power_kw: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PowerHistory {
    samples: Vec<PowerSample>,
}

impl PowerHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, ts_ms: u64, power_kw: f64) {
        if self.samples.len() == POWER_HISTORY_CAP {
            self.samples.remove(0);
        }
        self.samples.push(PowerSample { ts_ms, power_kw });
    }

    pub fn samples(&self) -> &[PowerSample] {
        &self.samples
    }

    pub fn latest(&self) -> Option<PowerSample> {
        self.samples.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{PowerHistory, POWER_HISTORY_CAP};

    #[test]
    fn history_keeps_only_the_most_recent_samples() {
        let mut history = PowerHistory::new();

        for i in 0..POWER_HISTORY_CAP as u64 + 10 {
            history.append(i, 2.0);
        }

        assert_eq!(history.samples().len(), POWER_HISTORY_CAP);
        assert_eq!(history.samples()[0].ts_ms, 10);
        assert_eq!(history.latest().unwrap().ts_ms, POWER_HISTORY_CAP as u64 + 9);
    }

    #[test]
    fn samples_preserve_append_order() {
        let mut history = PowerHistory::new();

        history.append(1, 0.1);
        history.append(2, 2.0);

        assert_eq!(history.samples()[0].ts_ms, 1);
        assert_eq!(history.samples()[1].power_kw, 2.0);
    }
}
