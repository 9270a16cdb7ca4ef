use std::{
    env, fmt,
    net::{AddrParseError, SocketAddr},
};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PRICE_TICK_MS: u64 = runtime::PRICE_TICK_MS;
const DEFAULT_DISCHARGE_POWER_KW: f64 = runtime::DEFAULT_DISCHARGE_POWER_KW;

const MIN_PRICE_TICK_MS: u64 = 100;
const MAX_PRICE_TICK_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub price_tick_ms: u64,
    pub discharge_power_kw: f64,
    /// Engine seed; the wall clock is used when unset.
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(AddrParseError),
    InvalidPriceTickMs,
    InvalidDischargePowerKw,
    InvalidSeed,
    NonUnicodeListenAddr,
    NonUnicodePriceTickMs,
    NonUnicodeDischargePowerKw,
    NonUnicodeSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(err) => {
                write!(f, "DASHBOARD_ADDR is not a valid socket address: {err}")
            }
            Self::InvalidPriceTickMs => {
                write!(
                    f,
                    "DASHBOARD_PRICE_TICK_MS must be an integer between {MIN_PRICE_TICK_MS} and {MAX_PRICE_TICK_MS}"
                )
            }
            Self::InvalidDischargePowerKw => {
                write!(
                    f,
                    "DASHBOARD_DISCHARGE_POWER_KW must be a finite number greater than zero"
                )
            }
            Self::InvalidSeed => {
                write!(f, "DASHBOARD_SEED must be an unsigned integer")
            }
            Self::NonUnicodeListenAddr => {
                write!(f, "DASHBOARD_ADDR contains non-unicode data")
            }
            Self::NonUnicodePriceTickMs => {
                write!(f, "DASHBOARD_PRICE_TICK_MS contains non-unicode data")
            }
            Self::NonUnicodeDischargePowerKw => {
                write!(f, "DASHBOARD_DISCHARGE_POWER_KW contains non-unicode data")
            }
            Self::NonUnicodeSeed => {
                write!(f, "DASHBOARD_SEED contains non-unicode data")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidListenAddr(err) => Some(err),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match env::var("DASHBOARD_ADDR") {
            Ok(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            Err(env::VarError::NotPresent) => DEFAULT_LISTEN_ADDR
                .parse()
                .expect("default listen address must be valid"),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeListenAddr);
            }
        };

        let price_tick_ms = match env::var("DASHBOARD_PRICE_TICK_MS") {
            Ok(value) => {
                let parsed: u64 = value.parse().map_err(|_| ConfigError::InvalidPriceTickMs)?;
                if !(MIN_PRICE_TICK_MS..=MAX_PRICE_TICK_MS).contains(&parsed) {
                    return Err(ConfigError::InvalidPriceTickMs);
                }
                parsed
            }
            Err(env::VarError::NotPresent) => DEFAULT_PRICE_TICK_MS,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodePriceTickMs);
            }
        };

        let discharge_power_kw = match env::var("DASHBOARD_DISCHARGE_POWER_KW") {
            Ok(value) => {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| ConfigError::InvalidDischargePowerKw)?;
                if !parsed.is_finite() || parsed <= 0.0 {
                    return Err(ConfigError::InvalidDischargePowerKw);
                }
                parsed
            }
            Err(env::VarError::NotPresent) => DEFAULT_DISCHARGE_POWER_KW,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeDischargePowerKw);
            }
        };

        let seed = match env::var("DASHBOARD_SEED") {
            Ok(value) => Some(value.parse().map_err(|_| ConfigError::InvalidSeed)?),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeSeed);
            }
        };

        Ok(Self {
            listen_addr,
            price_tick_ms,
            discharge_power_kw,
            seed,
        })
    }
}
