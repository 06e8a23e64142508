use std::{collections::HashSet, env, time::Duration};

use url::Url;

use crate::error::ConfigError;
use crate::helpers::parse_or_default;

pub const DEFAULT_FEED_URL: &str = "wss://ws.binaryws.com/websockets/v3?app_id=1089";
pub const DEFAULT_SYMBOLS: &str = "R_10,R_25,R_50,R_75,R_100";
pub const DEFAULT_WINDOW_SIZE: usize = 50;
pub const DEFAULT_VALIDITY_TICKS: u32 = 7;
pub const DEFAULT_REFRESH_MS: u64 = 1000;
pub const DEFAULT_RECONNECT_MIN_MS: u64 = 1000;
pub const DEFAULT_RECONNECT_MAX_MS: u64 = 30_000;
pub const DEFAULT_STALE_AFTER_MS: u64 = 10_000;

/// Runtime settings shared by the tick listener and the dashboard.
#[derive(Debug, Clone)]
pub struct Settings {
    pub feed_url: Url,
    /// Tracked instruments, in the order they are offered in the selector.
    pub symbols: Vec<String>,
    pub window_size: usize,
    pub validity_ticks: u32,
    pub refresh_interval: Duration,
    pub selected_symbol: String,
    pub reconnect_min: Duration,
    pub reconnect_max: Duration,
    /// A connection that delivers no frame for this long is dropped and retried.
    pub stale_after: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_url = Url::parse(DEFAULT_FEED_URL)
            .map_err(|error| ConfigError::Invalid(format!("default feed url: {}", error)))?;
        let feed_url: Url = parse_or_default("FEED_URL", lookup("FEED_URL"), default_url)?;

        let symbols: String =
            parse_or_default("SYMBOLS", lookup("SYMBOLS"), DEFAULT_SYMBOLS.to_string())?;
        let symbols = parse_symbols(&symbols)?;

        let window_size: usize =
            parse_or_default("WINDOW_SIZE", lookup("WINDOW_SIZE"), DEFAULT_WINDOW_SIZE)?;
        if window_size == 0 {
            return Err(ConfigError::Invalid(
                "WINDOW_SIZE must be greater than zero".to_string(),
            ));
        }

        let validity_ticks: u32 = parse_or_default(
            "VALIDITY_TICKS",
            lookup("VALIDITY_TICKS"),
            DEFAULT_VALIDITY_TICKS,
        )?;

        let refresh_ms: u64 =
            parse_or_default("REFRESH_MS", lookup("REFRESH_MS"), DEFAULT_REFRESH_MS)?;
        if refresh_ms == 0 {
            return Err(ConfigError::Invalid(
                "REFRESH_MS must be greater than zero".to_string(),
            ));
        }

        let reconnect_min_ms: u64 = parse_or_default(
            "RECONNECT_MIN_MS",
            lookup("RECONNECT_MIN_MS"),
            DEFAULT_RECONNECT_MIN_MS,
        )?;
        let reconnect_max_ms: u64 = parse_or_default(
            "RECONNECT_MAX_MS",
            lookup("RECONNECT_MAX_MS"),
            DEFAULT_RECONNECT_MAX_MS,
        )?;
        if reconnect_min_ms > reconnect_max_ms {
            return Err(ConfigError::Invalid(format!(
                "RECONNECT_MIN_MS ({}) is greater than RECONNECT_MAX_MS ({})",
                reconnect_min_ms, reconnect_max_ms
            )));
        }

        let stale_after_ms: u64 = parse_or_default(
            "STALE_AFTER_MS",
            lookup("STALE_AFTER_MS"),
            DEFAULT_STALE_AFTER_MS,
        )?;
        if stale_after_ms == 0 {
            return Err(ConfigError::Invalid(
                "STALE_AFTER_MS must be greater than zero".to_string(),
            ));
        }

        let selected_symbol = match lookup("SELECTED_SYMBOL") {
            Some(value) => {
                let value = value.trim().to_string();
                if !symbols.contains(&value) {
                    return Err(ConfigError::InvalidValue {
                        var: "SELECTED_SYMBOL",
                        value,
                        reason: format!("not one of the tracked symbols {:?}", symbols),
                    });
                }
                value
            }
            // parse_symbols never returns an empty list
            None => symbols[0].clone(),
        };

        Ok(Self {
            feed_url,
            symbols,
            window_size,
            validity_ticks,
            refresh_interval: Duration::from_millis(refresh_ms),
            selected_symbol,
            reconnect_min: Duration::from_millis(reconnect_min_ms),
            reconnect_max: Duration::from_millis(reconnect_max_ms),
            stale_after: Duration::from_millis(stale_after_ms),
        })
    }
}

fn parse_symbols(raw: &str) -> Result<Vec<String>, ConfigError> {
    let symbols: Vec<String> = raw
        .split(',')
        .map(|symbol| symbol.trim().to_string())
        .filter(|symbol| !symbol.is_empty())
        .collect();

    if symbols.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "SYMBOLS",
            value: raw.to_string(),
            reason: "no symbols listed".to_string(),
        });
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = symbols.iter().find(|symbol| !seen.insert(symbol.as_str())) {
        return Err(ConfigError::InvalidValue {
            var: "SYMBOLS",
            value: raw.to_string(),
            reason: format!("symbol {} is listed twice", duplicate),
        });
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_the_tracked_volatility_indices() {
        let settings = settings_from(&[]).unwrap();

        assert_eq!(settings.feed_url.as_str(), DEFAULT_FEED_URL);
        assert_eq!(
            settings.symbols,
            vec!["R_10", "R_25", "R_50", "R_75", "R_100"]
        );
        assert_eq!(settings.window_size, 50);
        assert_eq!(settings.validity_ticks, 7);
        assert_eq!(settings.refresh_interval, Duration::from_secs(1));
        assert_eq!(settings.selected_symbol, "R_10");
        assert_eq!(settings.reconnect_min, Duration::from_secs(1));
        assert_eq!(settings.reconnect_max, Duration::from_secs(30));
        assert_eq!(settings.stale_after, Duration::from_secs(10));
    }

    #[test]
    fn overrides_are_applied() {
        let settings = settings_from(&[
            ("SYMBOLS", " R_50 , R_100 "),
            ("WINDOW_SIZE", "20"),
            ("SELECTED_SYMBOL", "R_100"),
            ("REFRESH_MS", "250"),
        ])
        .unwrap();

        assert_eq!(settings.symbols, vec!["R_50", "R_100"]);
        assert_eq!(settings.window_size, 20);
        assert_eq!(settings.selected_symbol, "R_100");
        assert_eq!(settings.refresh_interval, Duration::from_millis(250));
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            settings_from(&[("WINDOW_SIZE", "0")]),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn zero_stale_limit_is_rejected() {
        assert!(matches!(
            settings_from(&[("STALE_AFTER_MS", "0")]),
            Err(ConfigError::Invalid(_))
        ));
        let settings = settings_from(&[("STALE_AFTER_MS", "2500")]).unwrap();
        assert_eq!(settings.stale_after, Duration::from_millis(2500));
    }

    #[test]
    fn unknown_selected_symbol_is_rejected() {
        assert!(matches!(
            settings_from(&[("SELECTED_SYMBOL", "R_5")]),
            Err(ConfigError::InvalidValue {
                var: "SELECTED_SYMBOL",
                ..
            })
        ));
    }

    #[test]
    fn empty_and_duplicate_symbol_lists_are_rejected() {
        assert!(settings_from(&[("SYMBOLS", " , ,")]).is_err());
        assert!(settings_from(&[("SYMBOLS", "R_10,R_25,R_10")]).is_err());
    }

    #[test]
    fn inverted_reconnect_bounds_are_rejected() {
        assert!(settings_from(&[("RECONNECT_MIN_MS", "5000"), ("RECONNECT_MAX_MS", "100")]).is_err());
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert!(matches!(
            settings_from(&[("FEED_URL", "not a url")]),
            Err(ConfigError::InvalidValue { var: "FEED_URL", .. })
        ));
    }
}
