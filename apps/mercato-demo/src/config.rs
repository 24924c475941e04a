//! # Configuration
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`MERCATO_*`)
//! 2. Defaults (this file)
//!
//! Read-only after initialization.

use serde::{Deserialize, Serialize};

/// How receipts are written to stdout.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable receipt lines.
    #[default]
    Text,
    /// One JSON document per receipt.
    Json,
}

impl OutputFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Store name (printed on receipts)
    pub store_name: String,

    /// Currency code appended to amounts
    pub currency_code: String,

    /// Number of minor-unit decimal places
    pub currency_decimals: u8,

    /// Receipt output format
    pub output: OutputFormat,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Store: "Mercato Demo Store"
    /// - Currency: EGP, 2 decimals
    /// - Output: text
    fn default() -> Self {
        AppConfig {
            store_name: "Mercato Demo Store".to_string(),
            currency_code: "EGP".to_string(),
            currency_decimals: 2,
            output: OutputFormat::Text,
        }
    }
}

impl AppConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `MERCATO_STORE_NAME`: Override store name
    /// - `MERCATO_CURRENCY`: Override currency code
    /// - `MERCATO_CURRENCY_DECIMALS`: Override decimal places (0-4)
    /// - `MERCATO_OUTPUT`: `text` or `json`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparseable values fall back
    /// to the default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(store_name) = lookup("MERCATO_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(currency) = lookup("MERCATO_CURRENCY") {
            config.currency_code = currency;
        }

        if let Some(decimals) = lookup("MERCATO_CURRENCY_DECIMALS") {
            match decimals.trim().parse::<u8>() {
                Ok(d) if d <= 4 => config.currency_decimals = d,
                _ => tracing::warn!(value = %decimals, "Ignoring invalid MERCATO_CURRENCY_DECIMALS"),
            }
        }

        if let Some(output) = lookup("MERCATO_OUTPUT") {
            match OutputFormat::parse(&output) {
                Some(format) => config.output = format,
                None => tracing::warn!(value = %output, "Ignoring invalid MERCATO_OUTPUT"),
            }
        }

        config
    }

    /// Formats a minor-unit amount with the currency code.
    ///
    /// ## Example
    /// ```rust
    /// use mercato_demo::config::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(18_800), "188.00 EGP");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{} {}",
            if cents < 0 { "-" } else { "" },
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            },
            self.currency_code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_format_currency_positive() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(1234), "12.34 EGP");
        assert_eq!(config.format_currency(100), "1.00 EGP");
        assert_eq!(config.format_currency(1), "0.01 EGP");
        assert_eq!(config.format_currency(0), "0.00 EGP");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(-1234), "-12.34 EGP");
    }

    #[test]
    fn test_format_currency_zero_decimals() {
        let config = AppConfig {
            currency_decimals: 0,
            currency_code: "JPY".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.format_currency(1500), "1500 JPY");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MERCATO_STORE_NAME", "Quantum Bookstore"),
            ("MERCATO_CURRENCY", "USD"),
            ("MERCATO_OUTPUT", "JSON"),
        ]));

        assert_eq!(config.store_name, "Quantum Bookstore");
        assert_eq!(config.currency_code, "USD");
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_from_lookup_ignores_invalid_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MERCATO_CURRENCY_DECIMALS", "nine"),
            ("MERCATO_OUTPUT", "yaml"),
        ]));

        assert_eq!(config.currency_decimals, 2);
        assert_eq!(config.output, OutputFormat::Text);
    }
}
