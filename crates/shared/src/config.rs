//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Payout policy configuration.
    #[serde(default)]
    pub payout: PayoutConfig,
}

/// Payout policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayoutConfig {
    /// Minimum age, in days, a ledger credit must reach before it is
    /// payout-eligible (lets dispute windows close).
    #[serde(default = "default_settlement_delay_days")]
    pub settlement_delay_days: i64,
    /// Minimum payout amount; eligible credits below this stay accrued.
    #[serde(default = "default_minimum_amount")]
    pub minimum_amount: Decimal,
}

fn default_settlement_delay_days() -> i64 {
    7
}

fn default_minimum_amount() -> Decimal {
    Decimal::new(2500, 2) // 25.00
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self {
            settlement_delay_days: default_settlement_delay_days(),
            minimum_amount: default_minimum_amount(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("RENTORA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
