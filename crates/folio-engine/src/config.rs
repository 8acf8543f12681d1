//! # Engine Configuration
//!
//! The business-rule thresholds, treated as configuration rather than
//! hard-coded fact.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FOLIO_MAX_DISTINCT_CART_ITEMS=3                                    │
//! │     FOLIO_CART_RISK_LIMIT_TOTAL=500000                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/folio/folio.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.folio.folio/folio.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! Monetary limits are in cents.
//! ```toml
//! # folio.toml
//! [limits]
//! max_distinct_cart_items = 4
//! max_quantity_per_line_item = 5
//! max_total_items_in_cart = 10
//! cart_risk_limit_total = 600000         # $6,000.00
//! min_order_amount = 500                 # $5.00
//! high_value_review_threshold = 300000   # $3,000.00
//! daily_user_spend_cap = 1000000         # $10,000.00
//! duplicate_order_window_secs = 5
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;
use folio_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Rule Limits
// =============================================================================

/// Thresholds consulted by the cart and order rule chains.
///
/// ## Comparison Semantics
/// ```text
/// cart_risk_limit_total         rejects when cart value  >= limit
/// high_value_review_threshold   reviews when order total >= threshold
/// everything else               rejects only when strictly exceeded
///                               (min_order_amount: when total < minimum)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleLimits {
    /// Distinct product lines per cart.
    #[serde(default = "default_max_distinct")]
    pub max_distinct_cart_items: usize,

    /// Units on a single cart line.
    #[serde(default = "default_max_line_quantity")]
    pub max_quantity_per_line_item: i64,

    /// Units across the whole cart.
    #[serde(default = "default_max_total_items")]
    pub max_total_items_in_cart: i64,

    /// Monetary ceiling on cart contents.
    #[serde(default = "default_risk_limit")]
    pub cart_risk_limit_total: Money,

    /// Smallest order total accepted.
    #[serde(default = "default_min_order")]
    pub min_order_amount: Money,

    /// Orders at or above this total are held for review.
    #[serde(default = "default_review_threshold")]
    pub high_value_review_threshold: Money,

    /// Per-user spend per UTC calendar day.
    #[serde(default = "default_daily_cap")]
    pub daily_user_spend_cap: Money,

    /// Seconds after an order during which another is refused.
    #[serde(default = "default_duplicate_window")]
    pub duplicate_order_window_secs: i64,
}

fn default_max_distinct() -> usize {
    4
}
fn default_max_line_quantity() -> i64 {
    5
}
fn default_max_total_items() -> i64 {
    10
}
fn default_risk_limit() -> Money {
    Money::from_major_minor(6000, 0)
}
fn default_min_order() -> Money {
    Money::from_major_minor(5, 0)
}
fn default_review_threshold() -> Money {
    Money::from_major_minor(3000, 0)
}
fn default_daily_cap() -> Money {
    Money::from_major_minor(10_000, 0)
}
fn default_duplicate_window() -> i64 {
    5
}

impl Default for RuleLimits {
    fn default() -> Self {
        RuleLimits {
            max_distinct_cart_items: default_max_distinct(),
            max_quantity_per_line_item: default_max_line_quantity(),
            max_total_items_in_cart: default_max_total_items(),
            cart_risk_limit_total: default_risk_limit(),
            min_order_amount: default_min_order(),
            high_value_review_threshold: default_review_threshold(),
            daily_user_spend_cap: default_daily_cap(),
            duplicate_order_window_secs: default_duplicate_window(),
        }
    }
}

impl RuleLimits {
    /// The duplicate-order window as a duration.
    pub fn duplicate_order_window(&self) -> Duration {
        Duration::seconds(self.duplicate_order_window_secs)
    }

    /// Validates the limits.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_distinct_cart_items == 0 {
            return Err(ConfigError::InvalidConfig(
                "max_distinct_cart_items must be greater than 0".into(),
            ));
        }
        if self.max_quantity_per_line_item <= 0 || self.max_total_items_in_cart <= 0 {
            return Err(ConfigError::InvalidConfig(
                "item quantity limits must be greater than 0".into(),
            ));
        }

        for (name, value) in [
            ("cart_risk_limit_total", self.cart_risk_limit_total),
            ("high_value_review_threshold", self.high_value_review_threshold),
            ("daily_user_spend_cap", self.daily_user_spend_cap),
        ] {
            if !value.is_positive() {
                return Err(ConfigError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.min_order_amount.cents() < 0 {
            return Err(ConfigError::InvalidConfig(
                "min_order_amount must not be negative".into(),
            ));
        }
        if self.duplicate_order_window_secs < 0 {
            return Err(ConfigError::InvalidConfig(
                "duplicate_order_window_secs must not be negative".into(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Engine Config
// =============================================================================

/// Top-level engine configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub limits: RuleLimits,
}

impl EngineConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (folio.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](EngineConfig::load) with overrides read from `lookup`
    /// instead of the process environment.
    fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.limits.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Applies `FOLIO_*` overrides from any key/value source. Unparseable
    /// values are logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let limits = &mut self.limits;

        override_from(&lookup, "FOLIO_MAX_DISTINCT_CART_ITEMS", &mut limits.max_distinct_cart_items);
        override_from(&lookup, "FOLIO_MAX_QUANTITY_PER_LINE_ITEM", &mut limits.max_quantity_per_line_item);
        override_from(&lookup, "FOLIO_MAX_TOTAL_ITEMS_IN_CART", &mut limits.max_total_items_in_cart);
        override_from(&lookup, "FOLIO_DUPLICATE_ORDER_WINDOW_SECS", &mut limits.duplicate_order_window_secs);

        for (key, target) in [
            ("FOLIO_CART_RISK_LIMIT_TOTAL", &mut limits.cart_risk_limit_total),
            ("FOLIO_MIN_ORDER_AMOUNT", &mut limits.min_order_amount),
            ("FOLIO_HIGH_VALUE_REVIEW_THRESHOLD", &mut limits.high_value_review_threshold),
            ("FOLIO_DAILY_USER_SPEND_CAP", &mut limits.daily_user_spend_cap),
        ] {
            let mut cents = target.cents();
            override_from(&lookup, key, &mut cents);
            *target = Money::from_cents(cents);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "folio", "folio")
            .map(|dirs| dirs.config_dir().join("folio.toml"))
    }
}

fn override_from<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T)
where
    T: FromStr + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => {
            debug!(key, ?value, "Overriding rule limit from environment");
            *target = value;
        }
        Err(_) => warn!(key, value = %raw, "Ignoring unparseable rule limit in environment"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
