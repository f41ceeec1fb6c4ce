//! # Configuration
//!
//! Layered with `figment`, later sources overriding earlier ones:
//!
//! 1. Compiled defaults ([`PickupConfig::default`])
//! 2. `./pickup.toml`
//! 3. The file named by `PICKUP_CONFIG`, if set
//! 4. `PICKUP_*` environment variables, `__` separating section and key
//!    (`PICKUP_ORDERS__EXPIRY_MINUTES=20`)
//!
//! [`PickupConfig::validate`] runs after extraction; nothing is seeded from an invalid config.

use bigdecimal::{BigDecimal, Zero};
use chrono::{FixedOffset, NaiveTime};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the environment variable holding an explicit config path.
pub const CONFIG_PATH_VAR: &str = "PICKUP_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError::Load(Box::new(e))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickupConfig {
    pub orders: OrdersConfig,
    pub flow: FlowConfig,
    pub catalog: CatalogConfig,
}

/// Order lifecycle timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrdersConfig {
    /// Minutes a `Created` order waits for a claim before the sweeper cancels it.
    pub expiry_minutes: u32,
    pub sweep_interval_secs: u64,
    /// How long before its target time an accepted order triggers a staff reminder.
    pub reminder_lead_minutes: u32,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            expiry_minutes: 15,
            sweep_interval_secs: 60,
            reminder_lead_minutes: 5,
        }
    }
}

impl OrdersConfig {
    pub fn expiry(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.expiry_minutes))
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn reminder_lead(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.reminder_lead_minutes))
    }
}

/// Conversation flow settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlowConfig {
    /// Offset of the stores' local time from UTC. Custom `HH:MM` pickup times are read in it.
    pub utc_offset_hours: i32,
    pub asap_minutes: u32,
    /// Quick pickup offsets offered next to ASAP, in minutes.
    pub fixed_offsets: Vec<u32>,
    /// Simulated payment processing time.
    pub payment_delay_ms: u64,
    /// Sessions untouched for longer than this are discarded.
    pub session_idle_minutes: u32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 3,
            asap_minutes: 15,
            fixed_offsets: vec![30, 45, 60],
            payment_delay_ms: 1000,
            session_idle_minutes: 120,
        }
    }
}

impl FlowConfig {
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ConfigError::Invalid(format!("utc offset {}h out of range", self.utc_offset_hours))
            })
    }

    pub fn payment_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.payment_delay_ms)
    }

    pub fn session_idle(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.session_idle_minutes))
    }
}

/// Catalog seeded into the store, menu and staff tables at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    pub stores: Vec<StoreSeed>,
    pub staff: Vec<StaffSeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSeed {
    /// Unique; staff seeds refer to the store by it.
    pub name: String,
    pub address: String,
    /// `HH:MM`
    pub opens: String,
    /// `HH:MM`
    pub closes: String,
    #[serde(default)]
    pub menu: Vec<MenuSeed>,
}

impl StoreSeed {
    pub fn hours(&self) -> Result<(NaiveTime, NaiveTime), ConfigError> {
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| {
                ConfigError::Invalid(format!("store {:?}: bad time {s:?}: {e}", self.name))
            })
        };
        Ok((parse(&self.opens)?, parse(&self.closes)?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuSeed {
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaffSeed {
    pub chat_id: i64,
    /// Name of the store the member works at.
    pub store: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "barista".to_string()
}

impl PickupConfig {
    /// Rejects settings the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.orders.expiry_minutes == 0 {
            return invalid("orders.expiry_minutes must be positive".into());
        }
        if self.orders.sweep_interval_secs == 0 {
            return invalid("orders.sweep_interval_secs must be positive".into());
        }
        if self.flow.asap_minutes == 0 {
            return invalid("flow.asap_minutes must be positive".into());
        }
        if self.flow.fixed_offsets.contains(&0) {
            return invalid("flow.fixed_offsets must be positive".into());
        }
        if self.flow.session_idle_minutes == 0 {
            return invalid("flow.session_idle_minutes must be positive".into());
        }
        self.flow.utc_offset()?;

        let mut names = HashSet::new();
        for store in &self.catalog.stores {
            if !names.insert(store.name.as_str()) {
                return invalid(format!("duplicate store {:?}", store.name));
            }
            store.hours()?;
            if let Some(item) = store.menu.iter().find(|i| i.price < BigDecimal::zero()) {
                return invalid(format!(
                    "store {:?}: negative price for {:?}",
                    store.name, item.name
                ));
            }
        }

        let mut chats = HashSet::new();
        for member in &self.catalog.staff {
            if !names.contains(member.store.as_str()) {
                return invalid(format!(
                    "staff {} references unknown store {:?}",
                    member.chat_id, member.store
                ));
            }
            if !chats.insert(member.chat_id) {
                return invalid(format!("duplicate staff chat {}", member.chat_id));
            }
        }
        Ok(())
    }
}

/// Loads the layered configuration and validates it.
pub fn load_config() -> Result<PickupConfig, ConfigError> {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(PickupConfig::default()))
        .merge(Toml::file("pickup.toml"));
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        figment = figment.merge(Toml::file(path));
    }
    extract(figment.merge(env_provider()))
}

/// Loads defaults overridden by a TOML string only. Used by tests.
pub fn load_config_from_str(toml: &str) -> Result<PickupConfig, ConfigError> {
    extract(
        Figment::new()
            .merge(Serialized::defaults(PickupConfig::default()))
            .merge(Toml::string(toml)),
    )
}

fn extract(figment: Figment) -> Result<PickupConfig, ConfigError> {
    let config: PickupConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

fn env_provider() -> Env {
    Env::prefixed("PICKUP_").ignore(&["config"]).split("__")
}
