//! Application configuration management.

use std::collections::HashMap;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger posting configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    8
}

/// Ledger configuration: posting gateway, posting policy and seed chart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// How other services reach the posting engine.
    #[serde(default)]
    pub posting: PostingConfig,
    /// Operation type (e.g. `fee`) to GL role bindings. Empty means the standard policy.
    #[serde(default)]
    pub policy: HashMap<String, PolicyRuleConfig>,
    /// Accounts created by the seeder. Empty means the standard chart.
    #[serde(default)]
    pub chart: Vec<ChartAccountConfig>,
}

/// Where policy postings are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    /// In-process call into the policy mapper.
    #[default]
    Local,
    /// HTTP call to a remote ledger service.
    Remote,
}

/// Posting gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// When false, posting requests are acknowledged without touching the ledger.
    #[serde(default = "default_posting_enabled")]
    pub enabled: bool,
    /// Local or remote posting.
    #[serde(default)]
    pub mode: GatewayMode,
    /// Base URL of the remote ledger service (remote mode only).
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Timeout for a remote posting call, in milliseconds.
    #[serde(default = "default_posting_timeout")]
    pub timeout_ms: u64,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            enabled: default_posting_enabled(),
            mode: GatewayMode::default(),
            remote_url: None,
            timeout_ms: default_posting_timeout(),
        }
    }
}

fn default_posting_enabled() -> bool {
    true
}

fn default_posting_timeout() -> u64 {
    10_000
}

/// Raw posting rule for one operation type.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyRuleConfig {
    /// Which side the source account lands on: `debit` or `credit`.
    pub source_side: String,
    /// Role binding for the source account reference.
    pub source: PolicyRoleConfig,
    /// Role binding for the destination account reference.
    pub destination: PolicyRoleConfig,
}

/// Raw role binding: a shared GL account plus per-reference overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyRoleConfig {
    /// Human-readable role label (e.g. `customer_deposits`).
    #[serde(default)]
    pub role: Option<String>,
    /// GL code used when no override matches or no reference is given.
    pub account: String,
    /// External account reference to GL code overrides.
    #[serde(default)]
    pub accounts: HashMap<String, String>,
}

/// A ledger account to seed.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartAccountConfig {
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account class: asset, liability, equity, income, expense.
    #[serde(rename = "type")]
    pub account_type: String,
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
            .add_source(config::Environment::with_prefix("GL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
