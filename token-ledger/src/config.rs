//! Configuration for the token ledger

use crate::types::{parse_address, Address, Amount, DeployParams};
use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Deployment parameters
    pub token: TokenConfig,

    /// Submission channel configuration
    #[serde(default)]
    pub submission: SubmissionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "token-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            token: TokenConfig::default(),
            submission: SubmissionConfig::default(),
        }
    }
}

/// Token deployment parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token name
    pub name: String,

    /// Token symbol
    pub symbol: String,

    /// Decimal places
    pub decimals: u8,

    /// Initial supply in whole tokens
    pub initial_supply: u64,

    /// Supply cap in whole tokens
    pub max_supply: u64,

    /// Owner address (hex); the deploying signer when absent
    pub owner: Option<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "My First Token".to_string(),
            symbol: "MFT".to_string(),
            decimals: 18,
            initial_supply: 1_000,
            max_supply: 10_000,
            owner: None,
        }
    }
}

impl TokenConfig {
    /// Build deployment parameters, using `fallback_owner` when no owner is configured
    pub fn deploy_params(&self, fallback_owner: Address) -> crate::Result<DeployParams> {
        let owner = match &self.owner {
            Some(text) => parse_address(text)?,
            None => fallback_owner,
        };

        Ok(DeployParams {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            initial_supply: Amount::from(self.initial_supply),
            max_supply: Amount::from(self.max_supply),
            owner,
        })
    }
}

/// Submission channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Bounded mailbox size (backpressure)
    pub mailbox_capacity: usize,

    /// Committed events buffered per observer
    pub event_capacity: usize,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: 1000,
            event_capacity: 1000,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(name) = std::env::var("TOKEN_NAME") {
            config.token.name = name;
        }

        if let Ok(symbol) = std::env::var("TOKEN_SYMBOL") {
            config.token.symbol = symbol;
        }

        if let Ok(decimals) = std::env::var("TOKEN_DECIMALS") {
            config.token.decimals = parse_env("TOKEN_DECIMALS", &decimals)?;
        }

        if let Ok(supply) = std::env::var("TOKEN_INITIAL_SUPPLY") {
            config.token.initial_supply = parse_env("TOKEN_INITIAL_SUPPLY", &supply)?;
        }

        if let Ok(supply) = std::env::var("TOKEN_MAX_SUPPLY") {
            config.token.max_supply = parse_env("TOKEN_MAX_SUPPLY", &supply)?;
        }

        if let Ok(owner) = std::env::var("TOKEN_OWNER") {
            config.token.owner = Some(owner);
        }

        if let Ok(capacity) = std::env::var("TOKEN_MAILBOX_CAPACITY") {
            config.submission.mailbox_capacity = parse_env("TOKEN_MAILBOX_CAPACITY", &capacity)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the ledger or actor cannot start with
    pub fn validate(&self) -> crate::Result<()> {
        if self.token.initial_supply > self.token.max_supply {
            return Err(crate::Error::Config(format!(
                "initial_supply {} exceeds max_supply {}",
                self.token.initial_supply, self.token.max_supply
            )));
        }
        if self.submission.mailbox_capacity == 0 || self.submission.event_capacity == 0 {
            return Err(crate::Error::Config(
                "channel capacities must be positive".to_string(),
            ));
        }
        if let Some(owner) = &self.token.owner {
            parse_address(owner)
                .map_err(|e| crate::Error::Config(format!("token.owner: {}", e)))?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> crate::Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| crate::Error::Config(format!("{}='{}': {}", key, value, e)))
}
