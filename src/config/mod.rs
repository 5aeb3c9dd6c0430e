use std::env;
use thiserror::Error;

use crate::database::StoreError;

/// Startup configuration errors. These are the only fatal errors in the service.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub payments: PaymentConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over user/password/cluster
    pub uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub cluster: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub token_secret: String,
    pub token_ttl_days: i64,
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub currency: String,
}

impl DatabaseConfig {
    /// Resolve the MongoDB connection string. Without `MONGODB_URI`, builds an
    /// Atlas SRV URI from `DB_USER`/`DB_PASS`, percent-encoding the credentials.
    pub fn connection_uri(&self) -> Result<String, StoreError> {
        if let Some(uri) = &self.uri {
            return Ok(uri.clone());
        }

        let user = self.user.as_deref().ok_or(StoreError::ConfigMissing("DB_USER"))?;
        let password = self.password.as_deref().ok_or(StoreError::ConfigMissing("DB_PASS"))?;

        let mut url = url::Url::parse(&format!("mongodb+srv://{}/", self.cluster))
            .map_err(|e| StoreError::InvalidUri(e.to_string()))?;
        url.set_username(user)
            .map_err(|_| StoreError::InvalidUri("cannot set username".to_string()))?;
        url.set_password(Some(password))
            .map_err(|_| StoreError::InvalidUri("cannot set password".to_string()))?;
        url.set_query(Some("retryWrites=true&w=majority"));

        Ok(url.to_string())
    }
}

impl Environment {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }

    /// Default log filter for the environment; `RUST_LOG` overrides it
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Development => "info,tower_http=debug,tools_manufacturer_api=debug",
            Environment::Staging | Environment::Production => "info",
        }
    }
}

impl SecurityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Credential settings alone, for commands that never touch storage or payments
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_secret = required(&lookup, "ACCESS_TOKEN_SECRET")?;
        let token_ttl_days = match lookup("TOKEN_TTL_DAYS") {
            Some(v) => {
                let days: i64 = parse("TOKEN_TTL_DAYS", v.clone())?;
                if days <= 0 {
                    return Err(ConfigError::Invalid { name: "TOKEN_TTL_DAYS", value: v });
                }
                days
            }
            None => 10,
        };

        Ok(Self {
            token_secret,
            token_ttl_days,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Environment presets are applied first, then individual overrides.
    /// Required secrets are checked here so a misconfigured process exits
    /// before binding a port.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup);
        let security = SecurityConfig::from_lookup(&lookup)?;
        let stripe_secret_key = required(&lookup, "STRIPE_SECRET_KEY")?;

        let mut config = match environment {
            Environment::Production => Self::production(security, stripe_secret_key),
            Environment::Staging => Self::staging(security, stripe_secret_key),
            Environment::Development => Self::development(security, stripe_secret_key),
        };
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse("PORT", v)?;
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Database overrides
        self.database.uri = lookup("MONGODB_URI").or(self.database.uri.take());
        self.database.user = lookup("DB_USER");
        self.database.password = lookup("DB_PASS");
        if let Some(v) = lookup("DB_CLUSTER") {
            self.database.cluster = v;
        }
        if let Some(v) = lookup("DATABASE_NAME") {
            self.database.name = v;
        }

        // Payment overrides
        if let Some(v) = lookup("STRIPE_API_BASE") {
            self.payments.stripe_api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("PAYMENT_CURRENCY") {
            self.payments.currency = v.to_lowercase();
        }

        Ok(())
    }

    fn development(security: SecurityConfig, stripe_secret_key: String) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                cors_origins: Vec::new(),
            },
            database: DatabaseConfig {
                uri: None,
                user: None,
                password: None,
                cluster: "cluster0.gdmi3.mongodb.net".to_string(),
                name: "tools-manufacturer".to_string(),
            },
            security,
            payments: PaymentConfig {
                stripe_secret_key,
                stripe_api_base: "https://api.stripe.com".to_string(),
                currency: "usd".to_string(),
            },
        }
    }

    fn staging(security: SecurityConfig, stripe_secret_key: String) -> Self {
        let mut config = Self::development(security, stripe_secret_key);
        config.environment = Environment::Staging;
        config
    }

    fn production(security: SecurityConfig, stripe_secret_key: String) -> Self {
        let mut config = Self::development(security, stripe_secret_key);
        config.environment = Environment::Production;
        config.server.cors_origins = vec!["https://tools-manufacturer.web.app".to_string()];
        config
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
