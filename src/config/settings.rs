//! Application settings and configuration
//!
//! Settings are read once at process start from environment variables
//! (and a `.env` file when one is present).

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Default Stripe REST API base
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Application environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "stage")]
    Staging,
    #[value(alias = "prod")]
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => anyhow::bail!("Invalid environment: {}. Expected: development, staging, or production", s),
        }
    }
}

/// Main application settings
#[derive(Clone, Deserialize, Serialize)]
pub struct Settings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub environment: Environment,
    pub log_level: String,

    // Server settings
    pub host: String,
    pub port: u16,

    // Stripe settings
    #[serde(skip_serializing)]
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub stripe_timeout_seconds: u64,

    /// Public site URL the checkout redirects back to.
    /// Kept raw; `checkout::base_url` validates it on every request.
    pub site_url: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("app_name", &self.app_name)
            .field("app_version", &self.app_version)
            .field("environment", &self.environment)
            .field("log_level", &self.log_level)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("stripe_secret_key", &"[REDACTED]")
            .field("stripe_api_base", &self.stripe_api_base)
            .field("stripe_timeout_seconds", &self.stripe_timeout_seconds)
            .field("site_url", &self.site_url)
            .finish()
    }
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignored in production typically)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let stripe_secret_key = lookup("STRIPE_SECRET_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .context("STRIPE_SECRET_KEY is missing in the environment or .env")?;

        let settings = Self {
            // App settings
            app_name: or_default("APP_NAME", "cart-checkout"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: or_default("ENVIRONMENT", "development")
                .parse()
                .unwrap_or_default(),
            log_level: or_default("LOG_LEVEL", "info"),

            // Server settings
            host: or_default("HOST", "0.0.0.0"),
            port: or_default("PORT", "8000")
                .parse()
                .context("Invalid PORT value")?,

            // Stripe settings
            stripe_secret_key,
            stripe_api_base: or_default("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
            stripe_timeout_seconds: or_default("STRIPE_TIMEOUT_SECONDS", "30")
                .parse()
                .context("Invalid STRIPE_TIMEOUT_SECONDS value")?,

            site_url: lookup("SITE_URL")
                .or_else(|| lookup("NEXT_PUBLIC_SITE_URL"))
                .unwrap_or_default(),
        };

        // Validate settings
        settings.validate()?;

        Ok(settings)
    }

    /// Validate settings
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.stripe_timeout_seconds == 0 {
            anyhow::bail!("STRIPE_TIMEOUT_SECONDS must be > 0");
        }

        // The site URL is only enforced per request, so a bad value still lets
        // health probes report it
        if let Err(e) = crate::checkout::base_url(&self.site_url) {
            tracing::warn!(error = %e, "Site URL is not usable, checkout requests will fail");
        }

        if self.is_production() && self.stripe_secret_key.starts_with("sk_test_") {
            tracing::warn!("Running in production with a Stripe test key");
        }

        Ok(())
    }

    /// Check if running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "cart-checkout".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: Environment::Development,
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            stripe_secret_key: String::new(),
            stripe_api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            stripe_timeout_seconds: 30,
            site_url: String::new(),
        }
    }
}
