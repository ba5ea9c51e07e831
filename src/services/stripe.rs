//! Stripe service for hosted Checkout sessions
//!
//! This module talks to the Stripe REST API with form-encoded requests.
//! Only session creation is needed: the hosted page owns the rest of the
//! payment flow.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::config::{Settings, DEFAULT_STRIPE_API_BASE};
use crate::schemas::stripe::{CheckoutSession, CheckoutSessionRequest, StripeErrorResponse};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when calling the Stripe API
#[derive(Error, Debug)]
pub enum StripeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stripe API error ({status}, {error_type}): {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Missing API key")]
    MissingApiKey,
}

// ============================================================================
// Provider seam
// ============================================================================

/// Anything that can open a hosted checkout session
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, StripeError>;
}

// ============================================================================
// Stripe Service
// ============================================================================

/// Configuration for the Stripe service
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (`sk_live_...` / `sk_test_...`)
    pub secret_key: String,

    /// Base URL (default: api.stripe.com/v1)
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: None,
            timeout_seconds: 30,
        }
    }

    /// Config derived from application settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.stripe_secret_key.clone())
            .with_base_url(settings.stripe_api_base.clone())
            .with_timeout(settings.stripe_timeout_seconds)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Service for interacting with the Stripe API
#[derive(Clone)]
pub struct StripeService {
    client: Client,
    base_url: Option<String>,
    secret_key: String,
}

impl StripeService {
    /// Create a new Stripe service
    pub fn new(config: StripeConfig) -> Result<Self, StripeError> {
        if config.secret_key.trim().is_empty() {
            return Err(StripeError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        tracing::info!(
            base_url = %config.base_url.as_deref().unwrap_or(DEFAULT_STRIPE_API_BASE),
            live = config.secret_key.starts_with("sk_live_"),
            "Initialized Stripe service"
        );

        Ok(Self {
            client,
            base_url: config.base_url,
            secret_key: config.secret_key,
        })
    }

    /// Get the base URL
    fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_STRIPE_API_BASE)
            .trim_end_matches('/')
    }

    fn sessions_url(&self) -> String {
        format!("{}/checkout/sessions", self.base_url())
    }
}

#[async_trait]
impl CheckoutProvider for StripeService {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, StripeError> {
        let url = self.sessions_url();

        tracing::debug!(
            url = %url,
            line_items = request.line_items.len(),
            "Calling Stripe create checkout session API"
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&request.to_form_params())
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            if let Ok(stripe_error) = serde_json::from_str::<StripeErrorResponse>(&body) {
                let detail = stripe_error.error;
                return Err(StripeError::Api {
                    status: status.as_u16(),
                    error_type: detail.error_type.unwrap_or_else(|| "api_error".to_string()),
                    message: detail
                        .message
                        .or(detail.code)
                        .unwrap_or_else(|| status.to_string()),
                });
            }

            return Err(StripeError::Api {
                status: status.as_u16(),
                error_type: "api_error".to_string(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse Stripe checkout session response");
            StripeError::Parse(e.to_string())
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
