//! Application state container
//!
//! This module defines the shared application state that is passed
//! to all request handlers via Axum's state extraction.

use crate::config::Settings;
use crate::services::{CheckoutProvider, StripeConfig, StripeService};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
///
/// Cheap to clone; everything behind it is read-only.
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Checkout session provider (Stripe in production)
    pub provider: Arc<dyn CheckoutProvider>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state backed by Stripe
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        tracing::debug!(
            stripe_api_base = %settings.stripe_api_base,
            timeout_seconds = settings.stripe_timeout_seconds,
            "Creating Stripe client"
        );
        let stripe = StripeService::new(StripeConfig::from_settings(&settings))?;

        tracing::info!("Application state initialized successfully");

        Ok(Self::with_provider(settings, Arc::new(stripe)))
    }

    /// Create state around an explicit provider
    pub fn with_provider(settings: Settings, provider: Arc<dyn CheckoutProvider>) -> Self {
        Self {
            settings: Arc::new(settings),
            provider,
            start_time: Instant::now(),
        }
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Whether the configured site URL can produce redirect targets
    pub fn site_url_valid(&self) -> bool {
        crate::checkout::base_url(&self.settings.site_url).is_ok()
    }
}
