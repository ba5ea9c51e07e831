//! Checkout endpoint
//!
//! POST /checkout takes the storefront's cart form, opens a hosted Stripe
//! Checkout session and redirects the browser to it.

use axum::{extract::State, http::HeaderValue, response::Redirect, Form};

use crate::checkout;
use crate::error::ApiError;
use crate::schemas::cart::CheckoutForm;
use crate::server::state::AppState;

/// Create a checkout session and redirect to it
///
/// Responds `303 See Other` so the browser follows with a GET.
///
/// POST /checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> Result<Redirect, ApiError> {
    let request = checkout::build_session_request(form.items.as_deref(), &state.settings.site_url)
        .map_err(|e| {
            match &e {
                ApiError::InvalidBaseUrl => {
                    tracing::error!(error = %e, "Site URL misconfigured, cannot build redirect URLs")
                }
                _ => tracing::warn!(error = %e, "Rejected checkout cart"),
            }
            e
        })?;

    tracing::info!(
        line_items = request.line_items.len(),
        units = request
            .line_items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.quantity)),
        "Creating checkout session"
    );

    let session = state
        .provider
        .create_checkout_session(&request)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Checkout session creation failed");
            ApiError::from(e)
        })?;

    let url = match session.url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => {
            tracing::error!(session_id = %session.id, "Checkout session has no URL");
            return Err(ApiError::MissingSessionUrl);
        }
    };

    // Redirect::to panics on values that cannot go into a Location header
    if HeaderValue::from_str(url).is_err() || url::Url::parse(url).is_err() {
        tracing::error!(session_id = %session.id, "Checkout session URL is not a valid redirect target");
        return Err(ApiError::Provider(format!(
            "checkout session {} returned an invalid URL",
            session.id
        )));
    }

    tracing::info!(
        session_id = %session.id,
        amount_total = ?session.amount_total,
        "Redirecting to hosted checkout"
    );

    Ok(Redirect::to(url))
}
