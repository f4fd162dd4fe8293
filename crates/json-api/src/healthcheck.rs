//! Healthcheck Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Running build version
    pub version: String,

    /// ISO code of the store currency
    pub currency: String,

    /// Prefix stamped on new order numbers
    pub order_number_prefix: String,
}

/// Healthcheck handler
///
/// Reports liveness along with the store settings this instance was started with.
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        currency: state.currency().iso_alpha_code.to_string(),
        order_number_prefix: state.app.settings.order_numbers.prefix().to_string(),
    }))
}
