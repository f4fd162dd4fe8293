//! Get Site Settings Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::site_settings::models::SiteSettings;

use crate::{extensions::*, site_settings::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SiteSettingsResponse {
    pub site_name: String,

    /// `#rrggbb`
    pub primary_color: String,

    /// ISO 4217 code
    pub currency: String,

    pub updated_at: String,
}

impl From<SiteSettings> for SiteSettingsResponse {
    fn from(settings: SiteSettings) -> Self {
        SiteSettingsResponse {
            site_name: settings.site_name,
            primary_color: settings.primary_color,
            currency: settings.currency,
            updated_at: settings.updated_at.to_string(),
        }
    }
}

/// Get Site Settings Handler
///
/// Served both publicly for storefront branding and under `/admin`.
#[endpoint(tags("site-settings"), summary = "Get Site Settings")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SiteSettingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let settings = state
        .app
        .site_settings
        .get_site_settings()
        .await
        .map_err(into_status_error)?;

    Ok(Json(settings.into()))
}
