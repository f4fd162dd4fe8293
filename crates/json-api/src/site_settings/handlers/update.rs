//! Update Site Settings Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::site_settings::models::SiteSettingsFields;

use crate::{
    extensions::*,
    site_settings::{errors::into_status_error, get::SiteSettingsResponse},
    state::State,
};

/// Update Site Settings Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateSiteSettingsRequest {
    pub site_name: String,

    /// `#rrggbb`
    pub primary_color: String,

    /// ISO 4217 code; BRL, USD, EUR or GBP
    pub currency: String,
}

impl From<UpdateSiteSettingsRequest> for SiteSettingsFields {
    fn from(request: UpdateSiteSettingsRequest) -> Self {
        SiteSettingsFields {
            site_name: request.site_name,
            primary_color: request.primary_color,
            currency: request.currency,
        }
    }
}

/// Update Site Settings Handler
#[endpoint(
    tags("site-settings"),
    summary = "Update Site Settings",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Site settings updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateSiteSettingsRequest>,
    depot: &mut Depot,
) -> Result<Json<SiteSettingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let settings = state
        .app
        .site_settings
        .update_site_settings(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(settings.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use storefront_app::domain::site_settings::{
        MockSiteSettingsService, SiteSettingsServiceError,
    };

    use crate::{
        site_settings::get::tests::make_site_settings,
        test_helpers::{mock_app, staff_service},
    };

    use super::*;

    fn router() -> Router {
        Router::with_path("admin/site-setting").put(handler)
    }

    fn app_with(site_settings: MockSiteSettingsService) -> storefront_app::context::AppContext {
        let mut app = mock_app();

        app.site_settings = Arc::new(site_settings);

        app
    }

    #[tokio::test]
    async fn test_update_site_settings() -> TestResult {
        let mut site_settings = MockSiteSettingsService::new();

        site_settings
            .expect_update_site_settings()
            .once()
            .withf(|fields| {
                fields.site_name == "Loja Azul"
                    && fields.primary_color == "#1a2b3c"
                    && fields.currency == "USD"
            })
            .return_once(|fields| {
                let mut settings = make_site_settings();

                settings.site_name = fields.site_name;
                settings.primary_color = fields.primary_color;
                settings.currency = fields.currency;

                Ok(settings)
            });

        let mut res = TestClient::put("http://example.com/admin/site-setting")
            .json(&json!({
                "site_name": "Loja Azul",
                "primary_color": "#1a2b3c",
                "currency": "USD",
            }))
            .send(&staff_service(app_with(site_settings), router()))
            .await;

        let body: SiteSettingsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.site_name, "Loja Azul");
        assert_eq!(body.currency, "USD");

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_color_returns_400() -> TestResult {
        let mut site_settings = MockSiteSettingsService::new();

        site_settings.expect_update_site_settings().once().return_once(|_| {
            Err(SiteSettingsServiceError::Validation(
                "primary color must look like #rrggbb".to_string(),
            ))
        });

        let res = TestClient::put("http://example.com/admin/site-setting")
            .json(&json!({ "site_name": "Loja", "primary_color": "blue", "currency": "BRL" }))
            .send(&staff_service(app_with(site_settings), router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_field_returns_400() -> TestResult {
        let mut site_settings = MockSiteSettingsService::new();

        site_settings.expect_update_site_settings().never();

        let res = TestClient::put("http://example.com/admin/site-setting")
            .json(&json!({ "site_name": "Loja" }))
            .send(&staff_service(app_with(site_settings), router()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
