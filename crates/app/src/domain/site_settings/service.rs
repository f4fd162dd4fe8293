//! Site settings service.

use async_trait::async_trait;
use mockall::automock;
use storefront::money::currency_from_code;
use tracing::info;

use crate::{
    database::Db,
    domain::site_settings::{
        errors::SiteSettingsServiceError,
        models::{MAX_SITE_NAME_LEN, SiteSettings, SiteSettingsFields},
        repository::PgSiteSettingsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgSiteSettingsService {
    db: Db,
    repository: PgSiteSettingsRepository,
}

impl PgSiteSettingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgSiteSettingsRepository::new(),
        }
    }
}

fn validation(message: impl Into<String>) -> SiteSettingsServiceError {
    SiteSettingsServiceError::Validation(message.into())
}

/// `#` followed by six hex digits, returned lower case.
fn normalize_color(color: &str) -> Option<String> {
    let hex = color.trim().strip_prefix('#')?;

    (hex.len() == 6 && hex.bytes().all(|byte| byte.is_ascii_hexdigit()))
        .then(|| format!("#{}", hex.to_ascii_lowercase()))
}

fn normalize(fields: SiteSettingsFields) -> Result<SiteSettingsFields, SiteSettingsServiceError> {
    let site_name = fields.site_name.trim().to_string();

    if site_name.is_empty() || site_name.chars().count() > MAX_SITE_NAME_LEN {
        return Err(validation(format!(
            "site name must be between 1 and {MAX_SITE_NAME_LEN} characters"
        )));
    }

    let primary_color = normalize_color(&fields.primary_color)
        .ok_or_else(|| validation("primary color must look like #rrggbb"))?;

    let currency = currency_from_code(fields.currency.trim()).map_err(|code| {
        validation(format!("unsupported currency {code:?}"))
    })?;

    Ok(SiteSettingsFields {
        site_name,
        primary_color,
        currency: currency.iso_alpha_code.to_string(),
    })
}

#[async_trait]
impl SiteSettingsService for PgSiteSettingsService {
    async fn get_site_settings(&self) -> Result<SiteSettings, SiteSettingsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let settings = self.repository.get_site_settings(&mut tx).await?;

        tx.commit().await?;

        Ok(settings)
    }

    #[tracing::instrument(name = "site_settings.service.update", skip(self, fields), err)]
    async fn update_site_settings(
        &self,
        fields: SiteSettingsFields,
    ) -> Result<SiteSettings, SiteSettingsServiceError> {
        let fields = normalize(fields)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self.repository.update_site_settings(&mut tx, &fields).await?;

        tx.commit().await?;

        info!(
            site_name = %updated.site_name,
            currency = %updated.currency,
            "site settings updated"
        );

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait SiteSettingsService: Send + Sync {
    /// Retrieves the settings, creating the default row on first use.
    async fn get_site_settings(&self) -> Result<SiteSettings, SiteSettingsServiceError>;

    /// Replaces every setting.
    async fn update_site_settings(
        &self,
        fields: SiteSettingsFields,
    ) -> Result<SiteSettings, SiteSettingsServiceError>;
}

#[cfg(test)]
mod tests {
    use sqlx::query;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn fields(site_name: &str, primary_color: &str, currency: &str) -> SiteSettingsFields {
        SiteSettingsFields {
            site_name: site_name.to_string(),
            primary_color: primary_color.to_string(),
            currency: currency.to_string(),
        }
    }

    #[test]
    fn colors_must_be_six_hex_digits() {
        assert_eq!(normalize_color(" #C9DAC7 ").as_deref(), Some("#c9dac7"));
        assert_eq!(normalize_color("c9dac7"), None);
        assert_eq!(normalize_color("#c9d"), None);
        assert_eq!(normalize_color("#c9dacz"), None);
    }

    #[tokio::test]
    async fn fresh_database_has_default_settings() -> TestResult {
        let ctx = TestContext::new().await;

        let settings = ctx.site_settings.get_site_settings().await?;

        assert_eq!(settings.site_name, "Minha Loja");
        assert_eq!(settings.primary_color, "#c9dac7");
        assert_eq!(settings.currency, "BRL");

        Ok(())
    }

    #[tokio::test]
    async fn missing_row_is_recreated_with_defaults() -> TestResult {
        let ctx = TestContext::new().await;

        query("DELETE FROM site_settings")
            .execute(ctx.db.pool())
            .await?;

        let settings = ctx.site_settings.get_site_settings().await?;

        assert_eq!(settings.site_name, "Minha Loja");
        assert_eq!(ctx.site_settings.get_site_settings().await?, settings);

        Ok(())
    }

    #[tokio::test]
    async fn update_normalizes_and_persists() -> TestResult {
        let ctx = TestContext::new().await;

        let updated = ctx
            .site_settings
            .update_site_settings(fields("  Loja Azul ", "#1A2B3C", "usd"))
            .await?;

        assert_eq!(updated.site_name, "Loja Azul");
        assert_eq!(updated.primary_color, "#1a2b3c");
        assert_eq!(updated.currency, "USD");
        assert_eq!(ctx.site_settings.get_site_settings().await?, updated);

        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_bad_values() {
        let ctx = TestContext::new().await;

        for bad in [
            fields("   ", "#ffffff", "BRL"),
            fields("Loja", "blue", "BRL"),
            fields("Loja", "#ffffff", "XYZ"),
        ] {
            let result = ctx.site_settings.update_site_settings(bad).await;

            assert!(
                matches!(result, Err(SiteSettingsServiceError::Validation(_))),
                "expected Validation, got {result:?}"
            );
        }
    }
}
