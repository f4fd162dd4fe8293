//! Site Settings Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::site_settings::models::{SiteSettings, SiteSettingsFields};

const GET_SITE_SETTINGS_SQL: &str = include_str!("sql/get_site_settings.sql");
const UPDATE_SITE_SETTINGS_SQL: &str = include_str!("sql/update_site_settings.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSiteSettingsRepository;

impl PgSiteSettingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Reads the settings row, recreating it with defaults when it is missing.
    pub(crate) async fn get_site_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<SiteSettings, sqlx::Error> {
        query_as::<Postgres, SiteSettings>(GET_SITE_SETTINGS_SQL)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_site_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        fields: &SiteSettingsFields,
    ) -> Result<SiteSettings, sqlx::Error> {
        query_as::<Postgres, SiteSettings>(UPDATE_SITE_SETTINGS_SQL)
            .bind(&fields.site_name)
            .bind(&fields.primary_color)
            .bind(&fields.currency)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for SiteSettings {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            site_name: row.try_get("site_name")?,
            primary_color: row.try_get("primary_color")?,
            currency: row.try_get("currency")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
