//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        categories::{CategoriesService, PgCategoriesService},
        coupons::{CouponsService, PgCouponsService},
        customers::{CustomersService, PgCustomersService},
        order_statuses::{OrderStatusesService, PgOrderStatusesService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        site_settings::{PgSiteSettingsService, SiteSettingsService},
    },
    settings::StoreSettings,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub categories: Arc<dyn CategoriesService>,
    pub products: Arc<dyn ProductsService>,
    pub customers: Arc<dyn CustomersService>,
    pub addresses: Arc<dyn AddressesService>,
    pub order_statuses: Arc<dyn OrderStatusesService>,
    pub coupons: Arc<dyn CouponsService>,
    pub orders: Arc<dyn OrdersService>,
    pub site_settings: Arc<dyn SiteSettingsService>,
    pub auth: Arc<dyn AuthService>,
    pub settings: StoreSettings,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails, or when
    /// `run_migrations` is set and applying them fails.
    pub async fn from_database_url(
        url: &str,
        settings: StoreSettings,
        run_migrations: bool,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let db = Db::new(pool.clone());

        Ok(Self {
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            customers: Arc::new(PgCustomersService::new(db.clone())),
            addresses: Arc::new(PgAddressesService::new(db.clone())),
            order_statuses: Arc::new(PgOrderStatusesService::new(db.clone())),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            site_settings: Arc::new(PgSiteSettingsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(
                db,
                settings.order_numbers.clone(),
            )),
            auth: Arc::new(PgAuthService::new(pool)),
            settings,
        })
    }
}
