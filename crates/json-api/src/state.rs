//! Shared handler state

use std::sync::Arc;

use storefront::money::Currency;
use storefront_app::context::AppContext;

/// Injected into every request's depot.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }

    /// Currency amounts are formatted in for display.
    #[must_use]
    pub(crate) fn currency(&self) -> &'static Currency {
        self.app.settings.currency
    }
}
