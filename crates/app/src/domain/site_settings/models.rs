//! Site Settings Models

use jiff::Timestamp;

/// Longest accepted site name.
pub const MAX_SITE_NAME_LEN: usize = 160;

/// Site Settings Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettings {
    pub site_name: String,

    /// `#rrggbb`, lower case
    pub primary_color: String,

    /// ISO 4217 code shown by the storefront
    pub currency: String,

    pub updated_at: Timestamp,
}

/// Every editable setting, replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSettingsFields {
    pub site_name: String,
    pub primary_color: String,
    pub currency: String,
}
