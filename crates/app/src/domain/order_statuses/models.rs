//! Order Status Models

/// Longest accepted status key.
pub const MAX_KEY_LEN: usize = 24;

/// Longest accepted status label.
pub const MAX_LABEL_LEN: usize = 60;

/// Order Status Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatus {
    pub key: String,
    pub label: String,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Order Status Update Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatusUpdate {
    pub label: String,
    pub sort_order: i32,
    pub is_active: bool,
}
