use serde::{Deserialize, Serialize};

/// Body returned by the product item route. Built per request and dropped
/// once serialized.
#[derive(Debug, Serialize, Clone, PartialEq, Deserialize)]
pub struct ItemView {
    pub category: String,
    pub item_id: i128,
    pub urgent: bool,
    pub discount_applied: f64,
}
