use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
    Json,
};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::AppError;
use crate::models::item::ItemView;
use crate::params::{ParamKind, ParamSource, ParamSpec, ParamValue, RawParams, RouteParams};

pub static PRODUCT_ITEM: Lazy<RouteParams> = Lazy::new(|| RouteParams {
    operation_id: "read_product_item",
    path: "/products/{category}/items/{item_id}",
    specs: vec![
        ParamSpec::required("category", ParamSource::Path, ParamKind::Text),
        ParamSpec::required("item_id", ParamSource::Path, ParamKind::Integer),
        ParamSpec::optional(
            "urgent",
            ParamSource::Query,
            ParamKind::Boolean,
            ParamValue::Boolean(false),
        ),
        ParamSpec::optional(
            "discount",
            ParamSource::Query,
            ParamKind::Float,
            ParamValue::Float(0.0),
        ),
    ],
});

/// Typed arguments of [`read_product_item`], decoded through [`PRODUCT_ITEM`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProductItemParams {
    pub category: String,
    pub item_id: i128,
    pub urgent: bool,
    pub discount: f64,
}

fn unbound(name: &str) -> AppError {
    AppError::Internal(format!("parameter `{name}` is not bound by the route table"))
}

#[async_trait]
impl<S> FromRequestParts<S> for ProductItemParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(path) = Path::<HashMap<String, String>>::from_request_parts(parts, state).await?;
        // An empty capture is a route miss, as with a `[^/]+` segment pattern.
        if path.values().any(String::is_empty) {
            return Err(AppError::NotFound);
        }
        let Query(query) = Query::<Vec<(String, String)>>::from_request_parts(parts, state).await?;

        let mut decoded = PRODUCT_ITEM.decode(&RawParams { path, query })?;

        Ok(ProductItemParams {
            category: decoded
                .take_text("category")
                .ok_or_else(|| unbound("category"))?,
            item_id: decoded.integer("item_id").ok_or_else(|| unbound("item_id"))?,
            urgent: decoded.boolean("urgent").ok_or_else(|| unbound("urgent"))?,
            discount: decoded.float("discount").ok_or_else(|| unbound("discount"))?,
        })
    }
}

pub fn read_product_item(
    category: String,
    item_id: i128,
    urgent: bool,
    discount: f64,
) -> ItemView {
    ItemView {
        category,
        item_id,
        urgent,
        discount_applied: discount,
    }
}

pub async fn handler(params: ProductItemParams) -> Json<ItemView> {
    debug!(
        category = %params.category,
        item_id = %params.item_id,
        "Product item handler is run"
    );
    Json(read_product_item(
        params.category,
        params.item_id,
        params.urgent,
        params.discount,
    ))
}
