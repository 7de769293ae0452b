//! Inventory service: products, discounts and promotions.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::services::error::{ServiceError, ServiceResult};
use crate::services::health;
use crate::services::store::{Collection, Document};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
}

impl Document for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Fields a PATCH may change. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
}

impl ProductPatch {
    fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub applicable_products: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
}

impl Discount {
    /// Active and inside its validity window at `now` (bounds inclusive).
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }

    pub fn applies_to(&self, product_id: &str) -> bool {
        self.applicable_products.iter().any(|id| id == product_id)
    }
}

impl Document for Discount {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Raw list query. Values that fail to parse fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Validated filter and pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: u64,
    pub limit: u64,
}

impl From<ListQuery> for ProductFilter {
    fn from(query: ListQuery) -> Self {
        let page = query
            .page
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map_or(1, |p| p as u64);
        let limit = query
            .limit
            .and_then(|l| l.parse::<i64>().ok())
            .filter(|l| (1..=MAX_PAGE_SIZE as i64).contains(l))
            .map_or(DEFAULT_PAGE_SIZE, |l| l as u64);

        Self {
            category: query.category.filter(|c| !c.is_empty()),
            min_price: query.min_price.and_then(|p| p.parse().ok()),
            max_price: query.max_price.and_then(|p| p.parse().ok()),
            page,
            limit,
        }
    }
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.category.as_ref().map_or(true, |c| *c == product.category)
            && self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageMetadata {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub limit: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductPromotion {
    pub product: Product,
    pub discounts: Vec<Discount>,
}

/// Shared handles to the inventory collections.
#[derive(Debug, Clone, Default)]
pub struct InventoryState {
    pub products: Arc<Collection<Product>>,
    pub discounts: Arc<Collection<Discount>>,
}

/// Routes of the inventory service.
pub fn router(state: InventoryState) -> Router {
    Router::new()
        .route("/products", post(create_product).get(list_products))
        .route("/products/promotions", get(list_promotions))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/discounts", post(create_discount))
        .route("/discounts/{id}", delete(delete_discount))
        .route("/health", get(health))
        .with_state(state)
}

async fn create_product(
    State(state): State<InventoryState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<Product>)> {
    let Json(product) = payload?;
    let product = state.products.insert(product)?;
    tracing::info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Product>> {
    state
        .products
        .get(&id)
        .map(Json)
        .ok_or(ServiceError::NotFound("Product not found"))
}

async fn update_product(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> ServiceResult<Json<Product>> {
    let Json(patch) = payload?;
    state
        .products
        .update(&id, |product| patch.apply(product))
        .map(Json)
        .ok_or(ServiceError::NotFound("Product not found"))
}

async fn delete_product(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Value>> {
    state
        .products
        .delete(&id)
        .ok_or(ServiceError::NotFound("Product not found"))?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(json!({ "message": "Product deleted" })))
}

async fn list_products(
    State(state): State<InventoryState>,
    Query(query): Query<ListQuery>,
) -> Json<ProductPage> {
    let filter = ProductFilter::from(query);
    let matching = state.products.find(|p| filter.matches(p));

    let total_items = matching.len() as u64;
    let total_pages = total_items.div_ceil(filter.limit);
    let skip = (filter.page - 1).saturating_mul(filter.limit);
    let products = matching
        .into_iter()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(filter.limit as usize)
        .collect();

    Json(ProductPage {
        products,
        metadata: PageMetadata {
            total_items,
            total_pages,
            current_page: filter.page,
            limit: filter.limit,
        },
    })
}

async fn create_discount(
    State(state): State<InventoryState>,
    payload: Result<Json<Discount>, JsonRejection>,
) -> ServiceResult<(StatusCode, Json<Discount>)> {
    let Json(discount) = payload?;
    let discount = state.discounts.insert(discount)?;
    tracing::info!(discount_id = %discount.id, "Discount created");
    Ok((StatusCode::CREATED, Json(discount)))
}

async fn delete_discount(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Value>> {
    state
        .discounts
        .delete(&id)
        .ok_or(ServiceError::NotFound("Discount not found"))?;
    Ok(Json(json!({ "message": "Discount deleted" })))
}

async fn list_promotions(State(state): State<InventoryState>) -> Json<Vec<ProductPromotion>> {
    Json(promotions_at(&state, Utc::now()))
}

/// Products referenced by a current discount, each with its current discounts.
pub fn promotions_at(state: &InventoryState, now: DateTime<Utc>) -> Vec<ProductPromotion> {
    let current = state.discounts.find(|d| d.is_current(now));
    let product_ids: BTreeSet<&str> = current
        .iter()
        .flat_map(|d| d.applicable_products.iter().map(String::as_str))
        .collect();

    product_ids
        .into_iter()
        .filter_map(|id| state.products.get(id))
        .map(|product| {
            let discounts = current
                .iter()
                .filter(|d| d.applies_to(&product.id))
                .cloned()
                .collect();
            ProductPromotion { product, discounts }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use chrono::Duration;
    use tower::ServiceExt;

    fn product(id: &str, price: f64, category: &str) -> Product {
        Product {
            id: id.into(),
            name: format!("product {id}"),
            price,
            stock: 5,
            category: category.into(),
        }
    }

    fn seeded() -> InventoryState {
        let state = InventoryState::default();
        state.products.insert(product("p1", 5.0, "books")).unwrap();
        state.products.insert(product("p2", 15.0, "books")).unwrap();
        state.products.insert(product("p3", 25.0, "games")).unwrap();
        state
    }

    async fn call(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn product_lifecycle() {
        let state = InventoryState::default();

        let (status, created) = call(
            router(state.clone()),
            Method::POST,
            "/products",
            Some(r#"{"id":"42","name":"Lamp","price":19.5,"stock":3,"category":"home"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], "42");

        let (status, patched) = call(
            router(state.clone()),
            Method::PATCH,
            "/products/42",
            Some(r#"{"stock":0}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["stock"], 0);
        assert_eq!(patched["name"], "Lamp");

        let (status, body) = call(router(state.clone()), Method::DELETE, "/products/42", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product deleted");

        let (status, body) = call(router(state), Method::GET, "/products/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Product not found" }));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (status, body) = call(
            router(InventoryState::default()),
            Method::POST,
            "/products",
            Some(r#"{"price": "#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn list_filters_and_paginates() {
        let state = seeded();

        let (status, page) = call(
            router(state.clone()),
            Method::GET,
            "/products?category=books&min_price=10",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["products"].as_array().unwrap().len(), 1);
        assert_eq!(page["products"][0]["id"], "p2");
        assert_eq!(page["metadata"]["total_items"], 1);

        let (_, page) = call(router(state), Method::GET, "/products?limit=2&page=2", None).await;
        assert_eq!(page["products"][0]["id"], "p3");
        assert_eq!(
            page["metadata"],
            json!({ "total_items": 3, "total_pages": 2, "current_page": 2, "limit": 2 })
        );
    }

    #[test]
    fn bad_pagination_falls_back_to_defaults() {
        let filter = ProductFilter::from(ListQuery {
            page: Some("0".into()),
            limit: Some("500".into()),
            min_price: Some("cheap".into()),
            ..Default::default()
        });
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(filter.min_price, None);
    }

    #[test]
    fn promotions_only_use_current_discounts() {
        let state = seeded();
        let now = Utc::now();
        let window = |active: bool, from: i64, to: i64, products: &[&str], id: &str| Discount {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            discount_percentage: 10.0,
            applicable_products: products.iter().map(|p| p.to_string()).collect(),
            start_date: now + Duration::days(from),
            end_date: now + Duration::days(to),
            is_active: active,
        };
        state.discounts.insert(window(true, -1, 1, &["p2", "p1", "ghost"], "d1")).unwrap();
        state.discounts.insert(window(true, -1, 1, &["p2"], "d2")).unwrap();
        state.discounts.insert(window(false, -1, 1, &["p3"], "inactive")).unwrap();
        state.discounts.insert(window(true, 1, 2, &["p3"], "future")).unwrap();

        let promotions = promotions_at(&state, now);

        let ids: Vec<_> = promotions.iter().map(|p| p.product.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2"]);
        assert_eq!(promotions[0].discounts.len(), 1);
        assert_eq!(promotions[1].discounts.len(), 2);
    }

    #[tokio::test]
    async fn promotions_route_is_not_an_id() {
        let (status, body) =
            call(router(seeded()), Method::GET, "/products/promotions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn deleting_unknown_discount_is_404() {
        let (status, body) =
            call(router(InventoryState::default()), Method::DELETE, "/discounts/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Discount not found");
    }
}
