use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{money, AppState};
use crate::domain::product::{Product, ProductInput};
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub stock: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price: String,
    pub stock: i32,
    pub active: bool,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            price: money(&p.price),
            stock: p.stock,
            active: p.active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListProductsParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListProductsResponse {
    pub items: Vec<ProductResponse>,
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

/// GET /api/products
///
/// Returns a page of active products ordered by name.
#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-based, default 1)"),
        ("limit" = Option<i64>, Query, description = "Items per page (default 50, clamped to the configured maximum)"),
    ),
    responses(
        (status = 200, description = "Paginated list of active products", body = ListProductsResponse),
        (status = 400, description = "Invalid page or limit"),
    ),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListProductsParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();

    let page =
        web::block(move || state.products.list_products(params.page, params.limit)).await??;

    let page = page.map(ProductResponse::from);
    Ok(HttpResponse::Ok().json(ListProductsResponse {
        items: page.items,
        page: page.page,
        limit: page.limit,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }))
}

/// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product data"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let price = BigDecimal::from_str(body.price.trim()).map_err(|e| {
        AppError::invalid_request(format!("Invalid price '{}': {}", body.price, e))
    })?;
    let input = ProductInput {
        name: body.name,
        price,
        stock: body.stock,
        active: body.active,
    };

    let product = web::block(move || state.products.create_product(input)).await??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}
