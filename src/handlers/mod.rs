pub mod orders;
pub mod products;

use actix_web::{web, HttpRequest};
use bigdecimal::BigDecimal;
use utoipa::OpenApi;

use crate::application::order_service::OrderService;
use crate::application::product_service::ProductService;
use crate::application::stats_service::StatsService;
use crate::errors::AppError;
use crate::infrastructure::order_repo::DieselOrderRepository;
use crate::infrastructure::product_repo::DieselProductRepository;

/// Services shared by every worker.
pub struct AppState {
    pub orders: OrderService<DieselOrderRepository>,
    pub products: ProductService<DieselProductRepository>,
    pub stats: StatsService<DieselOrderRepository>,
}

/// Render a money amount with exactly two decimals, e.g. "30.00".
pub(crate) fn money(amount: &BigDecimal) -> String {
    amount.with_scale(2).to_string()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Order API",
        description = "Orders, products and order statistics for an e-commerce store."
    ),
    paths(
        orders::list_orders,
        orders::order_stats,
        orders::get_order,
        orders::create_order,
        orders::update_order_status,
        products::list_products,
        products::create_product,
    ),
    components(schemas(
        orders::CreateOrderRequest,
        orders::CreateOrderItemRequest,
        orders::UpdateOrderStatusRequest,
        orders::OrderResponse,
        orders::OrderSummaryResponse,
        orders::OrderItemResponse,
        orders::ListOrdersResponse,
        orders::OrderStatsResponse,
        products::CreateProductRequest,
        products::ProductResponse,
        products::ListProductsResponse,
    )),
    tags(
        (name = "orders", description = "Order placement, lookup and status"),
        (name = "products", description = "Product catalogue"),
    )
)]
pub struct ApiDoc;

fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid_request(format!("Malformed JSON body: {}", err)).into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid_request(format!("Malformed query string: {}", err)).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid_request(format!("Malformed path parameter: {}", err)).into()
}

/// Mount the `/api` routes. `stats` is registered before `{id}` so it is not
/// taken for an order id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/orders")
                        .route("", web::get().to(orders::list_orders))
                        .route("", web::post().to(orders::create_order))
                        .route("/stats", web::get().to(orders::order_stats))
                        .route("/{id}", web::get().to(orders::get_order))
                        .route("/{id}/status", web::put().to(orders::update_order_status)),
                )
                .service(
                    web::scope("/products")
                        .route("", web::get().to(products::list_products))
                        .route("", web::post().to(products::create_product)),
                ),
        );
}
