use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::order::{CategorySummary, NewOrder, OrderDetail, OrderPatch, ProductSummary};
use crate::errors::AppError;
use crate::AppState;

use super::{timestamp, ListParams};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 1000))]
    pub description: String,
    pub product_id: Uuid,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(r: CreateOrderRequest) -> Self {
        NewOrder {
            description: r.description,
            product_id: r.product_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, max = 1000))]
    pub description: Option<String>,
    pub product_id: Option<Uuid>,
}

impl From<UpdateOrderRequest> for OrderPatch {
    fn from(r: UpdateOrderRequest) -> Self {
        OrderPatch {
            description: r.description,
            product_id: r.product_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderCategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

impl From<CategorySummary> for OrderCategoryResponse {
    fn from(c: CategorySummary) -> Self {
        OrderCategoryResponse {
            id: c.id,
            name: c.name,
            parent_id: c.parent_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub category: OrderCategoryResponse,
}

impl From<ProductSummary> for OrderProductResponse {
    fn from(p: ProductSummary) -> Self {
        OrderProductResponse {
            id: p.id,
            name: p.name,
            price: p.price,
            category: p.category.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub description: String,
    pub product: OrderProductResponse,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderDetail> for OrderResponse {
    fn from(o: OrderDetail) -> Self {
        OrderResponse {
            id: o.id,
            description: o.description,
            product: o.product.into(),
            created_at: timestamp(o.created_at),
            updated_at: timestamp(o.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListOrdersResponse {
    pub count: i64,
    pub orders: Vec<OrderResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /order
///
/// Creates an order for an existing product and returns it joined with the
/// product and the product's category.
#[utoipa::path(
    post,
    path = "/order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid payload, or product missing or deleted"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let order = web::block(move || state.orders.create_order(body.into())).await??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /order/{id}
///
/// 404 also covers an order whose product or category was deleted.
#[utoipa::path(
    get,
    path = "/order/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let order = web::block(move || state.orders.get_order(id)).await??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /order
#[utoipa::path(
    get,
    path = "/order",
    params(ListParams),
    responses(
        (status = 200, description = "One page of orders", body = ListOrdersResponse),
        (status = 400, description = "Negative limit or offset"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let page = query.page()?;

    let result = web::block(move || state.orders.list_orders(page)).await??;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        count: result.total,
        orders: result.items.into_iter().map(Into::into).collect(),
    }))
}

/// PUT /order/{id}
#[utoipa::path(
    put,
    path = "/order/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid payload, or product missing or deleted"),
        (status = 500, description = "No rows were updated, or internal error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let order = web::block(move || state.orders.update_order(id, body.into())).await??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /order/{id}
#[utoipa::path(
    delete,
    path = "/order/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 204, description = "Order deleted, or already gone"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || state.orders.delete_order(id)).await??;

    Ok(HttpResponse::NoContent().finish())
}
