use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::errors::AppError;
use crate::AppState;

use super::{timestamp, ListParams};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Price in the smallest currency unit, e.g. cents.
    #[validate(range(min = 0))]
    pub price: i64,
    pub category_id: Uuid,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(r: CreateProductRequest) -> Self {
        NewProduct {
            name: r.name,
            price: r.price,
            category_id: r.category_id,
        }
    }
}

/// Only the fields present in the body are changed.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    pub category_id: Option<Uuid>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(r: UpdateProductRequest) -> Self {
        ProductPatch {
            name: r.name,
            price: r.price,
            category_id: r.category_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub category_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            price: p.price,
            category_id: p.category_id,
            created_at: timestamp(p.created_at),
            updated_at: timestamp(p.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListProductsResponse {
    /// Live products in total, not just on this page.
    pub count: i64,
    pub products: Vec<ProductResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/product",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let product = web::block(move || state.products.create_product(body.into())).await??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let product = web::block(move || state.products.get_product(id)).await??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

#[utoipa::path(
    get,
    path = "/product",
    params(ListParams),
    responses(
        (status = 200, description = "One page of products", body = ListProductsResponse),
        (status = 400, description = "Negative limit or offset"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let page = query.page()?;

    let result = web::block(move || state.products.list_products(page)).await??;

    Ok(HttpResponse::Ok().json(ListProductsResponse {
        count: result.total,
        products: result.items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/product/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "No rows were updated, or internal error"),
    ),
    tag = "products"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let product = web::block(move || state.products.update_product(id, body.into())).await??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

#[utoipa::path(
    delete,
    path = "/product/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 204, description = "Product deleted, or already gone"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || state.products.delete_product(id)).await??;

    Ok(HttpResponse::NoContent().finish())
}
