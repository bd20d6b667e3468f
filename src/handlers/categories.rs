use actix_web::{web, HttpResponse};
use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::category::{CategoryChild, CategoryPatch, CategoryTree, NewCategory};
use crate::errors::AppError;
use crate::AppState;

use super::{timestamp, ListParams};

/// Reads a parent reference where both `null` and `""` mean "no parent".
fn parent_ref<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => Uuid::parse_str(raw).map(Some).map_err(de::Error::custom),
    }
}

/// Like [`parent_ref`], but keeps "absent" (`None`) apart from "cleared"
/// (`Some(None)`). Serde only calls this when the key is present.
fn parent_patch<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    parent_ref(deserializer).map(Some)
}

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Omit, send `null` or `""` to create a root category.
    #[serde(default, deserialize_with = "parent_ref")]
    pub parent_id: Option<Uuid>,
}

impl From<CreateCategoryRequest> for NewCategory {
    fn from(r: CreateCategoryRequest) -> Self {
        NewCategory {
            name: r.name,
            parent_id: r.parent_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// `null` or `""` detaches the category and makes it a root.
    #[serde(default, deserialize_with = "parent_patch")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,
}

impl From<UpdateCategoryRequest> for CategoryPatch {
    fn from(r: UpdateCategoryRequest) -> Self {
        CategoryPatch {
            name: r.name,
            parent_id: r.parent_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryChildResponse {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub product_name: Option<String>,
}

impl From<CategoryChild> for CategoryChildResponse {
    fn from(c: CategoryChild) -> Self {
        CategoryChildResponse {
            id: c.id,
            name: c.name,
            parent_id: c.parent_id,
            product_name: c.product_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    /// One product filed directly under this category.
    pub product_name: Option<String>,
    /// Live categories sharing this one's parent, itself included.
    pub sibling_count: i64,
    pub children: Vec<CategoryChildResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CategoryTree> for CategoryResponse {
    fn from(t: CategoryTree) -> Self {
        CategoryResponse {
            id: t.id,
            name: t.name,
            parent_id: t.parent_id,
            product_name: t.product_name,
            sibling_count: t.sibling_count,
            children: t.children.into_iter().map(Into::into).collect(),
            created_at: timestamp(t.created_at),
            updated_at: timestamp(t.updated_at),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListCategoriesResponse {
    pub count: i64,
    pub categories: Vec<CategoryResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/category",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Unknown parent, or internal error"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let tree = web::block(move || state.categories.create_category(body.into())).await??;

    Ok(HttpResponse::Created().json(CategoryResponse::from(tree)))
}

#[utoipa::path(
    get,
    path = "/category/{id}",
    params(
        ("id" = Uuid, Path, description = "Category UUID"),
    ),
    responses(
        (status = 200, description = "Category with its direct children", body = CategoryResponse),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "categories"
)]
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let tree = web::block(move || state.categories.get_category(id)).await??;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(tree)))
}

#[utoipa::path(
    get,
    path = "/category",
    params(ListParams),
    responses(
        (status = 200, description = "One page of categories", body = ListCategoriesResponse),
        (status = 400, description = "Negative limit or offset"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let page = query.page()?;

    let result = web::block(move || state.categories.list_categories(page)).await??;

    Ok(HttpResponse::Ok().json(ListCategoriesResponse {
        count: result.total,
        categories: result.items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/category/{id}",
    params(
        ("id" = Uuid, Path, description = "Category UUID"),
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid payload or self-parenting"),
        (status = 500, description = "No rows were updated, or internal error"),
    ),
    tag = "categories"
)]
pub async fn update_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let tree =
        web::block(move || state.categories.update_category(id, body.into())).await??;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(tree)))
}

#[utoipa::path(
    delete,
    path = "/category/{id}",
    params(
        ("id" = Uuid, Path, description = "Category UUID"),
    ),
    responses(
        (status = 204, description = "Category deleted, or already gone"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || state.categories.delete_category(id)).await??;

    Ok(HttpResponse::NoContent().finish())
}
