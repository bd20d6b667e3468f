use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{categories, orders, products};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog Service",
        version = "0.1.0",
        description = "CRUD over products, categories and orders. Every route is \
            also served under `/v1`, where a `Password` header is required."
    ),
    paths(
        products::create_product,
        products::get_product,
        products::list_products,
        products::update_product,
        products::delete_product,
        categories::create_category,
        categories::get_category,
        categories::list_categories,
        categories::update_category,
        categories::delete_category,
        orders::create_order,
        orders::get_order,
        orders::list_orders,
        orders::update_order,
        orders::delete_order,
    ),
    components(schemas(
        products::CreateProductRequest,
        products::UpdateProductRequest,
        products::ProductResponse,
        products::ListProductsResponse,
        categories::CreateCategoryRequest,
        categories::UpdateCategoryRequest,
        categories::CategoryChildResponse,
        categories::CategoryResponse,
        categories::ListCategoriesResponse,
        orders::CreateOrderRequest,
        orders::UpdateOrderRequest,
        orders::OrderCategoryResponse,
        orders::OrderProductResponse,
        orders::OrderResponse,
        orders::ListOrdersResponse,
    )),
    tags(
        (name = "products"),
        (name = "categories"),
        (name = "orders"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi())
}
