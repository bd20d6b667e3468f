use std::sync::Arc;

use crate::application::{CategoryService, OrderService, ProductService};
use crate::db::DbPool;
use crate::domain::ports::{CategoryRepository, OrderRepository, ProductRepository};
use crate::infrastructure::{DieselCategoryRepository, DieselOrderRepository, DieselProductRepository};

/// Services shared by every worker through `web::Data`.
pub struct AppState {
    pub products: ProductService,
    pub categories: CategoryService,
    pub orders: OrderService,
}

impl AppState {
    /// Wires the Diesel repositories over one shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self::from_repositories(
            Arc::new(DieselProductRepository::new(pool.clone())),
            Arc::new(DieselCategoryRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool)),
        )
    }

    pub fn from_repositories(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            products: ProductService::new(products),
            categories: CategoryService::new(categories),
            orders: OrderService::new(orders),
        }
    }
}
