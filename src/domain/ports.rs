use uuid::Uuid;

use super::category::{CategoryPatch, CategoryTree, NewCategory};
use super::errors::DomainError;
use super::order::{NewOrder, OrderDetail, OrderPatch};
use super::pagination::{ListResult, PageRequest};
use super::product::{NewProduct, Product, ProductPatch};

/// Lookups return `Ok(None)` for a missing or soft-deleted row. `update`
/// returns the number of rows it touched and leaves interpreting zero to
/// the caller. `delete` is idempotent.
pub trait ProductRepository: Send + Sync + 'static {
    fn create(&self, input: NewProduct) -> Result<Uuid, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn list(&self, page: PageRequest) -> Result<ListResult<Product>, DomainError>;
    fn update(&self, id: Uuid, patch: &ProductPatch) -> Result<usize, DomainError>;
    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

pub trait CategoryRepository: Send + Sync + 'static {
    fn create(&self, input: NewCategory) -> Result<Uuid, DomainError>;
    fn find_tree(&self, id: Uuid) -> Result<Option<CategoryTree>, DomainError>;
    fn list(&self, page: PageRequest) -> Result<ListResult<CategoryTree>, DomainError>;
    fn update(&self, id: Uuid, patch: &CategoryPatch) -> Result<usize, DomainError>;
    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, input: NewOrder) -> Result<Uuid, DomainError>;
    fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, DomainError>;
    fn list(&self, page: PageRequest) -> Result<ListResult<OrderDetail>, DomainError>;
    fn update(&self, id: Uuid, patch: &OrderPatch) -> Result<usize, DomainError>;
    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
