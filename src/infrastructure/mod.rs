pub mod category_repo;
pub mod models;
pub mod named_params;
pub mod order_repo;
pub mod product_repo;

#[cfg(test)]
pub(crate) mod test_support;

use crate::domain::errors::DomainError;

pub use category_repo::DieselCategoryRepository;
pub use order_repo::DieselOrderRepository;
pub use product_repo::DieselProductRepository;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}
