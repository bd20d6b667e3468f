use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product, ProductPatch};

pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    /// Inserts the product and reads it back.
    pub fn create_product(&self, input: NewProduct) -> Result<Product, DomainError> {
        let id = self.repo.create(input)?;
        log::debug!("created product {}", id);
        self.get_product(id)
    }

    pub fn get_product(&self, id: Uuid) -> Result<Product, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("product"))
    }

    pub fn list_products(&self, page: PageRequest) -> Result<ListResult<Product>, DomainError> {
        self.repo.list(page)
    }

    /// Applies the patch and returns the updated product. Zero affected rows
    /// is reported as [`DomainError::UpdateNoop`].
    pub fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Product, DomainError> {
        if patch.is_empty() {
            return Err(DomainError::InvalidInput(
                "at least one field must be provided".to_string(),
            ));
        }
        if self.repo.update(id, &patch)? == 0 {
            return Err(DomainError::UpdateNoop);
        }
        log::debug!("updated product {}", id);
        self.get_product(id)
    }

    pub fn delete_product(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete(id)?;
        log::debug!("deleted product {}", id);
        Ok(())
    }
}
