use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderDetail, OrderPatch};
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::OrderRepository;

pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    pub fn create_order(&self, input: NewOrder) -> Result<OrderDetail, DomainError> {
        let id = self.repo.create(input)?;
        log::debug!("created order {}", id);
        self.get_order(id)
    }

    /// Fails with `NotFound` when the order, its product or that product's
    /// category is missing or soft-deleted.
    pub fn get_order(&self, id: Uuid) -> Result<OrderDetail, DomainError> {
        self.repo.find_detail(id)?.ok_or(DomainError::NotFound("order"))
    }

    pub fn list_orders(&self, page: PageRequest) -> Result<ListResult<OrderDetail>, DomainError> {
        self.repo.list(page)
    }

    pub fn update_order(&self, id: Uuid, patch: OrderPatch) -> Result<OrderDetail, DomainError> {
        if patch.is_empty() {
            return Err(DomainError::InvalidInput(
                "at least one field must be provided".to_string(),
            ));
        }
        if self.repo.update(id, &patch)? == 0 {
            return Err(DomainError::UpdateNoop);
        }
        log::debug!("updated order {}", id);
        self.get_order(id)
    }

    pub fn delete_order(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete(id)?;
        log::debug!("deleted order {}", id);
        Ok(())
    }
}
