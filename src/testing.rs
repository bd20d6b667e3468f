//! In-memory repositories for service and handler tests.
//!
//! All three ports share one store so foreign keys and soft deletes behave
//! across entities the way the Postgres tables do.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::category::{Category, CategoryPatch, CategoryTree, NewCategory};
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, Order, OrderDetail, OrderPatch};
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::{CategoryRepository, OrderRepository, ProductRepository};
use crate::domain::product::{NewProduct, Product, ProductPatch};

struct Row<T> {
    value: T,
    deleted: bool,
}

impl<T> Row<T> {
    fn live(value: T) -> Self {
        Self {
            value,
            deleted: false,
        }
    }
}

#[derive(Default)]
struct Store {
    categories: Vec<Row<Category>>,
    products: Vec<Row<Product>>,
    orders: Vec<Row<Order>>,
}

fn fk_violation(table: &str) -> DomainError {
    DomainError::Storage(format!("foreign key violation on {table}"))
}

fn page_of<T: Clone>(items: Vec<T>, page: PageRequest) -> ListResult<T> {
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect();
    ListResult { items, total }
}

impl Store {
    fn live_category(&self, id: Uuid) -> Option<&Category> {
        self.categories
            .iter()
            .find(|r| !r.deleted && r.value.id == id)
            .map(|r| &r.value)
    }

    fn live_product(&self, id: Uuid) -> Option<&Product> {
        self.products
            .iter()
            .find(|r| !r.deleted && r.value.id == id)
            .map(|r| &r.value)
    }

    fn category_exists(&self, id: Uuid) -> bool {
        self.categories.iter().any(|r| r.value.id == id)
    }

    /// Orders may only reference live products.
    fn require_live_product(&self, id: Uuid) -> Result<(), DomainError> {
        match self.live_product(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::InvalidInput(format!(
                "product {id} does not exist"
            ))),
        }
    }

    fn first_product_name(&self, category_id: Uuid) -> Option<String> {
        self.products
            .iter()
            .find(|r| !r.deleted && r.value.category_id == category_id)
            .map(|r| r.value.name.clone())
    }

    fn tree(&self, node: &Category) -> CategoryTree {
        let live: Vec<Category> = self
            .categories
            .iter()
            .filter(|r| !r.deleted)
            .map(|r| r.value.clone())
            .collect();
        let sibling_count = live
            .iter()
            .filter(|c| c.parent_id == node.parent_id)
            .count() as i64;
        let children: Vec<Category> = live
            .into_iter()
            .filter(|c| c.parent_id == Some(node.id))
            .collect();
        let product_names: HashMap<Uuid, String> = children
            .iter()
            .filter_map(|c| self.first_product_name(c.id).map(|n| (c.id, n)))
            .collect();

        CategoryTree::assemble(
            node.clone(),
            self.first_product_name(node.id),
            sibling_count,
            &children,
            &product_names,
        )
    }

    fn detail(&self, order: &Order) -> Option<OrderDetail> {
        let product = self.live_product(order.product_id)?;
        let category = self.live_category(product.category_id)?;
        Some(OrderDetail::assemble(
            order.clone(),
            product.clone(),
            category.clone(),
        ))
    }
}

/// Shared in-memory store; clones see the same rows.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    inner: Arc<Mutex<Store>>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.inner.lock().expect("store mutex poisoned")
    }

    pub(crate) fn seed_category(&self, name: &str, parent_id: Option<Uuid>) -> Uuid {
        CategoryRepository::create(
            self,
            NewCategory {
                name: name.to_string(),
                parent_id,
            },
        )
        .expect("seed category failed")
    }

    pub(crate) fn seed_product(&self, name: &str, price: i64, category_id: Uuid) -> Uuid {
        ProductRepository::create(
            self,
            NewProduct {
                name: name.to_string(),
                price,
                category_id,
            },
        )
        .expect("seed product failed")
    }
}

impl ProductRepository for InMemoryStore {
    fn create(&self, input: NewProduct) -> Result<Uuid, DomainError> {
        let mut store = self.lock();
        if !store.category_exists(input.category_id) {
            return Err(fk_violation("products"));
        }
        let now = Utc::now();
        let id = Uuid::new_v4();
        store.products.push(Row::live(Product {
            id,
            name: input.name,
            price: input.price,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        }));
        Ok(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.lock().live_product(id).cloned())
    }

    fn list(&self, page: PageRequest) -> Result<ListResult<Product>, DomainError> {
        let store = self.lock();
        let live = store
            .products
            .iter()
            .filter(|r| !r.deleted)
            .map(|r| r.value.clone())
            .collect();
        Ok(page_of(live, page))
    }

    fn update(&self, id: Uuid, patch: &ProductPatch) -> Result<usize, DomainError> {
        let mut store = self.lock();
        if let Some(category_id) = patch.category_id {
            if !store.category_exists(category_id) {
                return Err(fk_violation("products"));
            }
        }
        let Some(row) = store
            .products
            .iter_mut()
            .find(|r| !r.deleted && r.value.id == id)
        else {
            return Ok(0);
        };
        if let Some(name) = &patch.name {
            row.value.name = name.clone();
        }
        if let Some(price) = patch.price {
            row.value.price = price;
        }
        if let Some(category_id) = patch.category_id {
            row.value.category_id = category_id;
        }
        row.value.updated_at = Utc::now();
        Ok(1)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut store = self.lock();
        for row in store.products.iter_mut().filter(|r| r.value.id == id) {
            row.deleted = true;
        }
        Ok(())
    }
}

impl CategoryRepository for InMemoryStore {
    fn create(&self, input: NewCategory) -> Result<Uuid, DomainError> {
        let mut store = self.lock();
        if let Some(parent_id) = input.parent_id {
            if !store.category_exists(parent_id) {
                return Err(fk_violation("categories"));
            }
        }
        let now = Utc::now();
        let id = Uuid::new_v4();
        store.categories.push(Row::live(Category {
            id,
            name: input.name,
            parent_id: input.parent_id,
            created_at: now,
            updated_at: now,
        }));
        Ok(id)
    }

    fn find_tree(&self, id: Uuid) -> Result<Option<CategoryTree>, DomainError> {
        let store = self.lock();
        Ok(store.live_category(id).map(|node| store.tree(node)))
    }

    fn list(&self, page: PageRequest) -> Result<ListResult<CategoryTree>, DomainError> {
        let store = self.lock();
        let trees = store
            .categories
            .iter()
            .filter(|r| !r.deleted)
            .map(|r| store.tree(&r.value))
            .collect();
        Ok(page_of(trees, page))
    }

    fn update(&self, id: Uuid, patch: &CategoryPatch) -> Result<usize, DomainError> {
        let mut store = self.lock();
        if let Some(Some(parent_id)) = patch.parent_id {
            if !store.category_exists(parent_id) {
                return Err(fk_violation("categories"));
            }
        }
        let Some(row) = store
            .categories
            .iter_mut()
            .find(|r| !r.deleted && r.value.id == id)
        else {
            return Ok(0);
        };
        if let Some(name) = &patch.name {
            row.value.name = name.clone();
        }
        if let Some(parent_id) = patch.parent_id {
            row.value.parent_id = parent_id;
        }
        row.value.updated_at = Utc::now();
        Ok(1)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut store = self.lock();
        for row in store.categories.iter_mut().filter(|r| r.value.id == id) {
            row.deleted = true;
        }
        Ok(())
    }
}

impl OrderRepository for InMemoryStore {
    fn create(&self, input: NewOrder) -> Result<Uuid, DomainError> {
        let mut store = self.lock();
        store.require_live_product(input.product_id)?;
        let now = Utc::now();
        let id = Uuid::new_v4();
        store.orders.push(Row::live(Order {
            id,
            description: input.description,
            product_id: input.product_id,
            created_at: now,
            updated_at: now,
        }));
        Ok(id)
    }

    fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, DomainError> {
        let store = self.lock();
        Ok(store
            .orders
            .iter()
            .find(|r| !r.deleted && r.value.id == id)
            .and_then(|r| store.detail(&r.value)))
    }

    fn list(&self, page: PageRequest) -> Result<ListResult<OrderDetail>, DomainError> {
        let store = self.lock();
        let details = store
            .orders
            .iter()
            .filter(|r| !r.deleted)
            .filter_map(|r| store.detail(&r.value))
            .collect();
        Ok(page_of(details, page))
    }

    fn update(&self, id: Uuid, patch: &OrderPatch) -> Result<usize, DomainError> {
        let mut store = self.lock();
        if let Some(product_id) = patch.product_id {
            store.require_live_product(product_id)?;
        }
        let Some(row) = store
            .orders
            .iter_mut()
            .find(|r| !r.deleted && r.value.id == id)
        else {
            return Ok(0);
        };
        if let Some(description) = &patch.description {
            row.value.description = description.clone();
        }
        if let Some(product_id) = patch.product_id {
            row.value.product_id = product_id;
        }
        row.value.updated_at = Utc::now();
        Ok(1)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut store = self.lock();
        for row in store.orders.iter_mut().filter(|r| r.value.id == id) {
            row.deleted = true;
        }
        Ok(())
    }
}
