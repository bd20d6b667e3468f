use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::category::Category;
use super::product::Product;

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub description: String,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub description: String,
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub description: Option<String>,
    pub product_id: Option<Uuid>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.product_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub category: CategorySummary,
}

/// An order with the product it references and that product's category.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetail {
    pub id: Uuid,
    pub description: String,
    pub product: ProductSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderDetail {
    /// Nests one joined `orders × products × categories` row.
    pub fn assemble(order: Order, product: Product, category: Category) -> Self {
        debug_assert_eq!(order.product_id, product.id);
        debug_assert_eq!(product.category_id, category.id);

        Self {
            id: order.id,
            description: order.description,
            product: ProductSummary {
                id: product.id,
                name: product.name,
                price: product.price,
                category: CategorySummary {
                    id: category.id,
                    name: category.name,
                    parent_id: category.parent_id,
                },
            },
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
