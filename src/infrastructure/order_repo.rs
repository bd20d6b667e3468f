use diesel::dsl::{exists, sql};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text, Uuid as SqlUuid};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderDetail, OrderPatch};
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::OrderRepository;
use crate::schema::{categories, orders, products};

use super::models::{CategoryRow, OrderRow, ProductRow};
use super::named_params::{SqlValue, UpdateStatement};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// WHERE guard for product swaps: the new product must be live.
const LIVE_PRODUCT_GUARD: &str =
    "EXISTS (SELECT 1 FROM products p WHERE p.id = :product_id AND p.deleted_at IS NULL)";

fn unknown_product(id: Uuid) -> DomainError {
    DomainError::InvalidInput(format!("product {id} does not exist"))
}

fn to_detail((order, product, category): (OrderRow, ProductRow, CategoryRow)) -> OrderDetail {
    OrderDetail::assemble(order.into(), product.into(), category.into())
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, input: NewOrder) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        // INSERT ... SELECT: a missing or soft-deleted product inserts nothing.
        let id = Uuid::new_v4();
        let live_product = products::table
            .filter(products::id.eq(input.product_id))
            .filter(products::deleted_at.is_null())
            .select((
                id.into_sql::<SqlUuid>(),
                input.description.as_str().into_sql::<Text>(),
                products::id,
            ));
        let inserted = diesel::insert_into(orders::table)
            .values(live_product)
            .into_columns((orders::id, orders::description, orders::product_id))
            .execute(&mut conn)?;

        if inserted == 0 {
            return Err(unknown_product(input.product_id));
        }
        Ok(id)
    }

    fn find_detail(&self, id: Uuid) -> Result<Option<OrderDetail>, DomainError> {
        let mut conn = self.pool.get()?;

        // A soft-deleted product or category drops the whole row.
        let row = orders::table
            .inner_join(products::table.inner_join(categories::table))
            .filter(orders::id.eq(id))
            .filter(orders::deleted_at.is_null())
            .filter(products::deleted_at.is_null())
            .filter(categories::deleted_at.is_null())
            .select((
                OrderRow::as_select(),
                ProductRow::as_select(),
                CategoryRow::as_select(),
            ))
            .first::<(OrderRow, ProductRow, CategoryRow)>(&mut conn)
            .optional()?;

        Ok(row.map(to_detail))
    }

    fn list(&self, page: PageRequest) -> Result<ListResult<OrderDetail>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<(i64, OrderRow, ProductRow, CategoryRow)> = orders::table
            .inner_join(products::table.inner_join(categories::table))
            .filter(orders::deleted_at.is_null())
            .filter(products::deleted_at.is_null())
            .filter(categories::deleted_at.is_null())
            .select((
                sql::<BigInt>("COUNT(*) OVER()"),
                OrderRow::as_select(),
                ProductRow::as_select(),
                CategoryRow::as_select(),
            ))
            .order(orders::seq.asc())
            .limit(page.limit)
            .offset(page.offset)
            .load(&mut conn)?;

        let total = match rows.first() {
            Some((count, ..)) => *count,
            None if page.offset > 0 => orders::table
                .inner_join(products::table.inner_join(categories::table))
                .filter(orders::deleted_at.is_null())
                .filter(products::deleted_at.is_null())
                .filter(categories::deleted_at.is_null())
                .count()
                .get_result(&mut conn)?,
            None => 0,
        };

        Ok(ListResult {
            items: rows
                .into_iter()
                .map(|(_, o, p, c)| to_detail((o, p, c)))
                .collect(),
            total,
        })
    }

    fn update(&self, id: Uuid, patch: &OrderPatch) -> Result<usize, DomainError> {
        let mut statement = UpdateStatement::new("orders")
            .set_opt("description", patch.description.clone(), SqlValue::Text)
            .set_opt("product_id", patch.product_id, SqlValue::Uuid);
        if patch.product_id.is_some() {
            statement = statement.guard(LIVE_PRODUCT_GUARD);
        }
        let statement = statement.build(id)?;

        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            if let Some(product_id) = patch.product_id {
                let live: bool = diesel::select(exists(
                    products::table
                        .filter(products::id.eq(product_id))
                        .filter(products::deleted_at.is_null()),
                ))
                .get_result(conn)?;
                if !live {
                    return Err(unknown_product(product_id));
                }
            }
            Ok(statement.execute(conn)?)
        })
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(
            orders::table
                .filter(orders::id.eq(id))
                .filter(orders::deleted_at.is_null()),
        )
        .set(orders::deleted_at.eq(diesel::dsl::now))
        .execute(&mut conn)?;

        Ok(())
    }
}
