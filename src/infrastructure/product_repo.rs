use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::schema::products;

use super::models::{NewProductRow, ProductRow};
use super::named_params::{SqlValue, UpdateStatement};

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn create(&self, input: NewProduct) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        let id = Uuid::new_v4();
        diesel::insert_into(products::table)
            .values(&NewProductRow {
                id,
                name: &input.name,
                price: input.price,
                category_id: input.category_id,
            })
            .execute(&mut conn)?;

        Ok(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .filter(products::id.eq(id))
            .filter(products::deleted_at.is_null())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Product::from))
    }

    fn list(&self, page: PageRequest) -> Result<ListResult<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<(i64, ProductRow)> = products::table
            .filter(products::deleted_at.is_null())
            .select((sql::<BigInt>("COUNT(*) OVER()"), ProductRow::as_select()))
            .order(products::seq.asc())
            .limit(page.limit)
            .offset(page.offset)
            .load(&mut conn)?;

        // The window count rides on the page rows; past the last page there
        // are none, so count separately.
        let total = match rows.first() {
            Some((count, _)) => *count,
            None if page.offset > 0 => products::table
                .filter(products::deleted_at.is_null())
                .count()
                .get_result(&mut conn)?,
            None => 0,
        };

        Ok(ListResult {
            items: rows.into_iter().map(|(_, r)| r.into()).collect(),
            total,
        })
    }

    fn update(&self, id: Uuid, patch: &ProductPatch) -> Result<usize, DomainError> {
        let statement = UpdateStatement::new("products")
            .set_opt("name", patch.name.clone(), SqlValue::Text)
            .set_opt("price", patch.price, SqlValue::BigInt)
            .set_opt("category_id", patch.category_id, SqlValue::Uuid)
            .build(id)?;

        let mut conn = self.pool.get()?;
        Ok(statement.execute(&mut conn)?)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(
            products::table
                .filter(products::id.eq(id))
                .filter(products::deleted_at.is_null()),
        )
        .set(products::deleted_at.eq(diesel::dsl::now))
        .execute(&mut conn)?;

        Ok(())
    }
}
