use std::collections::HashMap;

use diesel::dsl::{count_star, sql};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::category::{Category, CategoryPatch, CategoryTree, NewCategory};
use crate::domain::errors::DomainError;
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::CategoryRepository;
use crate::schema::{categories, products};

use super::models::{CategoryRow, NewCategoryRow};
use super::named_params::{SqlValue, UpdateStatement};

pub struct DieselCategoryRepository {
    pool: DbPool,
}

impl DieselCategoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Live direct children of any of `parent_ids`, in insertion order.
fn load_children(conn: &mut PgConnection, parent_ids: &[Uuid]) -> QueryResult<Vec<Category>> {
    let rows = categories::table
        .filter(categories::parent_id.eq_any(parent_ids))
        .filter(categories::deleted_at.is_null())
        .select(CategoryRow::as_select())
        .order(categories::seq.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(Category::from).collect())
}

/// The name of one live product per category, the earliest one created.
fn load_product_names(
    conn: &mut PgConnection,
    category_ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, String>> {
    let rows: Vec<(Uuid, String)> = products::table
        .filter(products::category_id.eq_any(category_ids))
        .filter(products::deleted_at.is_null())
        .distinct_on(products::category_id)
        .select((products::category_id, products::name))
        .order((products::category_id, products::seq.asc()))
        .load(conn)?;
    Ok(rows.into_iter().collect())
}

/// Live categories per parent, keyed by parent (`None` for roots).
///
/// The root group is always loaded; it is a single extra row.
fn load_sibling_counts(
    conn: &mut PgConnection,
    parent_ids: &[Option<Uuid>],
) -> QueryResult<HashMap<Option<Uuid>, i64>> {
    let named: Vec<Uuid> = parent_ids.iter().flatten().copied().collect();

    let rows: Vec<(Option<Uuid>, i64)> = categories::table
        .filter(categories::deleted_at.is_null())
        .filter(
            categories::parent_id
                .eq_any(named)
                .or(categories::parent_id.is_null()),
        )
        .group_by(categories::parent_id)
        .select((categories::parent_id, count_star()))
        .load(conn)?;
    Ok(rows.into_iter().collect())
}

impl CategoryRepository for DieselCategoryRepository {
    fn create(&self, input: NewCategory) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        // A root goes in as SQL NULL, never as an empty or nil id.
        let id = Uuid::new_v4();
        diesel::insert_into(categories::table)
            .values(&NewCategoryRow {
                id,
                name: &input.name,
                parent_id: input.parent_id,
            })
            .execute(&mut conn)?;

        Ok(id)
    }

    fn find_tree(&self, id: Uuid) -> Result<Option<CategoryTree>, DomainError> {
        let mut conn = self.pool.get()?;

        // 1. The node itself
        let node = categories::table
            .filter(categories::id.eq(id))
            .filter(categories::deleted_at.is_null())
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(node) = node.map(Category::from) else {
            return Ok(None);
        };

        // 2. One product filed directly under it
        let product_name = products::table
            .filter(products::category_id.eq(node.id))
            .filter(products::deleted_at.is_null())
            .select(products::name)
            .order(products::seq.asc())
            .first::<String>(&mut conn)
            .optional()?;

        // 3. How many categories share its parent
        let sibling_count: i64 = categories::table
            .filter(categories::deleted_at.is_null())
            .filter(categories::parent_id.is_not_distinct_from(node.parent_id))
            .count()
            .get_result(&mut conn)?;

        // 4. Its direct children and one product name for each
        let children = load_children(&mut conn, &[node.id])?;
        let child_ids: Vec<Uuid> = children.iter().map(|c| c.id).collect();
        let product_names = load_product_names(&mut conn, &child_ids)?;

        Ok(Some(CategoryTree::assemble(
            node,
            product_name,
            sibling_count,
            &children,
            &product_names,
        )))
    }

    fn list(&self, page: PageRequest) -> Result<ListResult<CategoryTree>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<(i64, CategoryRow)> = categories::table
            .filter(categories::deleted_at.is_null())
            .select((sql::<BigInt>("COUNT(*) OVER()"), CategoryRow::as_select()))
            .order(categories::seq.asc())
            .limit(page.limit)
            .offset(page.offset)
            .load(&mut conn)?;

        let total = match rows.first() {
            Some((count, _)) => *count,
            None if page.offset > 0 => categories::table
                .filter(categories::deleted_at.is_null())
                .count()
                .get_result(&mut conn)?,
            None => 0,
        };
        if rows.is_empty() {
            return Ok(ListResult {
                items: Vec::new(),
                total,
            });
        }

        let nodes: Vec<Category> = rows.into_iter().map(|(_, r)| r.into()).collect();
        let node_ids: Vec<Uuid> = nodes.iter().map(|n| n.id).collect();
        let parent_ids: Vec<Option<Uuid>> = nodes.iter().map(|n| n.parent_id).collect();

        let children = load_children(&mut conn, &node_ids)?;
        let mut named_ids = node_ids;
        named_ids.extend(children.iter().map(|c| c.id));
        let product_names = load_product_names(&mut conn, &named_ids)?;
        let sibling_counts = load_sibling_counts(&mut conn, &parent_ids)?;

        let items = nodes
            .into_iter()
            .map(|node| {
                let product_name = product_names.get(&node.id).cloned();
                let sibling_count = sibling_counts.get(&node.parent_id).copied().unwrap_or(0);
                CategoryTree::assemble(
                    node,
                    product_name,
                    sibling_count,
                    &children,
                    &product_names,
                )
            })
            .collect();

        Ok(ListResult { items, total })
    }

    fn update(&self, id: Uuid, patch: &CategoryPatch) -> Result<usize, DomainError> {
        let statement = UpdateStatement::new("categories")
            .set_opt("name", patch.name.clone(), SqlValue::Text)
            .set_opt("parent_id", patch.parent_id, SqlValue::NullableUuid)
            .build(id)?;

        let mut conn = self.pool.get()?;
        Ok(statement.execute(&mut conn)?)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(
            categories::table
                .filter(categories::id.eq(id))
                .filter(categories::deleted_at.is_null()),
        )
        .set(categories::deleted_at.eq(diesel::dsl::now))
        .execute(&mut conn)?;

        Ok(())
    }
}
