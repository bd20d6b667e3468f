//! Named-placeholder statements.
//!
//! Update paths describe their SQL as a template with `:name` placeholders
//! plus a name → value map. [`replace_query_params`] rewrites the template to
//! Postgres positional markers (`$1`, `$2`, ...) and returns the arguments in
//! the order the placeholders first appear in the text, so statement and
//! arguments always line up whatever order the map iterates in.

use std::collections::HashMap;

use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// A value that can be bound to a rewritten statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    BigInt(i64),
    Uuid(Uuid),
    NullableUuid(Option<Uuid>),
}

/// A statement using positional markers and its arguments in marker order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl BoundStatement {
    /// Runs the statement and returns the number of affected rows.
    pub fn execute(self, conn: &mut PgConnection) -> QueryResult<usize> {
        let mut query = diesel::sql_query(self.sql).into_boxed::<Pg>();
        for arg in self.args {
            query = match arg {
                SqlValue::Text(v) => query.bind::<Text, _>(v),
                SqlValue::BigInt(v) => query.bind::<BigInt, _>(v),
                SqlValue::Uuid(v) => query.bind::<diesel::sql_types::Uuid, _>(v),
                SqlValue::NullableUuid(v) => {
                    query.bind::<Nullable<diesel::sql_types::Uuid>, _>(v)
                }
            };
        }
        query.execute(conn)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Rewrites `:name` placeholders in `template` into `$n` markers.
///
/// A name seen again reuses its first marker. `::` casts and anything inside
/// single-quoted literals are left alone. Entries of `params` that the
/// template never mentions are ignored; a placeholder with no entry is an
/// error.
pub fn replace_query_params(
    template: &str,
    params: &HashMap<String, SqlValue>,
) -> Result<BoundStatement, DomainError> {
    let mut sql = String::with_capacity(template.len());
    let mut args = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut in_literal = false;

    let mut chars = template.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if in_literal {
            sql.push(c);
            if c == '\'' {
                in_literal = false;
            }
            continue;
        }

        match c {
            '\'' => {
                in_literal = true;
                sql.push(c);
            }
            ':' => match chars.peek() {
                Some(&(_, ':')) => {
                    sql.push_str("::");
                    chars.next();
                }
                Some(&(start, next)) if is_ident_start(next) => {
                    let mut end = start;
                    while let Some(&(j, ch)) = chars.peek() {
                        if !is_ident_char(ch) {
                            break;
                        }
                        end = j + ch.len_utf8();
                        chars.next();
                    }
                    let name = &template[start..end];
                    let position = match positions.get(name) {
                        Some(&p) => p,
                        None => {
                            let value = params.get(name).ok_or_else(|| {
                                DomainError::Storage(format!(
                                    "no value bound for placeholder :{name}"
                                ))
                            })?;
                            args.push(value.clone());
                            positions.insert(name, args.len());
                            args.len()
                        }
                    };
                    sql.push('$');
                    sql.push_str(&position.to_string());
                }
                _ => sql.push(c),
            },
            _ => sql.push(c),
        }
    }

    Ok(BoundStatement { sql, args })
}

/// Compiles a typed patch into a parameterized soft-delete-aware UPDATE.
///
/// Column names come from code, never from request input.
#[derive(Debug)]
pub struct UpdateStatement {
    table: &'static str,
    columns: Vec<&'static str>,
    guards: Vec<&'static str>,
    params: HashMap<String, SqlValue>,
}

impl UpdateStatement {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
            guards: Vec::new(),
            params: HashMap::new(),
        }
    }

    pub fn set(mut self, column: &'static str, value: SqlValue) -> Self {
        if self.params.insert(column.to_string(), value).is_none() {
            self.columns.push(column);
        }
        self
    }

    /// Same as [`UpdateStatement::set`] but skips `None`.
    pub fn set_opt<T>(
        self,
        column: &'static str,
        value: Option<T>,
        wrap: fn(T) -> SqlValue,
    ) -> Self {
        match value {
            Some(v) => self.set(column, wrap(v)),
            None => self,
        }
    }

    /// Adds an extra `AND`ed condition to the WHERE clause. It may refer to
    /// any placeholder that a `set` call binds.
    pub fn guard(mut self, condition: &'static str) -> Self {
        self.guards.push(condition);
        self
    }

    pub fn template(&self) -> String {
        let mut assignments: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{c} = :{c}"))
            .collect();
        assignments.push("updated_at = now()".to_string());
        let mut conditions = vec!["id = :id", "deleted_at IS NULL"];
        conditions.extend(&self.guards);
        format!(
            "UPDATE {} SET {} WHERE {}",
            self.table,
            assignments.join(", "),
            conditions.join(" AND ")
        )
    }

    /// Produces the positional statement targeting the row with `id`.
    pub fn build(mut self, id: Uuid) -> Result<BoundStatement, DomainError> {
        if self.columns.is_empty() {
            return Err(DomainError::InvalidInput(
                "at least one field must be provided".to_string(),
            ));
        }
        let template = self.template();
        self.params.insert("id".to_string(), SqlValue::Uuid(id));
        replace_query_params(&template, &self.params)
    }
}
