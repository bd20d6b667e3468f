use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// How long a caller waits for a free pooled connection.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Applies a server-side `statement_timeout` to every pooled connection so
/// that no query can hold a request open indefinitely.
#[derive(Debug, Clone, Copy)]
struct StatementTimeout(Duration);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query(format!("SET statement_timeout = {}", self.0.as_millis()))
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn create_pool(
    database_url: &str,
    max_connections: u32,
    statement_timeout: Duration,
) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_connections)
        .connection_timeout(CONNECTION_TIMEOUT)
        .connection_customizer(Box::new(StatementTimeout(statement_timeout)))
        .build(manager)
}
