//! Shared `PostgreSQL` connection pool for the service's own state.
//!
//! The status registry and the workspace store both run on a pool built
//! here. Client databases never go through it; they get one short-lived
//! connection per request.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::time::Duration;

/// Connection pool type used by the `PostgreSQL` adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Pool size used when none is configured.
pub const DEFAULT_MAX_POOL_SIZE: u32 = 4;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds a pool with [`DEFAULT_MAX_POOL_SIZE`] connections.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn init_pool(database_url: &str) -> Result<PgPool, PoolError> {
    init_pool_with_size(database_url, DEFAULT_MAX_POOL_SIZE)
}

/// Builds a pool holding at most `max_size` connections (minimum one).
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn init_pool_with_size(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size.max(1))
        .connection_timeout(CONNECTION_TIMEOUT)
        .build(manager)
}
