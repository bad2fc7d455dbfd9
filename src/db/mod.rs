//! Database connection pool and schema migrations.
//!
//! Provides async PostgreSQL connection pooling using diesel_async with bb8.

pub mod migrate;
mod pool;

pub use pool::{AsyncDbPool, MIGRATIONS, establish_async_connection_pool, migration_database_url};
