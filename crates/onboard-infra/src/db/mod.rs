//! SQLite-backed storage.

pub mod avatar_cache;
pub mod pool;
pub mod schema;

pub use avatar_cache::SqliteAvatarCache;
pub use pool::{init_db_pool, DbPool};
