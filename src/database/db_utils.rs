use diesel::{
    pg::PgConnection,
    r2d2::{ConnectionManager, Pool},
};

use crate::app::AppError;

embed_migrations!("migrations");

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Return a pool of connections to the hosted database.
///
/// # Example
/// ```
/// let pool = psql_connect_to_db(&config.database_url, config.database_pool_size)?;
/// ```
pub fn psql_connect_to_db(database_url: &str, max_size: u32) -> Result<PgPool, AppError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    Ok(Pool::builder().max_size(max_size).build(manager)?)
}

/// Applies every migration under `migrations/` that hasn't run yet.
pub fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let conn = pool.get()?;

    embedded_migrations::run(&*conn).map_err(AppError::internal)
}
