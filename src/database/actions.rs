mod ingredients;
mod projections;
mod recipes;
mod relations;
mod shopping_list;
mod tags;
mod users;

pub use ingredients::*;
pub use projections::*;
pub use recipes::*;
pub use relations::*;
pub use shopping_list::*;
pub use tags::*;
pub use users::*;

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{config::Config, error::CatalogError};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Opens the catalog pool and brings the schema up to date.
pub async fn connect(config: &Config) -> Result<Pool<Sqlite>, CatalogError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        // an in-memory database disappears with its last connection
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    log::info!(
        "> Catalog ready ({} connection(s))",
        config.max_connections
    );

    Ok(pool)
}

/// Fails with `NotFound` unless `id` names a row of `table`.
pub(crate) async fn ensure_exists<'e, E>(
    table: &str,
    id: i32,
    what: &str,
    executor: E,
) -> Result<(), CatalogError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row: Option<(i32,)> = sqlx::query_as(&format!("SELECT id FROM {table} WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    match row {
        Some(_) => Ok(()),
        None => Err(CatalogError::not_found(format!("No {what} exists with id {id}"))),
    }
}
