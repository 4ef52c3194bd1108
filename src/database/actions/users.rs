use sqlx::{Pool, Sqlite};

use crate::{
    error::CatalogError,
    form::NewUser,
    schema::{Id, User},
};

pub async fn create_user(user: &NewUser, pool: &Pool<Sqlite>) -> Result<User, CatalogError> {
    user.validate()?;

    let row: User = sqlx::query_as(
        "
        INSERT INTO users (username, email, first_name, last_name)
        VALUES ($1, $2, $3, $4)
        RETURNING *
    ",
    )
    .bind(&user.username)
    .bind(user.email.to_lowercase())
    .bind(&user.first_name)
    .bind(&user.last_name)
    .fetch_one(pool)
    .await?;

    log::info!("> Registered user {} ({})", row.username, row.id);
    Ok(row)
}

pub async fn get_user(id: Id, pool: &Pool<Sqlite>) -> Result<User, CatalogError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| CatalogError::not_found(format!("No user exists with id {id}")))
}

pub async fn find_user_by_username(
    username: &str,
    pool: &Pool<Sqlite>,
) -> Result<Option<User>, CatalogError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Removes the user together with their recipes, relations and follows.
pub async fn delete_user(id: Id, pool: &Pool<Sqlite>) -> Result<(), CatalogError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(format!("No user exists with id {id}")));
    }

    log::info!("> Deleted user {id}");
    Ok(())
}
