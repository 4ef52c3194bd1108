//! Favorites, shopping cart entries and follows.
//!
//! All three are a unique `(user_id, target)` pair in their own table, so the
//! add/remove/exists logic is written once against [`Relation`] and the
//! per-kind functions at the bottom only pick the projection they return.

use sqlx::{Pool, Sqlite};

use crate::{
    authentication::session::Viewer,
    constants::{ALREADY_EXISTS, SELF_SUBSCRIPTION},
    error::CatalogError,
    schema::{Id, RecipeSummary, UserWithRecipes},
};

use super::{ensure_exists, get_recipe_summary, get_user_with_recipes};

pub trait Relation {
    /// Human readable name used in error messages
    const NAME: &'static str;
    const TABLE: &'static str;
    const TARGET_COLUMN: &'static str;
    const TARGET_TABLE: &'static str;
    const TARGET_NAME: &'static str;

    fn check_pair(_subject: Id, _target: Id) -> Result<(), CatalogError> {
        Ok(())
    }
}

pub struct Favorite;

impl Relation for Favorite {
    const NAME: &'static str = "favorite";
    const TABLE: &'static str = "favorites";
    const TARGET_COLUMN: &'static str = "recipe_id";
    const TARGET_TABLE: &'static str = "recipes";
    const TARGET_NAME: &'static str = "recipe";
}

pub struct ShoppingCart;

impl Relation for ShoppingCart {
    const NAME: &'static str = "shopping cart entry";
    const TABLE: &'static str = "shopping_cart";
    const TARGET_COLUMN: &'static str = "recipe_id";
    const TARGET_TABLE: &'static str = "recipes";
    const TARGET_NAME: &'static str = "recipe";
}

pub struct Follow;

impl Relation for Follow {
    const NAME: &'static str = "subscription";
    const TABLE: &'static str = "follows";
    const TARGET_COLUMN: &'static str = "author_id";
    const TARGET_TABLE: &'static str = "users";
    const TARGET_NAME: &'static str = "user";

    fn check_pair(subject: Id, target: Id) -> Result<(), CatalogError> {
        if subject == target {
            return Err(CatalogError::validation(format!(
                "Unable to subscribe to yourself: {SELF_SUBSCRIPTION}"
            )));
        }
        Ok(())
    }
}

/// Inserts the pair. A pair that is already present, including one inserted
/// by a concurrent request, fails with `Validation("... already exists")`.
///
/// The insert is a single statement, so racing callers queue on the write
/// lock instead of failing to upgrade a read lock.
pub async fn add_relation<R: Relation>(
    subject: Id,
    target: Id,
    pool: &Pool<Sqlite>,
) -> Result<(), CatalogError> {
    R::check_pair(subject, target)?;

    ensure_exists("users", subject, "user", pool).await?;
    ensure_exists(R::TARGET_TABLE, target, R::TARGET_NAME, pool).await?;

    // a target deleted in between trips the foreign key and reads as NotFound
    let result = sqlx::query(&format!(
        "INSERT INTO {} (user_id, {}) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        R::TABLE,
        R::TARGET_COLUMN
    ))
    .bind(subject)
    .bind(target)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::validation(format!(
            "{} {ALREADY_EXISTS}",
            R::NAME
        )));
    }

    log::info!("> Added {} {} -> {}", R::NAME, subject, target);

    Ok(())
}

/// Deletes exactly the pair, failing with `NotFound` when it is absent.
pub async fn remove_relation<R: Relation>(
    subject: Id,
    target: Id,
    pool: &Pool<Sqlite>,
) -> Result<(), CatalogError> {
    let result = sqlx::query(&format!(
        "DELETE FROM {} WHERE user_id = $1 AND {} = $2",
        R::TABLE,
        R::TARGET_COLUMN
    ))
    .bind(subject)
    .bind(target)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(format!(
            "The {} {} is not in the list",
            R::TARGET_NAME,
            target
        )));
    }

    log::info!("> Removed {} {} -> {}", R::NAME, subject, target);
    Ok(())
}

/// Always false for an anonymous viewer.
pub async fn relation_exists<R: Relation>(
    viewer: Viewer,
    target: Id,
    pool: &Pool<Sqlite>,
) -> Result<bool, CatalogError> {
    let subject = match viewer.user_id() {
        Some(subject) => subject,
        None => return Ok(false),
    };

    let row: Option<(i64,)> = sqlx::query_as(&format!(
        "SELECT 1 FROM {} WHERE user_id = $1 AND {} = $2",
        R::TABLE,
        R::TARGET_COLUMN
    ))
    .bind(subject)
    .bind(target)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

pub async fn add_to_favorites(
    user_id: Id,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<RecipeSummary, CatalogError> {
    add_relation::<Favorite>(user_id, recipe_id, pool).await?;
    get_recipe_summary(recipe_id, pool).await
}

pub async fn remove_from_favorites(
    user_id: Id,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<(), CatalogError> {
    remove_relation::<Favorite>(user_id, recipe_id, pool).await
}

pub async fn add_to_shopping_cart(
    user_id: Id,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<RecipeSummary, CatalogError> {
    add_relation::<ShoppingCart>(user_id, recipe_id, pool).await?;
    get_recipe_summary(recipe_id, pool).await
}

pub async fn remove_from_shopping_cart(
    user_id: Id,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<(), CatalogError> {
    remove_relation::<ShoppingCart>(user_id, recipe_id, pool).await
}

pub async fn subscribe(
    user_id: Id,
    author_id: Id,
    recipes_limit: i64,
    pool: &Pool<Sqlite>,
) -> Result<UserWithRecipes, CatalogError> {
    add_relation::<Follow>(user_id, author_id, pool).await?;
    get_user_with_recipes(author_id, Viewer::User(user_id), recipes_limit, pool).await
}

pub async fn unsubscribe(
    user_id: Id,
    author_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<(), CatalogError> {
    remove_relation::<Follow>(user_id, author_id, pool).await
}
