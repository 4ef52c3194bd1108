use sqlx::{Pool, Sqlite};

use crate::{
    authentication::session::Viewer,
    error::CatalogError,
    pagination::{Page, PageContext},
    schema::{CountedRow, Id, RecipeDetail, RecipeSummary, UserProfile, UserWithRecipes},
};

use super::{
    get_recipe, get_user, list_recipe_parts, list_recipe_tags, relation_exists, Favorite, Follow,
    ShoppingCart,
};

pub async fn get_recipe_summary(
    id: Id,
    pool: &Pool<Sqlite>,
) -> Result<RecipeSummary, CatalogError> {
    let row: Option<RecipeSummary> =
        sqlx::query_as("SELECT id, name, image, cooking_time FROM recipes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    row.ok_or_else(|| CatalogError::not_found(format!("No recipe exists with id {id}")))
}

/// The full recipe as `viewer` sees it, including whether they have it
/// favorited or in their cart.
pub async fn get_recipe_detail(
    id: Id,
    viewer: Viewer,
    pool: &Pool<Sqlite>,
) -> Result<RecipeDetail, CatalogError> {
    let recipe = get_recipe(id, pool).await?;
    let tags = list_recipe_tags(id, pool).await?;
    let ingredients = list_recipe_parts(id, pool).await?;

    let author = get_user(recipe.author_id, pool).await?;
    let is_subscribed = relation_exists::<Follow>(viewer, author.id, pool).await?;

    let is_favorited = relation_exists::<Favorite>(viewer, id, pool).await?;
    let is_in_shopping_cart = relation_exists::<ShoppingCart>(viewer, id, pool).await?;

    log::debug!("> Projected recipe {id} for {viewer:?}");

    Ok(RecipeDetail {
        id: recipe.id,
        tags,
        author: UserProfile {
            user: author,
            is_subscribed,
        },
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        pub_date: recipe.pub_date,
    })
}

pub async fn get_user_profile(
    id: Id,
    viewer: Viewer,
    pool: &Pool<Sqlite>,
) -> Result<UserProfile, CatalogError> {
    let user = get_user(id, pool).await?;
    let is_subscribed = relation_exists::<Follow>(viewer, id, pool).await?;

    Ok(UserProfile {
        user,
        is_subscribed,
    })
}

/// A user with their newest `recipes_limit` recipes and the
/// untruncated recipe count. Callers without an explicit limit pass
/// [`Config::resolve_recipes_limit`](crate::config::Config::resolve_recipes_limit).
pub async fn get_user_with_recipes(
    id: Id,
    viewer: Viewer,
    recipes_limit: i64,
    pool: &Pool<Sqlite>,
) -> Result<UserWithRecipes, CatalogError> {
    let UserProfile {
        user,
        is_subscribed,
    } = get_user_profile(id, viewer, pool).await?;

    let recipes: Vec<RecipeSummary> = sqlx::query_as(
        "
        SELECT id, name, image, cooking_time
        FROM recipes
        WHERE author_id = $1
        ORDER BY pub_date DESC, id DESC
        LIMIT $2
    ",
    )
    .bind(id)
    .bind(recipes_limit.max(0))
    .fetch_all(pool)
    .await?;

    let (recipes_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;

    Ok(UserWithRecipes {
        user,
        is_subscribed,
        recipes,
        recipes_count,
    })
}

/// Every author `user_id` follows, ordered by username.
pub async fn list_subscriptions(
    user_id: Id,
    page: Page,
    recipes_limit: i64,
    pool: &Pool<Sqlite>,
) -> Result<PageContext<UserWithRecipes>, CatalogError> {
    let rows: Vec<CountedRow> = sqlx::query_as(
        "
        SELECT u.id AS id, COUNT(*) OVER() AS count
        FROM follows f
        INNER JOIN users u ON u.id = f.author_id
        WHERE f.user_id = $1
        ORDER BY u.username
        LIMIT $2 OFFSET $3
    ",
    )
    .bind(user_id)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    let total_count = rows.first().map(|row| row.count).unwrap_or(0);

    let mut authors = Vec::with_capacity(rows.len());
    for row in rows {
        let author = get_user_with_recipes(row.id, Viewer::User(user_id), recipes_limit, pool);
        authors.push(author.await?);
    }

    Ok(PageContext::from_rows(authors, total_count, page))
}
