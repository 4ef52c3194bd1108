use std::collections::HashSet;

use chrono::Utc;
use serde::Deserialize;
use sqlx::{Pool, QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    authentication::session::{ensure_author, Viewer},
    error::CatalogError,
    form::{IngredientLine, RecipeForm, RecipePatch},
    pagination::{Page, PageContext},
    schema::{CountedRow, Id, Recipe, RecipeDetail, RecipePart},
};

use super::{ensure_exists, get_recipe_detail, tags::replace_recipe_tags};

/// Narrows a recipe listing. Every present criterion must hold;
/// `tags` matches recipes carrying any of the given slugs.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RecipeFilter {
    pub author: Option<Id>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub favorited_by: Option<Id>,
    pub in_cart_of: Option<Id>,
}

/// Publishes a recipe with its tags and ingredient lines in one transaction.
/// Nothing is stored unless every line and tag resolves.
///
/// Writing transactions open with a write so that SQLite takes the write lock
/// up front; a transaction that reads first cannot wait for it later.
pub async fn create_recipe(
    author: Id,
    form: &RecipeForm,
    pool: &Pool<Sqlite>,
) -> Result<RecipeDetail, CatalogError> {
    let tags = form.validate()?;
    ensure_exists("users", author, "user", pool).await?;

    let mut tr = pool.begin().await?;

    let recipe: Recipe = sqlx::query_as(
        "
        INSERT INTO recipes (author_id, name, image, text, cooking_time, pub_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
    ",
    )
    .bind(author)
    .bind(form.name.trim())
    .bind(&form.image)
    .bind(&form.text)
    .bind(form.cooking_time)
    .bind(Utc::now())
    .fetch_one(&mut *tr)
    .await?;

    replace_recipe_tags(recipe.id, &tags, &mut *tr).await?;
    insert_recipe_parts(recipe.id, &form.ingredients, &mut *tr).await?;

    tr.commit().await?;
    log::info!("> Created recipe {} by user {}", recipe.id, author);

    get_recipe_detail(recipe.id, Viewer::User(author), pool).await
}

/// Applies a patch on behalf of `actor`, who must be the author.
///
/// Duplicate ingredient lines are rejected here exactly as in
/// [`create_recipe`], and an unresolvable line aborts the whole update.
pub async fn update_recipe(
    id: Id,
    actor: Id,
    patch: &RecipePatch,
    pool: &Pool<Sqlite>,
) -> Result<RecipeDetail, CatalogError> {
    let tags = patch.validate()?;
    let recipe = get_recipe(id, pool).await?;
    ensure_author(recipe.author_id, actor)?;

    let mut tr = pool.begin().await?;
    let result = sqlx::query(
        "
        UPDATE recipes SET
        name = COALESCE($1, name),
        image = COALESCE($2, image),
        text = COALESCE($3, text),
        cooking_time = COALESCE($4, cooking_time)
        WHERE id = $5 AND author_id = $6
    ",
    )
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.image.as_deref())
    .bind(patch.text.as_deref())
    .bind(patch.cooking_time)
    .bind(id)
    .bind(actor)
    .execute(&mut *tr)
    .await?;

    // deleted since the ownership check
    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(format!("No recipe exists with id {id}")));
    }

    if let Some(tags) = tags {
        replace_recipe_tags(id, &tags, &mut *tr).await?;
    }

    if let Some(lines) = &patch.ingredients {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tr)
            .await?;
        insert_recipe_parts(id, lines, &mut *tr).await?;
    }

    tr.commit().await?;
    log::info!("> Updated recipe {id}");

    get_recipe_detail(id, Viewer::User(actor), pool).await
}

/// Deletes a recipe owned by `actor`. Its ingredient lines, tag links,
/// favorites and cart entries go with it; catalog ingredients and tags stay.
pub async fn delete_recipe(id: Id, actor: Id, pool: &Pool<Sqlite>) -> Result<(), CatalogError> {
    let recipe = get_recipe(id, pool).await?;
    ensure_author(recipe.author_id, actor)?;

    // cascades run inside the same statement
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1 AND author_id = $2")
        .bind(id)
        .bind(actor)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found(format!("No recipe exists with id {id}")));
    }

    log::info!("> Deleted recipe {id}");

    Ok(())
}

pub async fn get_recipe(id: Id, pool: &Pool<Sqlite>) -> Result<Recipe, CatalogError> {
    let row: Option<Recipe> = sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| CatalogError::not_found(format!("No recipe exists with id {id}")))
}

pub async fn list_recipe_parts(
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<Vec<RecipePart>, CatalogError> {
    let rows: Vec<RecipePart> = sqlx::query_as(
        "
        SELECT ri.recipe_id AS recipe_id, i.id AS ingredient_id, i.name AS name,
            i.measurement_unit AS measurement_unit, ri.amount AS amount
        FROM recipe_ingredients ri
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = $1
        ORDER BY ri.id
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Recipes newest first, each as seen by `viewer`.
pub async fn list_recipes(
    filter: &RecipeFilter,
    viewer: Viewer,
    page: Page,
    pool: &Pool<Sqlite>,
) -> Result<PageContext<RecipeDetail>, CatalogError> {
    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT r.id AS id, COUNT(*) OVER() AS count FROM recipes r WHERE 1 = 1");

    if let Some(author) = filter.author {
        query.push(" AND r.author_id = ").push_bind(author);
    }

    if !filter.tags.is_empty() {
        query
            .push(" AND EXISTS (SELECT 1 FROM recipe_tags rt INNER JOIN tags t ON t.id = rt.tag_id")
            .push(" WHERE rt.recipe_id = r.id AND t.slug IN (");
        let mut slugs = query.separated(", ");
        for slug in &filter.tags {
            slugs.push_bind(slug.clone());
        }
        slugs.push_unseparated("))");
    }

    if let Some(user) = filter.favorited_by {
        query
            .push(" AND EXISTS (SELECT 1 FROM favorites f")
            .push(" WHERE f.recipe_id = r.id AND f.user_id = ")
            .push_bind(user)
            .push(")");
    }

    if let Some(user) = filter.in_cart_of {
        query
            .push(" AND EXISTS (SELECT 1 FROM shopping_cart c")
            .push(" WHERE c.recipe_id = r.id AND c.user_id = ")
            .push_bind(user)
            .push(")");
    }

    query
        .push(" ORDER BY r.pub_date DESC, r.id DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    let rows: Vec<CountedRow> = query.build_query_as().fetch_all(pool).await?;
    log::debug!("> Listed {} recipe(s) for {:?}", rows.len(), filter);

    let total_count = rows.first().map(|row| row.count).unwrap_or(0);
    let mut details = Vec::with_capacity(rows.len());
    for row in rows {
        details.push(get_recipe_detail(row.id, viewer, pool).await?);
    }

    Ok(PageContext::from_rows(details, total_count, page))
}

/// Resolves every line against the ingredient catalog and inserts them in
/// one statement. The line list must already be free of repeats.
async fn insert_recipe_parts(
    recipe_id: Id,
    lines: &[IngredientLine],
    conn: &mut SqliteConnection,
) -> Result<(), CatalogError> {
    if lines.is_empty() {
        return Ok(());
    }

    let mut lookup: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id FROM ingredients WHERE id IN (");
    let mut ids = lookup.separated(", ");
    for line in lines {
        ids.push_bind(line.id);
    }
    ids.push_unseparated(")");

    let found: Vec<(Id,)> = lookup.build_query_as().fetch_all(&mut *conn).await?;
    let found: HashSet<Id> = found.into_iter().map(|(id,)| id).collect();

    if let Some(missing) = lines.iter().find(|line| !found.contains(&line.id)) {
        return Err(CatalogError::not_found(format!(
            "No ingredient exists with id {}",
            missing.id
        )));
    }

    let mut insert: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ");
    insert.push_values(lines, |mut row, line| {
        row.push_bind(recipe_id)
            .push_bind(line.id)
            .push_bind(line.amount);
    });
    insert.build().execute(&mut *conn).await?;

    Ok(())
}
