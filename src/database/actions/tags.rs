use std::collections::HashSet;

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::CatalogError,
    form::NewTag,
    schema::{Id, Tag},
};

pub async fn create_tag(tag: &NewTag, pool: &Pool<Sqlite>) -> Result<Tag, CatalogError> {
    let color = tag.validate()?;

    let row: Tag =
        sqlx::query_as("INSERT INTO tags (name, slug, color) VALUES ($1, $2, $3) RETURNING *")
            .bind(tag.name.trim())
            .bind(&tag.slug)
            .bind(color)
            .fetch_one(pool)
            .await?;

    Ok(row)
}

pub async fn get_tag(id: Id, pool: &Pool<Sqlite>) -> Result<Tag, CatalogError> {
    let row: Option<Tag> = sqlx::query_as("SELECT * FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| CatalogError::not_found(format!("No tag exists with id {id}")))
}

pub async fn list_tags(pool: &Pool<Sqlite>) -> Result<Vec<Tag>, CatalogError> {
    let list: Vec<Tag> = sqlx::query_as("SELECT * FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(list)
}

pub async fn list_recipe_tags(
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<Vec<Tag>, CatalogError> {
    let list: Vec<Tag> = sqlx::query_as(
        "
        SELECT t.*
        FROM recipe_tags rt
        INNER JOIN tags t ON t.id = rt.tag_id
        WHERE rt.recipe_id = $1
        ORDER BY t.name
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(list)
}

/// Makes `tags` the exact tag set of the recipe. Only the difference
/// is written, so the recipe never passes through an empty set.
/// Every tag must exist, otherwise the whole replacement fails.
pub(crate) async fn replace_recipe_tags(
    recipe_id: Id,
    tags: &[Id],
    conn: &mut SqliteConnection,
) -> Result<(), CatalogError> {
    for tag_id in tags {
        let found: Option<(Id,)> = sqlx::query_as("SELECT id FROM tags WHERE id = $1")
            .bind(tag_id)
            .fetch_optional(&mut *conn)
            .await?;
        if found.is_none() {
            return Err(CatalogError::validation(format!(
                "Tag with id {tag_id} doesn't exist"
            )));
        }
    }

    let current: Vec<(Id,)> = sqlx::query_as("SELECT tag_id FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .fetch_all(&mut *conn)
        .await?;
    let current: HashSet<Id> = current.into_iter().map(|(id,)| id).collect();
    let wanted: HashSet<Id> = tags.iter().copied().collect();

    for stale in current.difference(&wanted) {
        sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1 AND tag_id = $2")
            .bind(recipe_id)
            .bind(stale)
            .execute(&mut *conn)
            .await?;
    }

    for missing in wanted.difference(&current) {
        sqlx::query(
            "INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(recipe_id)
        .bind(missing)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
