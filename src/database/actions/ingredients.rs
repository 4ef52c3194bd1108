use sqlx::{Pool, Sqlite};

use crate::{
    error::CatalogError,
    form::NewIngredient,
    schema::{Id, Ingredient},
};

pub async fn create_ingredient(
    ingredient: &NewIngredient,
    pool: &Pool<Sqlite>,
) -> Result<Ingredient, CatalogError> {
    ingredient.validate()?;

    let name = ingredient.name.trim();

    let row: Ingredient = sqlx::query_as(
        "
        INSERT INTO ingredients (name, search_name, measurement_unit)
        VALUES ($1, $2, $3)
        RETURNING *
    ",
    )
    .bind(name)
    .bind(name.to_lowercase())
    .bind(ingredient.measurement_unit.trim())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_ingredient(id: Id, pool: &Pool<Sqlite>) -> Result<Ingredient, CatalogError> {
    let row: Option<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.ok_or_else(|| CatalogError::not_found(format!("No ingredient exists with id {id}")))
}

/// Ingredients ordered by name, optionally narrowed to a case-insensitive
/// name prefix. Case folding is Unicode-aware: "му" finds "Мука".
pub async fn list_ingredients(
    search: Option<&str>,
    pool: &Pool<Sqlite>,
) -> Result<Vec<Ingredient>, CatalogError> {
    let prefix = search.unwrap_or("").trim().to_lowercase();
    let pattern = format!("{}%", escape_like(&prefix));

    let rows: Vec<Ingredient> = sqlx::query_as(
        "SELECT * FROM ingredients WHERE search_name LIKE $1 ESCAPE '\\' ORDER BY name, id",
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn escape_like(value: &str) -> String {
    value
        .chars()
        .fold(String::with_capacity(value.len()), |mut out, c| {
            if matches!(c, '%' | '_' | '\\') {
                out.push('\\');
            }
            out.push(c);
            out
        })
}
