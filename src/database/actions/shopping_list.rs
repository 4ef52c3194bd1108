use std::fmt::Write;

use sqlx::{Pool, Sqlite};

use crate::{
    constants::{PURCHASE_LIST_CONTENT_TYPE, PURCHASE_LIST_FILENAME, PURCHASE_LIST_HEADER},
    error::CatalogError,
    schema::{Id, PurchaseLine, PurchaseList},
};

/// Sums every ingredient over the recipes in the user's cart.
/// The same ingredient from several recipes becomes a single line.
pub async fn list_purchase_lines(
    user_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<Vec<PurchaseLine>, CatalogError> {
    let rows: Vec<PurchaseLine> = sqlx::query_as(
        "
        SELECT i.id AS ingredient_id, i.name AS name, i.measurement_unit AS measurement_unit,
            SUM(ri.amount) AS amount
        FROM shopping_cart c
        INNER JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE c.user_id = $1
        GROUP BY i.id, i.name, i.measurement_unit
        ORDER BY i.name, i.id
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn build_purchase_list(
    user_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<PurchaseList, CatalogError> {
    let lines = list_purchase_lines(user_id, pool).await?;
    let content = render_purchase_list(&lines);
    log::debug!("> Purchase list for user {user_id}: {} line(s)", lines.len());

    Ok(PurchaseList {
        lines,
        content,
        content_type: PURCHASE_LIST_CONTENT_TYPE,
        filename: PURCHASE_LIST_FILENAME,
    })
}

pub fn render_purchase_list(lines: &[PurchaseLine]) -> String {
    lines
        .iter()
        .fold(String::from(PURCHASE_LIST_HEADER), |mut out, line| {
            // writing into a String cannot fail
            let _ = writeln!(out, "{}, {} {}", line.name, line.amount, line.measurement_unit);
            out
        })
}
