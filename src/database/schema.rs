use chrono::{DateTime, Utc};
use serde::Serialize;

/// Opaque handle of a stored row.
pub type Id = i32;

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: Id,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: Id,
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: Id,
    pub author_id: Id,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

/// The handle of a listed row plus the window count of its listing query.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct CountedRow {
    pub id: Id,
    pub count: i64,
}

/// One resolved ingredient line of a recipe.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipePart {
    #[serde(skip)]
    pub recipe_id: Id,
    #[serde(rename = "id")]
    pub ingredient_id: Id,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

// Projections. Built per request, never persisted.

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeSummary {
    pub id: Id,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: Id,
    pub tags: Vec<Tag>,
    pub author: UserProfile,
    pub ingredients: Vec<RecipePart>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithRecipes {
    #[serde(flatten)]
    pub user: User,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes, independent of how many are listed
    pub recipes_count: i64,
}

/// Ingredient totals summed over every recipe in a cart.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseLine {
    pub ingredient_id: Id,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseList {
    pub lines: Vec<PurchaseLine>,
    pub content: String,
    pub content_type: &'static str,
    pub filename: &'static str,
}
