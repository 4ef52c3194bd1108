#![allow(dead_code)]

use recipe_catalog::{
    actions::{connect, create_ingredient, create_recipe, create_tag, create_user},
    config::Config,
    form::{IngredientLine, NewIngredient, NewTag, NewUser, RecipeForm},
    schema::{Id, Ingredient, RecipeDetail, Tag, User},
};
use sqlx::{Pool, Sqlite};
use tempfile::TempDir;

pub async fn setup() -> Pool<Sqlite> {
    let _ = env_logger::builder().is_test(true).try_init();
    connect(&Config::in_memory())
        .await
        .expect("in-memory catalog should open")
}

/// A file-backed catalog whose pool hands out several connections, so
/// concurrent calls really overlap. Keep the directory alive for the test.
pub async fn setup_shared(max_connections: u32) -> (TempDir, Pool<Sqlite>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let config = Config {
        database_url: format!("sqlite://{}", dir.path().join("catalog.db").display()),
        max_connections,
        ..Config::default()
    };
    let pool = connect(&config)
        .await
        .expect("file-backed catalog should open");
    (dir, pool)
}

pub async fn user(pool: &Pool<Sqlite>, username: &str) -> User {
    create_user(
        &NewUser {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            first_name: username.to_owned(),
            last_name: "Tester".to_owned(),
        },
        pool,
    )
    .await
    .unwrap()
}

pub async fn ingredient(pool: &Pool<Sqlite>, name: &str, unit: &str) -> Ingredient {
    create_ingredient(
        &NewIngredient {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        },
        pool,
    )
    .await
    .unwrap()
}

pub async fn tag(pool: &Pool<Sqlite>, name: &str) -> Tag {
    create_tag(
        &NewTag {
            name: name.to_owned(),
            slug: name.to_lowercase(),
            color: None,
        },
        pool,
    )
    .await
    .unwrap()
}

pub fn form(name: &str, tags: &[Id], lines: &[(Id, i32)]) -> RecipeForm {
    RecipeForm {
        name: name.to_owned(),
        image: format!("media/{}.png", name.to_lowercase()),
        text: format!("How to make {name}."),
        cooking_time: 30,
        tags: tags.to_vec(),
        ingredients: lines
            .iter()
            .map(|(id, amount)| IngredientLine::new(*id, *amount))
            .collect(),
    }
}

pub async fn recipe(
    pool: &Pool<Sqlite>,
    author: Id,
    name: &str,
    tags: &[Id],
    lines: &[(Id, i32)],
) -> RecipeDetail {
    create_recipe(author, &form(name, tags, lines), pool)
        .await
        .unwrap()
}

pub async fn count(pool: &Pool<Sqlite>, table: &str) -> i64 {
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    count
}
