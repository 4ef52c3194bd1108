use std::collections::HashSet;

use serde::Deserialize;

use crate::{
    constants::{
        COOKING_TIME_MAX, COOKING_TIME_MIN, DEFAULT_TAG_COLOR, DUPLICATE_INGREDIENT,
        EMAIL_MAX_LENGTH, INGREDIENT_AMOUNT_MIN, INGREDIENT_NAME_MAX_LENGTH,
        MEASUREMENT_UNIT_MAX_LENGTH, RECIPE_NAME_MAX_LENGTH, TAG_NAME_MAX_LENGTH,
        USERNAME_MAX_LENGTH,
    },
    error::CatalogError,
    schema::Id,
};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientLine {
    pub id: Id,
    pub amount: i32,
}

impl IngredientLine {
    pub fn new(id: Id, amount: i32) -> Self {
        Self { id, amount }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RecipeForm {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub tags: Vec<Id>,
    pub ingredients: Vec<IngredientLine>,
}

impl RecipeForm {
    /// Checks every business rule that does not need the store.
    /// Returns the tag set with repeats collapsed.
    pub fn validate(&self) -> Result<Vec<Id>, CatalogError> {
        validate_text("name", &self.name, RECIPE_NAME_MAX_LENGTH)?;
        validate_required("text", &self.text)?;
        validate_required("image", &self.image)?;
        validate_cooking_time(self.cooking_time)?;
        validate_ingredients(&self.ingredients)?;
        validate_tags(&self.tags)
    }
}

/// Partial update of a recipe. Absent fields are left untouched;
/// present collections replace the stored set wholesale.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub image: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub tags: Option<Vec<Id>>,
    pub ingredients: Option<Vec<IngredientLine>>,
}

impl RecipePatch {
    pub fn validate(&self) -> Result<Option<Vec<Id>>, CatalogError> {
        if let Some(name) = &self.name {
            validate_text("name", name, RECIPE_NAME_MAX_LENGTH)?;
        }
        if let Some(text) = &self.text {
            validate_required("text", text)?;
        }
        if let Some(image) = &self.image {
            validate_required("image", image)?;
        }
        if let Some(cooking_time) = self.cooking_time {
            validate_cooking_time(cooking_time)?;
        }
        if let Some(ingredients) = &self.ingredients {
            validate_ingredients(ingredients)?;
        }
        self.tags.as_deref().map(validate_tags).transpose()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_text("username", &self.username, USERNAME_MAX_LENGTH)?;
        if !self
            .username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
        {
            return Err(CatalogError::validation(
                "username may contain only letters, digits and @/./+/-/_",
            ));
        }
        validate_text("email", &self.email, EMAIL_MAX_LENGTH)?;
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(CatalogError::validation("email is not a valid address")),
        }
        validate_text("first_name", &self.first_name, USERNAME_MAX_LENGTH)?;
        validate_text("last_name", &self.last_name, USERNAME_MAX_LENGTH)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
}

impl NewTag {
    /// Returns the color to store.
    pub fn validate(&self) -> Result<String, CatalogError> {
        validate_text("name", &self.name, TAG_NAME_MAX_LENGTH)?;
        if self.slug.is_empty()
            || !self
                .slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CatalogError::validation(
                "slug may contain only latin letters, digits, '-' and '_'",
            ));
        }

        let color = self.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR);
        let is_hex = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex {
            return Err(CatalogError::validation("color must look like #rrggbb"));
        }

        Ok(color.to_lowercase())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

impl NewIngredient {
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_text("name", &self.name, INGREDIENT_NAME_MAX_LENGTH)?;
        validate_text(
            "measurement_unit",
            &self.measurement_unit,
            MEASUREMENT_UNIT_MAX_LENGTH,
        )
    }
}

pub fn validate_cooking_time(minutes: i32) -> Result<(), CatalogError> {
    if !(COOKING_TIME_MIN..=COOKING_TIME_MAX).contains(&minutes) {
        return Err(CatalogError::validation(format!(
            "cooking time must be between {COOKING_TIME_MIN} and {COOKING_TIME_MAX} minutes"
        )));
    }
    Ok(())
}

/// Collapses repeats, keeping first-seen order.
pub fn validate_tags(tags: &[Id]) -> Result<Vec<Id>, CatalogError> {
    if tags.is_empty() {
        return Err(CatalogError::validation("at least one tag is required"));
    }
    let mut seen = HashSet::new();
    Ok(tags.iter().copied().filter(|id| seen.insert(*id)).collect())
}

pub fn validate_ingredients(lines: &[IngredientLine]) -> Result<(), CatalogError> {
    if lines.is_empty() {
        return Err(CatalogError::validation(
            "at least one ingredient is required",
        ));
    }

    let mut seen = HashSet::new();
    for line in lines {
        if line.amount < INGREDIENT_AMOUNT_MIN {
            return Err(CatalogError::validation(format!(
                "amount must be at least {INGREDIENT_AMOUNT_MIN}"
            )));
        }
        if !seen.insert(line.id) {
            return Err(CatalogError::validation(DUPLICATE_INGREDIENT));
        }
    }

    Ok(())
}

fn validate_required(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}

fn validate_text(field: &str, value: &str, max_length: usize) -> Result<(), CatalogError> {
    validate_required(field, value)?;
    if value.chars().count() > max_length {
        return Err(CatalogError::validation(format!(
            "{field} must be at most {max_length} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RecipeForm {
        RecipeForm {
            name: "Pancakes".to_owned(),
            image: "media/pancakes.png".to_owned(),
            text: "Mix and fry.".to_owned(),
            cooking_time: 20,
            tags: vec![1, 2, 1],
            ingredients: vec![IngredientLine::new(1, 200), IngredientLine::new(2, 3)],
        }
    }

    fn message(err: CatalogError) -> String {
        match err {
            CatalogError::Validation(info) => info,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_form_collapses_repeated_tags() {
        assert_eq!(form().validate().unwrap(), vec![1, 2]);
    }

    #[test]
    fn cooking_time_bounds_are_inclusive() {
        assert!(validate_cooking_time(1).is_ok());
        assert!(validate_cooking_time(120).is_ok());
        assert!(validate_cooking_time(0).is_err());
        assert!(validate_cooking_time(121).is_err());
    }

    #[test]
    fn empty_collections_are_rejected() {
        let mut f = form();
        f.tags.clear();
        assert!(f.validate().unwrap_err().is_validation());

        let mut f = form();
        f.ingredients.clear();
        assert!(f.validate().unwrap_err().is_validation());
    }

    #[test]
    fn repeated_ingredient_is_rejected() {
        let mut f = form();
        f.ingredients.push(IngredientLine::new(1, 50));
        assert_eq!(message(f.validate().unwrap_err()), DUPLICATE_INGREDIENT);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut f = form();
        f.ingredients[0].amount = 0;
        assert!(f.validate().unwrap_err().is_validation());
    }

    #[test]
    fn patch_only_checks_present_fields() {
        assert_eq!(RecipePatch::default().validate().unwrap(), None);

        let patch = RecipePatch {
            ingredients: Some(vec![IngredientLine::new(3, 1), IngredientLine::new(3, 2)]),
            ..Default::default()
        };
        assert_eq!(message(patch.validate().unwrap_err()), DUPLICATE_INGREDIENT);

        let patch = RecipePatch {
            tags: Some(vec![]),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn form_deserializes_from_json() {
        let f: RecipeForm = serde_json::from_value(serde_json::json!({
            "name": "Soup",
            "image": "media/soup.png",
            "text": "Boil.",
            "cooking_time": 45,
            "tags": [3],
            "ingredients": [{ "id": 9, "amount": 2 }]
        }))
        .unwrap();
        assert_eq!(f.ingredients, vec![IngredientLine::new(9, 2)]);
        assert_eq!(f.validate().unwrap(), vec![3]);
    }

    #[test]
    fn tag_color_and_slug() {
        let tag = NewTag {
            name: "Breakfast".to_owned(),
            slug: "breakfast".to_owned(),
            color: None,
        };
        assert_eq!(tag.validate().unwrap(), DEFAULT_TAG_COLOR);

        let tag = NewTag {
            color: Some("#E26C2D".to_owned()),
            ..tag
        };
        assert_eq!(tag.validate().unwrap(), "#e26c2d");

        let bad = NewTag {
            slug: "no spaces".to_owned(),
            ..tag.clone()
        };
        assert!(bad.validate().is_err());

        let bad = NewTag {
            color: Some("red".to_owned()),
            ..tag
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn user_fields() {
        let user = NewUser {
            username: "chef.anna".to_owned(),
            email: "anna@example.com".to_owned(),
            first_name: "Anna".to_owned(),
            last_name: "Smith".to_owned(),
        };
        assert!(user.validate().is_ok());

        let bad = NewUser {
            email: "not-an-email".to_owned(),
            ..user.clone()
        };
        assert!(bad.validate().is_err());

        let bad = NewUser {
            username: "white space".to_owned(),
            ..user
        };
        assert!(bad.validate().is_err());
    }
}
