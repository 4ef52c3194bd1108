pub const COOKING_TIME_MIN: i32 = 1;
pub const COOKING_TIME_MAX: i32 = 120;
pub const INGREDIENT_AMOUNT_MIN: i32 = 1;

pub const RECIPE_COUNT_PER_PAGE: i64 = 6;
pub const RECIPES_LIMIT_DEFAULT: i64 = 3;

pub const RECIPE_NAME_MAX_LENGTH: usize = 128;
pub const TAG_NAME_MAX_LENGTH: usize = 32;
pub const INGREDIENT_NAME_MAX_LENGTH: usize = 128;
pub const MEASUREMENT_UNIT_MAX_LENGTH: usize = 32;
pub const USERNAME_MAX_LENGTH: usize = 150;
pub const EMAIL_MAX_LENGTH: usize = 128;

pub const DEFAULT_TAG_COLOR: &str = "#ffffff";

pub const PURCHASE_LIST_HEADER: &str = "Purchase list:\n\n";
pub const PURCHASE_LIST_FILENAME: &str = "purchase_list.txt";
pub const PURCHASE_LIST_CONTENT_TYPE: &str = "text/plain";

pub const ALREADY_EXISTS: &str = "already exists";
pub const DUPLICATE_INGREDIENT: &str = "duplicate ingredient in recipe";
pub const SELF_SUBSCRIPTION: &str = "self-subscription";
