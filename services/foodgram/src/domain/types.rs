//! Domain structs passed between handlers, use cases and repositories.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Registered user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Media path of the avatar, when one is set.
    pub avatar: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Opaque bearer token minted at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub key: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Immutable reference data: an ingredient with its canonical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Immutable reference data: a recipe tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// A recipe row without its joined tags and ingredient amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: i32,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// An ingredient joined to a recipe with its amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient: Ingredient,
    pub amount: i32,
}

/// A recipe with everything needed to serialize it: author, tags and
/// ingredient amounts in join-row insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub author: User,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<IngredientAmount>,
}

/// One (ingredient id, amount) pair submitted with a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientEntry {
    pub id: i32,
    pub amount: i32,
}

/// Scalar recipe fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFields {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    /// Media path; the handler has already stored the image payload.
    pub image: String,
}

/// Filter for the recipe listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<Uuid>,
    /// Match recipes carrying any of these tag slugs.
    pub tag_slugs: Vec<String>,
    pub favorited_by: Option<Uuid>,
    pub in_cart_of: Option<Uuid>,
}

/// One cart-reachable (recipe, ingredient, amount) join row, in join-row
/// insertion order. Input to the shopping-list aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredientRow {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// A subscribed-to author together with their recipes for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorCard {
    pub author: User,
    pub recipes: Vec<Recipe>,
    pub recipes_count: u64,
}
