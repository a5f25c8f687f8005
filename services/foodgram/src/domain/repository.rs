//! Repository traits: explicit query methods over the persistent store.
//!
//! Every membership mutation is read-check-then-write; the store's unique
//! constraints stay the final arbiter, so `create` methods map a losing
//! racer's duplicate-key error to the matching conflict variant.

#![allow(async_fn_in_trait)]

use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;

use crate::domain::types::{
    AuthToken, CartIngredientRow, Ingredient, IngredientEntry, Recipe, RecipeDetails, RecipeFields,
    RecipeFilter, Tag, User,
};
use crate::error::FoodgramError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, FoodgramError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, FoodgramError>;
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, FoodgramError>;
    /// Insert a new account. A duplicate email maps to `EmailTaken`.
    async fn create(&self, user: &User) -> Result<(), FoodgramError>;
    async fn update_profile(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), FoodgramError>;
    async fn set_avatar(&self, id: Uuid, avatar: Option<&str>) -> Result<(), FoodgramError>;
    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), FoodgramError>;
}

/// Repository for opaque bearer tokens.
pub trait TokenRepository: Send + Sync {
    /// Resolve the account owning `key`, if the token exists.
    async fn find_user_by_key(&self, key: &str) -> Result<Option<User>, FoodgramError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AuthToken>, FoodgramError>;
    async fn create(&self, token: &AuthToken) -> Result<(), FoodgramError>;
    /// Delete a token. Returns `true` if a row was deleted.
    async fn delete(&self, key: &str) -> Result<bool, FoodgramError>;
}

/// Repository for the subscriber-follows-author relation.
pub trait SubscriptionRepository: Send + Sync {
    async fn exists(&self, subscriber: Uuid, author: Uuid) -> Result<bool, FoodgramError>;
    /// Insert the relation. A duplicate pair maps to `AlreadySubscribed`.
    async fn create(&self, subscriber: Uuid, author: Uuid) -> Result<(), FoodgramError>;
    /// Delete the relation. Returns `true` if a row was deleted.
    async fn delete(&self, subscriber: Uuid, author: Uuid) -> Result<bool, FoodgramError>;
    /// Authors `subscriber` follows, oldest subscription first.
    async fn list_authors(
        &self,
        subscriber: Uuid,
        page: PageRequest,
    ) -> Result<Vec<User>, FoodgramError>;
}

/// Repository for favorite membership.
pub trait FavoriteRepository: Send + Sync {
    async fn exists(&self, user: Uuid, recipe: i32) -> Result<bool, FoodgramError>;
    /// Insert the membership. A duplicate pair maps to `AlreadyFavorited`.
    async fn create(&self, user: Uuid, recipe: i32) -> Result<(), FoodgramError>;
    /// Delete the membership. Returns `true` if a row was deleted.
    async fn delete(&self, user: Uuid, recipe: i32) -> Result<bool, FoodgramError>;
    /// Subset of `recipes` that `user` has favorited.
    async fn member_recipe_ids(
        &self,
        user: Uuid,
        recipes: &[i32],
    ) -> Result<Vec<i32>, FoodgramError>;
}

/// Repository for shopping-cart membership.
pub trait CartRepository: Send + Sync {
    async fn exists(&self, user: Uuid, recipe: i32) -> Result<bool, FoodgramError>;
    /// Insert the membership. A duplicate pair maps to `AlreadyInCart`.
    async fn create(&self, user: Uuid, recipe: i32) -> Result<(), FoodgramError>;
    /// Delete the membership. Returns `true` if a row was deleted.
    async fn delete(&self, user: Uuid, recipe: i32) -> Result<bool, FoodgramError>;
    /// Subset of `recipes` that are in `user`'s cart.
    async fn member_recipe_ids(
        &self,
        user: Uuid,
        recipes: &[i32],
    ) -> Result<Vec<i32>, FoodgramError>;
    /// Every ingredient join row reachable from `user`'s cart, in join-row
    /// insertion order. Empty when the cart is empty.
    async fn ingredient_rows(&self, user: Uuid) -> Result<Vec<CartIngredientRow>, FoodgramError>;
}

/// Repository for recipes and their tag / ingredient join rows.
pub trait RecipeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Recipe>, FoodgramError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Recipe>, FoodgramError>;
    async fn details(&self, id: i32) -> Result<Option<RecipeDetails>, FoodgramError>;
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<RecipeDetails>, FoodgramError>;
    /// Recipes by `author`, newest first, at most `limit` when given.
    async fn list_by_author(
        &self,
        author: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<Recipe>, FoodgramError>;
    async fn count_by_author(&self, author: Uuid) -> Result<u64, FoodgramError>;
    /// Insert the recipe row and both join-row sets in one transaction.
    /// Returns the new id, or `None` when `slug` collided (caller
    /// regenerates and retries).
    async fn create(
        &self,
        author: Uuid,
        fields: &RecipeFields,
        slug: &str,
        tag_ids: &[i32],
        ingredients: &[IngredientEntry],
    ) -> Result<Option<i32>, FoodgramError>;
    /// Update scalar fields and replace both join-row sets (delete then
    /// recreate) in one transaction. The slug is never touched.
    async fn update(
        &self,
        id: i32,
        fields: &RecipeFields,
        tag_ids: &[i32],
        ingredients: &[IngredientEntry],
    ) -> Result<(), FoodgramError>;
    /// Delete a recipe. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, FoodgramError>;
}

/// Repository for tag reference data.
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, FoodgramError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, FoodgramError>;
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, FoodgramError>;
}

/// Repository for ingredient reference data.
pub trait IngredientRepository: Send + Sync {
    /// All ingredients, optionally narrowed by a case-insensitive substring
    /// match on the name.
    async fn search(&self, name: Option<&str>) -> Result<Vec<Ingredient>, FoodgramError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, FoodgramError>;
    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Ingredient>, FoodgramError>;
}
