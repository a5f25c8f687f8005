//! Shopping-cart membership toggles.

use uuid::Uuid;

use crate::domain::repository::{CartRepository, RecipeRepository};
use crate::domain::types::Recipe;
use crate::error::FoodgramError;

// ── AddToCart ────────────────────────────────────────────────────────────────

pub struct AddToCartUseCase<R: RecipeRepository, C: CartRepository> {
    pub recipes: R,
    pub cart: C,
}

impl<R: RecipeRepository, C: CartRepository> AddToCartUseCase<R, C> {
    /// Returns the recipe so the handler can serialize the short card.
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<Recipe, FoodgramError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)?;
        if self.cart.exists(user_id, recipe_id).await? {
            return Err(FoodgramError::AlreadyInCart);
        }
        self.cart.create(user_id, recipe_id).await?;
        Ok(recipe)
    }
}

// ── RemoveFromCart ───────────────────────────────────────────────────────────

pub struct RemoveFromCartUseCase<R: RecipeRepository, C: CartRepository> {
    pub recipes: R,
    pub cart: C,
}

impl<R: RecipeRepository, C: CartRepository> RemoveFromCartUseCase<R, C> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<(), FoodgramError> {
        if self.recipes.find_by_id(recipe_id).await?.is_none() {
            return Err(FoodgramError::RecipeNotFound);
        }
        let deleted = self.cart.delete(user_id, recipe_id).await?;
        if !deleted {
            return Err(FoodgramError::NotInCart);
        }
        Ok(())
    }
}
