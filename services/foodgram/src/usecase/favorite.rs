//! Favorite membership toggles.

use uuid::Uuid;

use crate::domain::repository::{FavoriteRepository, RecipeRepository};
use crate::domain::types::Recipe;
use crate::error::FoodgramError;

// ── AddFavorite ──────────────────────────────────────────────────────────────

pub struct AddFavoriteUseCase<R: RecipeRepository, F: FavoriteRepository> {
    pub recipes: R,
    pub favorites: F,
}

impl<R: RecipeRepository, F: FavoriteRepository> AddFavoriteUseCase<R, F> {
    /// Returns the recipe so the handler can serialize the short card.
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<Recipe, FoodgramError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)?;
        if self.favorites.exists(user_id, recipe_id).await? {
            return Err(FoodgramError::AlreadyFavorited);
        }
        self.favorites.create(user_id, recipe_id).await?;
        Ok(recipe)
    }
}

// ── RemoveFavorite ───────────────────────────────────────────────────────────

pub struct RemoveFavoriteUseCase<R: RecipeRepository, F: FavoriteRepository> {
    pub recipes: R,
    pub favorites: F,
}

impl<R: RecipeRepository, F: FavoriteRepository> RemoveFavoriteUseCase<R, F> {
    pub async fn execute(&self, user_id: Uuid, recipe_id: i32) -> Result<(), FoodgramError> {
        if self.recipes.find_by_id(recipe_id).await?.is_none() {
            return Err(FoodgramError::RecipeNotFound);
        }
        let deleted = self.favorites.delete(user_id, recipe_id).await?;
        if !deleted {
            return Err(FoodgramError::NotFavorited);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{IngredientEntry, RecipeDetails, RecipeFields, RecipeFilter};
    use chrono::Utc;
    use foodgram_domain::pagination::PageRequest;

    fn sample_recipe(id: i32) -> Recipe {
        Recipe {
            id,
            author_id: Uuid::new_v4(),
            name: "Borscht".into(),
            text: "Simmer.".into(),
            cooking_time: 90,
            image: "recipes/images/borscht.png".into(),
            slug: "a1B2c3D4".into(),
            created_at: Utc::now(),
        }
    }

    struct MockRecipes {
        recipe: Option<Recipe>,
    }

    impl RecipeRepository for MockRecipes {
        async fn find_by_id(&self, _id: i32) -> Result<Option<Recipe>, FoodgramError> {
            Ok(self.recipe.clone())
        }
        async fn find_by_slug(&self, _slug: &str) -> Result<Option<Recipe>, FoodgramError> {
            Ok(self.recipe.clone())
        }
        async fn details(&self, _id: i32) -> Result<Option<RecipeDetails>, FoodgramError> {
            Ok(None)
        }
        async fn list(
            &self,
            _filter: &RecipeFilter,
            _page: PageRequest,
        ) -> Result<Vec<RecipeDetails>, FoodgramError> {
            Ok(vec![])
        }
        async fn list_by_author(
            &self,
            _author: Uuid,
            _limit: Option<u64>,
        ) -> Result<Vec<Recipe>, FoodgramError> {
            Ok(vec![])
        }
        async fn count_by_author(&self, _author: Uuid) -> Result<u64, FoodgramError> {
            Ok(0)
        }
        async fn create(
            &self,
            _author: Uuid,
            _fields: &RecipeFields,
            _slug: &str,
            _tag_ids: &[i32],
            _ingredients: &[IngredientEntry],
        ) -> Result<Option<i32>, FoodgramError> {
            Ok(None)
        }
        async fn update(
            &self,
            _id: i32,
            _fields: &RecipeFields,
            _tag_ids: &[i32],
            _ingredients: &[IngredientEntry],
        ) -> Result<(), FoodgramError> {
            Ok(())
        }
        async fn delete(&self, _id: i32) -> Result<bool, FoodgramError> {
            Ok(false)
        }
    }

    struct MockFavorites {
        exists: bool,
        delete_returns: bool,
    }

    impl FavoriteRepository for MockFavorites {
        async fn exists(&self, _user: Uuid, _recipe: i32) -> Result<bool, FoodgramError> {
            Ok(self.exists)
        }
        async fn create(&self, _user: Uuid, _recipe: i32) -> Result<(), FoodgramError> {
            Ok(())
        }
        async fn delete(&self, _user: Uuid, _recipe: i32) -> Result<bool, FoodgramError> {
            Ok(self.delete_returns)
        }
        async fn member_recipe_ids(
            &self,
            _user: Uuid,
            _recipes: &[i32],
        ) -> Result<Vec<i32>, FoodgramError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn should_add_favorite_when_absent() {
        let uc = AddFavoriteUseCase {
            recipes: MockRecipes {
                recipe: Some(sample_recipe(1)),
            },
            favorites: MockFavorites {
                exists: false,
                delete_returns: false,
            },
        };
        let recipe = uc.execute(Uuid::new_v4(), 1).await.unwrap();
        assert_eq!(recipe.id, 1);
    }

    #[tokio::test]
    async fn should_fail_add_when_already_favorited() {
        let uc = AddFavoriteUseCase {
            recipes: MockRecipes {
                recipe: Some(sample_recipe(1)),
            },
            favorites: MockFavorites {
                exists: true,
                delete_returns: false,
            },
        };
        let result = uc.execute(Uuid::new_v4(), 1).await;
        assert!(matches!(result, Err(FoodgramError::AlreadyFavorited)));
    }

    #[tokio::test]
    async fn should_fail_add_when_recipe_missing() {
        let uc = AddFavoriteUseCase {
            recipes: MockRecipes { recipe: None },
            favorites: MockFavorites {
                exists: false,
                delete_returns: false,
            },
        };
        let result = uc.execute(Uuid::new_v4(), 999).await;
        assert!(matches!(result, Err(FoodgramError::RecipeNotFound)));
    }

    #[tokio::test]
    async fn should_remove_favorite_when_present() {
        let uc = RemoveFavoriteUseCase {
            recipes: MockRecipes {
                recipe: Some(sample_recipe(1)),
            },
            favorites: MockFavorites {
                exists: true,
                delete_returns: true,
            },
        };
        assert!(uc.execute(Uuid::new_v4(), 1).await.is_ok());
    }

    #[tokio::test]
    async fn should_fail_remove_when_not_favorited() {
        let uc = RemoveFavoriteUseCase {
            recipes: MockRecipes {
                recipe: Some(sample_recipe(1)),
            },
            favorites: MockFavorites {
                exists: false,
                delete_returns: false,
            },
        };
        let result = uc.execute(Uuid::new_v4(), 1).await;
        assert!(matches!(result, Err(FoodgramError::NotFavorited)));
    }
}
