//! Read-only reference data: tags and the ingredient catalog.

use crate::domain::repository::{IngredientRepository, TagRepository};
use crate::domain::types::{Ingredient, Tag};
use crate::error::FoodgramError;

pub struct ListTagsUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> ListTagsUseCase<T> {
    pub async fn execute(&self) -> Result<Vec<Tag>, FoodgramError> {
        self.tags.list().await
    }
}

pub struct GetTagUseCase<T: TagRepository> {
    pub tags: T,
}

impl<T: TagRepository> GetTagUseCase<T> {
    pub async fn execute(&self, tag_id: i32) -> Result<Tag, FoodgramError> {
        self.tags
            .find_by_id(tag_id)
            .await?
            .ok_or(FoodgramError::TagNotFound)
    }
}

pub struct ListIngredientsUseCase<I: IngredientRepository> {
    pub ingredients: I,
}

impl<I: IngredientRepository> ListIngredientsUseCase<I> {
    /// `name` filters by case-insensitive substring when present.
    pub async fn execute(&self, name: Option<&str>) -> Result<Vec<Ingredient>, FoodgramError> {
        self.ingredients.search(name).await
    }
}

pub struct GetIngredientUseCase<I: IngredientRepository> {
    pub ingredients: I,
}

impl<I: IngredientRepository> GetIngredientUseCase<I> {
    pub async fn execute(&self, ingredient_id: i32) -> Result<Ingredient, FoodgramError> {
        self.ingredients
            .find_by_id(ingredient_id)
            .await?
            .ok_or(FoodgramError::IngredientNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTags {
        tag: Option<Tag>,
    }

    impl TagRepository for MockTags {
        async fn list(&self) -> Result<Vec<Tag>, FoodgramError> {
            Ok(self.tag.clone().into_iter().collect())
        }
        async fn find_by_id(&self, _id: i32) -> Result<Option<Tag>, FoodgramError> {
            Ok(self.tag.clone())
        }
        async fn find_by_ids(&self, _ids: &[i32]) -> Result<Vec<Tag>, FoodgramError> {
            Ok(vec![])
        }
    }

    struct MockIngredients {
        ingredient: Option<Ingredient>,
    }

    impl IngredientRepository for MockIngredients {
        async fn search(&self, name: Option<&str>) -> Result<Vec<Ingredient>, FoodgramError> {
            Ok(self
                .ingredient
                .clone()
                .into_iter()
                .filter(|i| match name {
                    Some(needle) => i.name.to_lowercase().contains(&needle.to_lowercase()),
                    None => true,
                })
                .collect())
        }
        async fn find_by_id(&self, _id: i32) -> Result<Option<Ingredient>, FoodgramError> {
            Ok(self.ingredient.clone())
        }
        async fn find_by_ids(&self, _ids: &[i32]) -> Result<Vec<Ingredient>, FoodgramError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn should_get_tag_by_id() {
        let uc = GetTagUseCase {
            tags: MockTags {
                tag: Some(Tag {
                    id: 2,
                    name: "breakfast".into(),
                    slug: "breakfast".into(),
                }),
            },
        };
        assert_eq!(uc.execute(2).await.unwrap().slug, "breakfast");
    }

    #[tokio::test]
    async fn should_fail_on_missing_tag() {
        let uc = GetTagUseCase {
            tags: MockTags { tag: None },
        };
        assert!(matches!(
            uc.execute(404).await,
            Err(FoodgramError::TagNotFound)
        ));
    }

    #[tokio::test]
    async fn should_find_ingredient_by_name_substring() {
        let uc = ListIngredientsUseCase {
            ingredients: MockIngredients {
                ingredient: Some(Ingredient {
                    id: 3,
                    name: "Sea Salt".into(),
                    measurement_unit: "g".into(),
                }),
            },
        };
        assert_eq!(uc.execute(Some("salt")).await.unwrap().len(), 1);
        assert!(uc.execute(Some("pepper")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_fail_on_missing_ingredient() {
        let uc = GetIngredientUseCase {
            ingredients: MockIngredients { ingredient: None },
        };
        assert!(matches!(
            uc.execute(404).await,
            Err(FoodgramError::IngredientNotFound)
        ));
    }
}
