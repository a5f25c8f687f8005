//! Recipe assembly: validation, transactional create/update, slug handling.

use uuid::Uuid;

use foodgram_domain::bounds::{POSITIVE_MAX, POSITIVE_MIN, in_positive_range};
use foodgram_domain::pagination::PageRequest;
use foodgram_domain::slug::{generate_slug, is_valid_slug};

use crate::domain::repository::{IngredientRepository, RecipeRepository, TagRepository};
use crate::domain::types::{
    IngredientEntry, RecipeDetails, RecipeFields, RecipeFilter,
};
use crate::error::FoodgramError;

/// Attempts before giving up on finding a free slug.
const MAX_SLUG_ATTEMPTS: usize = 5;

fn range_message() -> String {
    format!("must be between {POSITIVE_MIN} and {POSITIVE_MAX}")
}

fn has_duplicates(ids: impl Iterator<Item = i32>) -> bool {
    let mut seen = Vec::new();
    for id in ids {
        if seen.contains(&id) {
            return true;
        }
        seen.push(id);
    }
    false
}

/// Shared validation for create and update. Join collections must be
/// non-empty, pairwise distinct and within numeric bounds.
pub fn validate_recipe(
    fields: &RecipeFields,
    tag_ids: &[i32],
    ingredients: &[IngredientEntry],
) -> Result<(), FoodgramError> {
    if fields.name.trim().is_empty() {
        return Err(FoodgramError::Validation {
            field: "name",
            message: "must not be empty".into(),
        });
    }
    if !in_positive_range(fields.cooking_time) {
        return Err(FoodgramError::Validation {
            field: "cooking_time",
            message: range_message(),
        });
    }
    if tag_ids.is_empty() {
        return Err(FoodgramError::MissingTags);
    }
    if has_duplicates(tag_ids.iter().copied()) {
        return Err(FoodgramError::Validation {
            field: "tags",
            message: "duplicate tag id".into(),
        });
    }
    if ingredients.is_empty() {
        return Err(FoodgramError::MissingIngredients);
    }
    if has_duplicates(ingredients.iter().map(|e| e.id)) {
        return Err(FoodgramError::Validation {
            field: "ingredients",
            message: "duplicate ingredient id".into(),
        });
    }
    if let Some(bad) = ingredients.iter().find(|e| !in_positive_range(e.amount)) {
        return Err(FoodgramError::Validation {
            field: "ingredients",
            message: format!("amount for ingredient {}: {}", bad.id, range_message()),
        });
    }
    Ok(())
}

async fn resolve_references<T: TagRepository, I: IngredientRepository>(
    tags: &T,
    ingredients: &I,
    tag_ids: &[i32],
    entries: &[IngredientEntry],
) -> Result<(), FoodgramError> {
    let found_tags = tags.find_by_ids(tag_ids).await?;
    if found_tags.len() != tag_ids.len() {
        return Err(FoodgramError::Validation {
            field: "tags",
            message: "unknown tag id".into(),
        });
    }
    let ids: Vec<i32> = entries.iter().map(|e| e.id).collect();
    let found_ingredients = ingredients.find_by_ids(&ids).await?;
    if found_ingredients.len() != ids.len() {
        return Err(FoodgramError::Validation {
            field: "ingredients",
            message: "unknown ingredient id".into(),
        });
    }
    Ok(())
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeInput {
    pub fields: RecipeFields,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientEntry>,
}

pub struct CreateRecipeUseCase<R: RecipeRepository, T: TagRepository, I: IngredientRepository> {
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository> CreateRecipeUseCase<R, T, I> {
    pub async fn execute(
        &self,
        author_id: Uuid,
        input: CreateRecipeInput,
    ) -> Result<RecipeDetails, FoodgramError> {
        validate_recipe(&input.fields, &input.tag_ids, &input.ingredients)?;
        resolve_references(
            &self.tags,
            &self.ingredients,
            &input.tag_ids,
            &input.ingredients,
        )
        .await?;

        // Slug uniqueness is settled by the store; regenerate on collision.
        for _ in 0..MAX_SLUG_ATTEMPTS {
            let slug = generate_slug();
            let created = self
                .recipes
                .create(
                    author_id,
                    &input.fields,
                    &slug,
                    &input.tag_ids,
                    &input.ingredients,
                )
                .await?;
            if let Some(id) = created {
                return self
                    .recipes
                    .details(id)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("created recipe {id} not readable").into());
            }
        }
        Err(anyhow::anyhow!("could not find a free slug in {MAX_SLUG_ATTEMPTS} attempts").into())
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateRecipeInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<String>,
    /// Unlike create, update requires the full tag set to be resupplied.
    pub tag_ids: Option<Vec<i32>>,
    /// Same for the ingredient set.
    pub ingredients: Option<Vec<IngredientEntry>>,
}

pub struct UpdateRecipeUseCase<R: RecipeRepository, T: TagRepository, I: IngredientRepository> {
    pub recipes: R,
    pub tags: T,
    pub ingredients: I,
}

impl<R: RecipeRepository, T: TagRepository, I: IngredientRepository> UpdateRecipeUseCase<R, T, I> {
    pub async fn execute(
        &self,
        actor_id: Uuid,
        recipe_id: i32,
        input: UpdateRecipeInput,
    ) -> Result<RecipeDetails, FoodgramError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)?;
        if recipe.author_id != actor_id {
            return Err(FoodgramError::Forbidden);
        }

        let tag_ids = input
            .tag_ids
            .filter(|ids| !ids.is_empty())
            .ok_or(FoodgramError::MissingTags)?;
        let ingredients = input
            .ingredients
            .filter(|entries| !entries.is_empty())
            .ok_or(FoodgramError::MissingIngredients)?;

        let fields = RecipeFields {
            name: input.name.unwrap_or(recipe.name),
            text: input.text.unwrap_or(recipe.text),
            cooking_time: input.cooking_time.unwrap_or(recipe.cooking_time),
            image: input.image.unwrap_or(recipe.image),
        };
        validate_recipe(&fields, &tag_ids, &ingredients)?;
        resolve_references(&self.tags, &self.ingredients, &tag_ids, &ingredients).await?;

        self.recipes
            .update(recipe_id, &fields, &tag_ids, &ingredients)
            .await?;
        self.recipes
            .details(recipe_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("updated recipe {recipe_id} not readable").into())
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(&self, actor_id: Uuid, recipe_id: i32) -> Result<(), FoodgramError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)?;
        if recipe.author_id != actor_id {
            return Err(FoodgramError::Forbidden);
        }
        self.recipes.delete(recipe_id).await?;
        Ok(())
    }
}

// ── GetRecipe / ListRecipes ──────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(&self, recipe_id: i32) -> Result<RecipeDetails, FoodgramError> {
        self.recipes
            .details(recipe_id)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)
    }
}

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    pub async fn execute(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Vec<RecipeDetails>, FoodgramError> {
        self.recipes.list(filter, page).await
    }
}

// ── Short links ──────────────────────────────────────────────────────────────

pub struct GetRecipeLinkUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> GetRecipeLinkUseCase<R> {
    pub async fn execute(&self, recipe_id: i32, public_url: &str) -> Result<String, FoodgramError> {
        let recipe = self
            .recipes
            .find_by_id(recipe_id)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)?;
        Ok(format!("{public_url}/r/{}", recipe.slug))
    }
}

pub struct ResolveShortLinkUseCase<R: RecipeRepository> {
    pub recipes: R,
}

impl<R: RecipeRepository> ResolveShortLinkUseCase<R> {
    /// Resolve a slug to the recipe id the short link redirects to.
    pub async fn execute(&self, slug: &str) -> Result<i32, FoodgramError> {
        if !is_valid_slug(slug) {
            return Err(FoodgramError::RecipeNotFound);
        }
        let recipe = self
            .recipes
            .find_by_slug(slug)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)?;
        Ok(recipe.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Ingredient, Recipe, Tag, User};
    use chrono::Utc;
    use std::sync::Mutex;

    fn fields(cooking_time: i32) -> RecipeFields {
        RecipeFields {
            name: "Shchi".into(),
            text: "Boil cabbage.".into(),
            cooking_time,
            image: "recipes/images/shchi.png".into(),
        }
    }

    fn entry(id: i32, amount: i32) -> IngredientEntry {
        IngredientEntry { id, amount }
    }

    #[test]
    fn should_accept_cooking_time_boundaries() {
        assert!(validate_recipe(&fields(1), &[1], &[entry(1, 10)]).is_ok());
        assert!(validate_recipe(&fields(32000), &[1], &[entry(1, 10)]).is_ok());
    }

    #[test]
    fn should_reject_cooking_time_out_of_range() {
        for bad in [0, 32001] {
            let result = validate_recipe(&fields(bad), &[1], &[entry(1, 10)]);
            assert!(matches!(
                result,
                Err(FoodgramError::Validation {
                    field: "cooking_time",
                    ..
                })
            ));
        }
    }

    #[test]
    fn should_reject_empty_tag_and_ingredient_sets() {
        assert!(matches!(
            validate_recipe(&fields(10), &[], &[entry(1, 10)]),
            Err(FoodgramError::MissingTags)
        ));
        assert!(matches!(
            validate_recipe(&fields(10), &[1], &[]),
            Err(FoodgramError::MissingIngredients)
        ));
    }

    #[test]
    fn should_reject_duplicate_ids() {
        assert!(matches!(
            validate_recipe(&fields(10), &[1, 1], &[entry(1, 10)]),
            Err(FoodgramError::Validation { field: "tags", .. })
        ));
        assert!(matches!(
            validate_recipe(&fields(10), &[1], &[entry(2, 10), entry(2, 20)]),
            Err(FoodgramError::Validation {
                field: "ingredients",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_amount_out_of_range() {
        for bad in [0, 32001] {
            assert!(matches!(
                validate_recipe(&fields(10), &[1], &[entry(1, bad)]),
                Err(FoodgramError::Validation {
                    field: "ingredients",
                    ..
                })
            ));
        }
    }

    // ── stateful mock for create/update paths ───────────────────────────────

    struct MockRecipes {
        recipe: Option<Recipe>,
        /// Ids handed out by `create`; `None` entries simulate slug collisions.
        create_outcomes: Mutex<Vec<Option<i32>>>,
        update_calls: Mutex<usize>,
    }

    impl MockRecipes {
        fn with_recipe(recipe: Option<Recipe>) -> Self {
            Self {
                recipe,
                create_outcomes: Mutex::new(vec![]),
                update_calls: Mutex::new(0),
            }
        }
    }

    fn sample_recipe(id: i32, author_id: Uuid) -> Recipe {
        Recipe {
            id,
            author_id,
            name: "Shchi".into(),
            text: "Boil cabbage.".into(),
            cooking_time: 45,
            image: "recipes/images/shchi.png".into(),
            slug: "q1W2e3R4".into(),
            created_at: Utc::now(),
        }
    }

    fn sample_details(recipe: Recipe) -> RecipeDetails {
        let author_id = recipe.author_id;
        RecipeDetails {
            recipe,
            author: User {
                id: author_id,
                email: "chef@example.com".into(),
                username: "chef".into(),
                first_name: "Ann".into(),
                last_name: "Lee".into(),
                avatar: None,
                password_hash: String::new(),
                created_at: Utc::now(),
            },
            tags: vec![Tag {
                id: 1,
                name: "dinner".into(),
                slug: "dinner".into(),
            }],
            ingredients: vec![],
        }
    }

    impl RecipeRepository for MockRecipes {
        async fn find_by_id(&self, _id: i32) -> Result<Option<Recipe>, FoodgramError> {
            Ok(self.recipe.clone())
        }
        async fn find_by_slug(&self, _slug: &str) -> Result<Option<Recipe>, FoodgramError> {
            Ok(self.recipe.clone())
        }
        async fn details(&self, id: i32) -> Result<Option<RecipeDetails>, FoodgramError> {
            Ok(Some(sample_details(sample_recipe(
                id,
                self.recipe
                    .as_ref()
                    .map(|r| r.author_id)
                    .unwrap_or_else(Uuid::new_v4),
            ))))
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
            let mut outcomes = self.create_outcomes.lock().unwrap();
            Ok(outcomes.remove(0))
        }
        async fn update(
            &self,
            _id: i32,
            _fields: &RecipeFields,
            _tag_ids: &[i32],
            _ingredients: &[IngredientEntry],
        ) -> Result<(), FoodgramError> {
            *self.update_calls.lock().unwrap() += 1;
            Ok(())
        }
        async fn delete(&self, _id: i32) -> Result<bool, FoodgramError> {
            Ok(true)
        }
    }

    struct MockTags {
        known: Vec<i32>,
    }

    impl TagRepository for MockTags {
        async fn list(&self) -> Result<Vec<Tag>, FoodgramError> {
            Ok(vec![])
        }
        async fn find_by_id(&self, _id: i32) -> Result<Option<Tag>, FoodgramError> {
            Ok(None)
        }
        async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Tag>, FoodgramError> {
            Ok(ids
                .iter()
                .filter(|id| self.known.contains(id))
                .map(|&id| Tag {
                    id,
                    name: format!("tag{id}"),
                    slug: format!("tag{id}"),
                })
                .collect())
        }
    }

    struct MockIngredients {
        known: Vec<i32>,
    }

    impl IngredientRepository for MockIngredients {
        async fn search(&self, _name: Option<&str>) -> Result<Vec<Ingredient>, FoodgramError> {
            Ok(vec![])
        }
        async fn find_by_id(&self, _id: i32) -> Result<Option<Ingredient>, FoodgramError> {
            Ok(None)
        }
        async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Ingredient>, FoodgramError> {
            Ok(ids
                .iter()
                .filter(|id| self.known.contains(id))
                .map(|&id| Ingredient {
                    id,
                    name: format!("ingredient{id}"),
                    measurement_unit: "g".into(),
                })
                .collect())
        }
    }

    fn create_input() -> CreateRecipeInput {
        CreateRecipeInput {
            fields: fields(45),
            tag_ids: vec![1],
            ingredients: vec![entry(7, 100)],
        }
    }

    #[tokio::test]
    async fn should_create_recipe_with_resolvable_references() {
        let repo = MockRecipes::with_recipe(None);
        *repo.create_outcomes.lock().unwrap() = vec![Some(10)];
        let uc = CreateRecipeUseCase {
            recipes: repo,
            tags: MockTags { known: vec![1] },
            ingredients: MockIngredients { known: vec![7] },
        };
        let details = uc.execute(Uuid::new_v4(), create_input()).await.unwrap();
        assert_eq!(details.recipe.id, 10);
    }

    #[tokio::test]
    async fn should_retry_slug_on_collision() {
        let repo = MockRecipes::with_recipe(None);
        *repo.create_outcomes.lock().unwrap() = vec![None, None, Some(11)];
        let uc = CreateRecipeUseCase {
            recipes: repo,
            tags: MockTags { known: vec![1] },
            ingredients: MockIngredients { known: vec![7] },
        };
        let details = uc.execute(Uuid::new_v4(), create_input()).await.unwrap();
        assert_eq!(details.recipe.id, 11);
    }

    #[tokio::test]
    async fn should_reject_unknown_tag_id() {
        let uc = CreateRecipeUseCase {
            recipes: MockRecipes::with_recipe(None),
            tags: MockTags { known: vec![] },
            ingredients: MockIngredients { known: vec![7] },
        };
        let result = uc.execute(Uuid::new_v4(), create_input()).await;
        assert!(matches!(
            result,
            Err(FoodgramError::Validation { field: "tags", .. })
        ));
    }

    #[tokio::test]
    async fn should_reject_unknown_ingredient_id() {
        let uc = CreateRecipeUseCase {
            recipes: MockRecipes::with_recipe(None),
            tags: MockTags { known: vec![1] },
            ingredients: MockIngredients { known: vec![] },
        };
        let result = uc.execute(Uuid::new_v4(), create_input()).await;
        assert!(matches!(
            result,
            Err(FoodgramError::Validation {
                field: "ingredients",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn should_fail_update_with_missing_ingredients_without_touching_store() {
        let author_id = Uuid::new_v4();
        let repo = MockRecipes::with_recipe(Some(sample_recipe(5, author_id)));
        let uc = UpdateRecipeUseCase {
            recipes: repo,
            tags: MockTags { known: vec![1] },
            ingredients: MockIngredients { known: vec![7] },
        };
        let input = UpdateRecipeInput {
            tag_ids: Some(vec![1]),
            ingredients: Some(vec![]),
            ..Default::default()
        };
        let result = uc.execute(author_id, 5, input).await;
        assert!(matches!(result, Err(FoodgramError::MissingIngredients)));
        assert_eq!(*uc.recipes.update_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn should_fail_update_with_absent_tags() {
        let author_id = Uuid::new_v4();
        let repo = MockRecipes::with_recipe(Some(sample_recipe(5, author_id)));
        let uc = UpdateRecipeUseCase {
            recipes: repo,
            tags: MockTags { known: vec![1] },
            ingredients: MockIngredients { known: vec![7] },
        };
        let input = UpdateRecipeInput {
            ingredients: Some(vec![entry(7, 50)]),
            ..Default::default()
        };
        let result = uc.execute(author_id, 5, input).await;
        assert!(matches!(result, Err(FoodgramError::MissingTags)));
    }

    #[tokio::test]
    async fn should_forbid_update_by_non_author() {
        let repo = MockRecipes::with_recipe(Some(sample_recipe(5, Uuid::new_v4())));
        let uc = UpdateRecipeUseCase {
            recipes: repo,
            tags: MockTags { known: vec![1] },
            ingredients: MockIngredients { known: vec![7] },
        };
        let input = UpdateRecipeInput {
            tag_ids: Some(vec![1]),
            ingredients: Some(vec![entry(7, 50)]),
            ..Default::default()
        };
        let result = uc.execute(Uuid::new_v4(), 5, input).await;
        assert!(matches!(result, Err(FoodgramError::Forbidden)));
    }

    #[tokio::test]
    async fn should_update_with_full_join_sets() {
        let author_id = Uuid::new_v4();
        let repo = MockRecipes::with_recipe(Some(sample_recipe(5, author_id)));
        let uc = UpdateRecipeUseCase {
            recipes: repo,
            tags: MockTags { known: vec![1] },
            ingredients: MockIngredients { known: vec![7] },
        };
        let input = UpdateRecipeInput {
            cooking_time: Some(32000),
            tag_ids: Some(vec![1]),
            ingredients: Some(vec![entry(7, 50)]),
            ..Default::default()
        };
        assert!(uc.execute(author_id, 5, input).await.is_ok());
        assert_eq!(*uc.recipes.update_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn should_forbid_delete_by_non_author() {
        let uc = DeleteRecipeUseCase {
            recipes: MockRecipes::with_recipe(Some(sample_recipe(5, Uuid::new_v4()))),
        };
        let result = uc.execute(Uuid::new_v4(), 5).await;
        assert!(matches!(result, Err(FoodgramError::Forbidden)));
    }

    #[tokio::test]
    async fn should_build_short_link_from_slug() {
        let author_id = Uuid::new_v4();
        let uc = GetRecipeLinkUseCase {
            recipes: MockRecipes::with_recipe(Some(sample_recipe(5, author_id))),
        };
        let url = uc.execute(5, "https://foodgram.example").await.unwrap();
        assert_eq!(url, "https://foodgram.example/r/q1W2e3R4");
    }

    #[tokio::test]
    async fn should_resolve_short_link_to_recipe_id() {
        let uc = ResolveShortLinkUseCase {
            recipes: MockRecipes::with_recipe(Some(sample_recipe(5, Uuid::new_v4()))),
        };
        assert_eq!(uc.execute("q1W2e3R4").await.unwrap(), 5);
    }
}
