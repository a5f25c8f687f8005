use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::Ingredient;
use crate::error::FoodgramError;
use crate::state::AppState;
use crate::usecase::reference::{GetIngredientUseCase, ListIngredientsUseCase};

#[derive(Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

// ── GET /ingredients ─────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct IngredientQuery {
    pub name: Option<String>,
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<Vec<IngredientResponse>>, FoodgramError> {
    let uc = ListIngredientsUseCase {
        ingredients: state.ingredient_repo(),
    };
    let ingredients = uc.execute(query.name.as_deref()).await?;
    Ok(Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

// ── GET /ingredients/{id} ────────────────────────────────────────────────────

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<IngredientResponse>, FoodgramError> {
    let uc = GetIngredientUseCase {
        ingredients: state.ingredient_repo(),
    };
    Ok(Json(uc.execute(id).await?.into()))
}
