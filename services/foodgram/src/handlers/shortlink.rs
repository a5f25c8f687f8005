use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::FoodgramError;
use crate::state::AppState;
use crate::usecase::recipe::ResolveShortLinkUseCase;

// ── GET /r/{slug} ────────────────────────────────────────────────────────────

pub async fn resolve(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Redirect, FoodgramError> {
    let uc = ResolveShortLinkUseCase {
        recipes: state.recipe_repo(),
    };
    let recipe_id = uc.execute(&slug).await?;
    Ok(Redirect::temporary(&format!(
        "{}/recipes/{recipe_id}",
        state.public_url
    )))
}
