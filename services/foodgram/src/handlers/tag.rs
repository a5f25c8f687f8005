use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::domain::types::Tag;
use crate::error::FoodgramError;
use crate::state::AppState;
use crate::usecase::reference::{GetTagUseCase, ListTagsUseCase};

#[derive(Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        }
    }
}

// ── GET /tags ────────────────────────────────────────────────────────────────

pub async fn list_tags(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, FoodgramError> {
    let uc = ListTagsUseCase {
        tags: state.tag_repo(),
    };
    let tags = uc.execute().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

// ── GET /tags/{id} ───────────────────────────────────────────────────────────

pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TagResponse>, FoodgramError> {
    let uc = GetTagUseCase {
        tags: state.tag_repo(),
    };
    Ok(Json(uc.execute(id).await?.into()))
}
