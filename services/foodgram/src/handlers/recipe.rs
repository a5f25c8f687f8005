use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{Identity, MaybeIdentity};
use crate::domain::repository::{CartRepository, FavoriteRepository, SubscriptionRepository};
use crate::domain::types::{IngredientEntry, RecipeDetails, RecipeFields, RecipeFilter};
use crate::error::FoodgramError;
use crate::handlers::media_url;
use crate::handlers::tag::TagResponse;
use crate::handlers::user::{PageQuery, RecipeShortResponse, UserResponse};
use crate::infra::media::RECIPE_IMAGE_DIR;
use crate::state::AppState;
use crate::usecase::cart::{AddToCartUseCase, RemoveFromCartUseCase};
use crate::usecase::favorite::{AddFavoriteUseCase, RemoveFavoriteUseCase};
use crate::usecase::recipe::{
    CreateRecipeInput, CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeLinkUseCase,
    GetRecipeUseCase, ListRecipesUseCase, UpdateRecipeInput, UpdateRecipeUseCase,
};
use crate::usecase::shopping_list::DownloadShoppingListUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeResponse {
    fn new(public_url: &str, details: RecipeDetails, flags: ViewerFlags) -> Self {
        Self {
            id: details.recipe.id,
            tags: details.tags.into_iter().map(TagResponse::from).collect(),
            author: UserResponse::new(public_url, details.author, flags.author_subscribed),
            ingredients: details
                .ingredients
                .into_iter()
                .map(|entry| RecipeIngredientResponse {
                    id: entry.ingredient.id,
                    name: entry.ingredient.name,
                    measurement_unit: entry.ingredient.measurement_unit,
                    amount: entry.amount,
                })
                .collect(),
            is_favorited: flags.favorited,
            is_in_shopping_cart: flags.in_cart,
            name: details.recipe.name,
            image: media_url(public_url, &details.recipe.image),
            text: details.recipe.text,
            cooking_time: details.recipe.cooking_time,
        }
    }
}

#[derive(Default, Clone, Copy)]
struct ViewerFlags {
    favorited: bool,
    in_cart: bool,
    author_subscribed: bool,
}

/// Viewer-relative flags for a batch of recipes, one query per relation.
async fn viewer_flags(
    state: &AppState,
    viewer: Option<Uuid>,
    details: &[RecipeDetails],
) -> Result<Vec<ViewerFlags>, FoodgramError> {
    let Some(viewer) = viewer else {
        return Ok(vec![ViewerFlags::default(); details.len()]);
    };
    let ids: Vec<i32> = details.iter().map(|d| d.recipe.id).collect();
    let favorited = state.favorite_repo().member_recipe_ids(viewer, &ids).await?;
    let in_cart = state.cart_repo().member_recipe_ids(viewer, &ids).await?;

    let mut flags = Vec::with_capacity(details.len());
    for detail in details {
        let author = detail.recipe.author_id;
        let author_subscribed = if author == viewer {
            false
        } else {
            state.subscription_repo().exists(viewer, author).await?
        };
        flags.push(ViewerFlags {
            favorited: favorited.contains(&detail.recipe.id),
            in_cart: in_cart.contains(&detail.recipe.id),
            author_subscribed,
        });
    }
    Ok(flags)
}

async fn single_response(
    state: &AppState,
    viewer: Option<Uuid>,
    details: RecipeDetails,
) -> Result<RecipeResponse, FoodgramError> {
    let flags = viewer_flags(state, viewer, std::slice::from_ref(&details)).await?;
    Ok(RecipeResponse::new(&state.public_url, details, flags[0]))
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientEntryRequest {
    pub id: i32,
    pub amount: i32,
}

#[derive(Deserialize)]
pub struct CreateRecipeRequest {
    pub ingredients: Vec<IngredientEntryRequest>,
    pub tags: Vec<i32>,
    /// Base64 data URL.
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

#[derive(Deserialize)]
pub struct UpdateRecipeRequest {
    pub ingredients: Option<Vec<IngredientEntryRequest>>,
    pub tags: Option<Vec<i32>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
}

fn entries(requests: Vec<IngredientEntryRequest>) -> Vec<IngredientEntry> {
    requests
        .into_iter()
        .map(|e| IngredientEntry {
            id: e.id,
            amount: e.amount,
        })
        .collect()
}

// ── GET /recipes ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipeListQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub author: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

pub async fn list_recipes(
    viewer: MaybeIdentity,
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<Vec<RecipeResponse>>, FoodgramError> {
    let viewer_id = viewer.0.as_ref().map(|identity| identity.user.id);
    let page = PageQuery {
        limit: query.limit,
        page: query.page,
    }
    .to_page();

    // Membership filters only apply to authenticated callers.
    let truthy = |value: &Option<String>| matches!(value.as_deref(), Some("1") | Some("true"));
    let filter = RecipeFilter {
        author: query.author,
        tag_slugs: query.tags,
        favorited_by: viewer_id.filter(|_| truthy(&query.is_favorited)),
        in_cart_of: viewer_id.filter(|_| truthy(&query.is_in_shopping_cart)),
    };

    let uc = ListRecipesUseCase {
        recipes: state.recipe_repo(),
    };
    let details = uc.execute(&filter, page).await?;
    let flags = viewer_flags(&state, viewer_id, &details).await?;
    let items = details
        .into_iter()
        .zip(flags)
        .map(|(detail, flags)| RecipeResponse::new(&state.public_url, detail, flags))
        .collect();
    Ok(Json(items))
}

// ── POST /recipes ────────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), FoodgramError> {
    let media = state.media_store();
    let image = media
        .store_image("image", RECIPE_IMAGE_DIR, &body.image)
        .await?;
    let uc = CreateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
    };
    let result = uc
        .execute(
            identity.user.id,
            CreateRecipeInput {
                fields: RecipeFields {
                    name: body.name,
                    text: body.text,
                    cooking_time: body.cooking_time,
                    image: image.clone(),
                },
                tag_ids: body.tags,
                ingredients: entries(body.ingredients),
            },
        )
        .await;
    let details = match result {
        Ok(details) => details,
        Err(err) => {
            // No orphan files for rejected requests.
            media.discard(&image).await;
            return Err(err);
        }
    };
    let response = single_response(&state, Some(identity.user.id), details).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

// ── GET /recipes/{id} ────────────────────────────────────────────────────────

pub async fn get_recipe(
    viewer: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, FoodgramError> {
    let uc = GetRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    let details = uc.execute(id).await?;
    let viewer_id = viewer.0.as_ref().map(|identity| identity.user.id);
    Ok(Json(single_response(&state, viewer_id, details).await?))
}

// ── PATCH /recipes/{id} ──────────────────────────────────────────────────────

pub async fn update_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, FoodgramError> {
    let media = state.media_store();
    let image = match body.image {
        Some(data_url) => Some(
            media
                .store_image("image", RECIPE_IMAGE_DIR, &data_url)
                .await?,
        ),
        None => None,
    };
    let uc = UpdateRecipeUseCase {
        recipes: state.recipe_repo(),
        tags: state.tag_repo(),
        ingredients: state.ingredient_repo(),
    };
    let result = uc
        .execute(
            identity.user.id,
            id,
            UpdateRecipeInput {
                name: body.name,
                text: body.text,
                cooking_time: body.cooking_time,
                image: image.clone(),
                tag_ids: body.tags,
                ingredients: body.ingredients.map(entries),
            },
        )
        .await;
    let details = match result {
        Ok(details) => details,
        Err(err) => {
            // The recipe keeps its prior image on any failure, including a
            // non-author rejection; drop the file we just wrote.
            if let Some(image) = image {
                media.discard(&image).await;
            }
            return Err(err);
        }
    };
    let response = single_response(&state, Some(identity.user.id), details).await?;
    Ok(Json(response))
}

// ── DELETE /recipes/{id} ─────────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, FoodgramError> {
    let uc = DeleteRecipeUseCase {
        recipes: state.recipe_repo(),
    };
    uc.execute(identity.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST / DELETE /recipes/{id}/favorite ─────────────────────────────────────

pub async fn add_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), FoodgramError> {
    let uc = AddFavoriteUseCase {
        recipes: state.recipe_repo(),
        favorites: state.favorite_repo(),
    };
    let recipe = uc.execute(identity.user.id, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::new(&state.public_url, recipe)),
    ))
}

pub async fn remove_favorite(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, FoodgramError> {
    let uc = RemoveFavoriteUseCase {
        recipes: state.recipe_repo(),
        favorites: state.favorite_repo(),
    };
    uc.execute(identity.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST / DELETE /recipes/{id}/shopping_cart ────────────────────────────────

pub async fn add_to_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), FoodgramError> {
    let uc = AddToCartUseCase {
        recipes: state.recipe_repo(),
        cart: state.cart_repo(),
    };
    let recipe = uc.execute(identity.user.id, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::new(&state.public_url, recipe)),
    ))
}

pub async fn remove_from_cart(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, FoodgramError> {
    let uc = RemoveFromCartUseCase {
        recipes: state.recipe_repo(),
        cart: state.cart_repo(),
    };
    uc.execute(identity.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /recipes/download_shopping_cart ──────────────────────────────────────

pub async fn download_shopping_cart(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, FoodgramError> {
    let uc = DownloadShoppingListUseCase {
        cart: state.cart_repo(),
    };
    let text = uc.execute(identity.user.id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping_list.txt\"",
            ),
        ],
        text,
    ))
}

// ── GET /recipes/{id}/get-link ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ShortLinkResponse>, FoodgramError> {
    let uc = GetRecipeLinkUseCase {
        recipes: state.recipe_repo(),
    };
    let short_link = uc.execute(id, &state.public_url).await?;
    Ok(Json(ShortLinkResponse { short_link }))
}
