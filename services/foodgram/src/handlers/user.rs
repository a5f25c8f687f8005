use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_domain::pagination::PageRequest;

use crate::auth::{Identity, MaybeIdentity};
use crate::domain::repository::SubscriptionRepository;
use crate::domain::types::{AuthorCard, Recipe, User};
use crate::error::FoodgramError;
use crate::handlers::media_url;
use crate::infra::media::AVATAR_DIR;
use crate::state::AppState;
use crate::usecase::subscription::{
    ListSubscriptionsUseCase, SubscribeUseCase, UnsubscribeUseCase,
};
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, GetUserUseCase, ListUsersUseCase, SetAvatarUseCase,
    SetPasswordUseCase, UpdateProfileUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl UserResponse {
    pub fn new(public_url: &str, user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
            avatar: user.avatar.map(|path| media_url(public_url, &path)),
        }
    }
}

/// Abbreviated recipe card used inside subscription listings.
#[derive(Serialize)]
pub struct RecipeShortResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl RecipeShortResponse {
    pub fn new(public_url: &str, recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: media_url(public_url, &recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}

#[derive(Serialize)]
pub struct AuthorCardResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeShortResponse>,
    pub recipes_count: u64,
}

impl AuthorCardResponse {
    fn new(public_url: &str, card: AuthorCard, is_subscribed: bool) -> Self {
        Self {
            user: UserResponse::new(public_url, card.author, is_subscribed),
            recipes: card
                .recipes
                .into_iter()
                .map(|recipe| RecipeShortResponse::new(public_url, recipe))
                .collect(),
            recipes_count: card.recipes_count,
        }
    }
}

async fn is_subscribed_flag(
    state: &AppState,
    viewer: &MaybeIdentity,
    author: Uuid,
) -> Result<bool, FoodgramError> {
    match &viewer.0 {
        Some(identity) if identity.user.id != author => {
            state.subscription_repo().exists(identity.user.id, author).await
        }
        _ => Ok(false),
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn to_page(&self) -> PageRequest {
        let mut page = PageRequest::default();
        if let Some(limit) = self.limit {
            page.limit = limit;
        }
        if let Some(number) = self.page {
            page.page = number;
        }
        page.clamped()
    }
}

#[derive(Deserialize, Default)]
pub struct SubscriptionQuery {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub recipes_limit: Option<u64>,
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), FoodgramError> {
    let uc = CreateUserUseCase {
        users: state.user_repo(),
    };
    let user = uc
        .execute(CreateUserInput {
            email: body.email,
            username: body.username,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(&state.public_url, user, false)),
    ))
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    viewer: MaybeIdentity,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<UserResponse>>, FoodgramError> {
    let uc = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = uc.execute(query.to_page()).await?;
    let mut items = Vec::with_capacity(users.len());
    for user in users {
        let is_subscribed = is_subscribed_flag(&state, &viewer, user.id).await?;
        items.push(UserResponse::new(&state.public_url, user, is_subscribed));
    }
    Ok(Json(items))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    viewer: MaybeIdentity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, FoodgramError> {
    let uc = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = uc.execute(id).await?;
    let is_subscribed = is_subscribed_flag(&state, &viewer, user.id).await?;
    Ok(Json(UserResponse::new(&state.public_url, user, is_subscribed)))
}

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, FoodgramError> {
    Ok(Json(UserResponse::new(
        &state.public_url,
        identity.user,
        false,
    )))
}

// ── PUT /users/me ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, FoodgramError> {
    let uc = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = uc
        .execute(identity.user.id, body.first_name, body.last_name)
        .await?;
    Ok(Json(UserResponse::new(&state.public_url, user, false)))
}

// ── PUT / DELETE /users/me/avatar ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetAvatarRequest {
    pub avatar: String,
}

#[derive(Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

pub async fn set_avatar(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<SetAvatarRequest>,
) -> Result<Json<AvatarResponse>, FoodgramError> {
    let stored = state
        .media_store()
        .store_image("avatar", AVATAR_DIR, &body.avatar)
        .await?;
    let uc = SetAvatarUseCase {
        users: state.user_repo(),
    };
    uc.execute(identity.user.id, Some(stored.clone())).await?;
    Ok(Json(AvatarResponse {
        avatar: media_url(&state.public_url, &stored),
    }))
}

pub async fn delete_avatar(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<StatusCode, FoodgramError> {
    let uc = SetAvatarUseCase {
        users: state.user_repo(),
    };
    uc.execute(identity.user.id, None).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /users/set_password ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn set_password(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<SetPasswordRequest>,
) -> Result<StatusCode, FoodgramError> {
    let uc = SetPasswordUseCase {
        users: state.user_repo(),
    };
    uc.execute(identity.user.id, &body.current_password, &body.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST / DELETE /users/{id}/subscribe ──────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<u64>,
}

pub async fn subscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<RecipesLimitQuery>,
) -> Result<(StatusCode, Json<AuthorCardResponse>), FoodgramError> {
    let uc = SubscribeUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
    };
    let card = uc
        .execute(identity.user.id, id, query.recipes_limit)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthorCardResponse::new(&state.public_url, card, true)),
    ))
}

pub async fn unsubscribe(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, FoodgramError> {
    let uc = UnsubscribeUseCase {
        users: state.user_repo(),
        subscriptions: state.subscription_repo(),
    };
    uc.execute(identity.user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/subscriptions ─────────────────────────────────────────────────

pub async fn list_subscriptions(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<Json<Vec<AuthorCardResponse>>, FoodgramError> {
    let page = PageQuery {
        limit: query.limit,
        page: query.page,
    }
    .to_page();
    let uc = ListSubscriptionsUseCase {
        subscriptions: state.subscription_repo(),
        recipes: state.recipe_repo(),
    };
    let cards = uc
        .execute(identity.user.id, page, query.recipes_limit)
        .await?;
    let items = cards
        .into_iter()
        .map(|card| AuthorCardResponse::new(&state.public_url, card, true))
        .collect();
    Ok(Json(items))
}
