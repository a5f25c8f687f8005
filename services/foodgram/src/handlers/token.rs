use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::error::FoodgramError;
use crate::state::AppState;
use crate::usecase::token::{LoginUseCase, LogoutUseCase};

// ── POST /auth/token/login ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub auth_token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), FoodgramError> {
    let uc = LoginUseCase {
        users: state.user_repo(),
        tokens: state.token_repo(),
    };
    let token = uc.execute(&body.email, &body.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            auth_token: token.key,
        }),
    ))
}

// ── DELETE /auth/token/logout ────────────────────────────────────────────────

pub async fn logout(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<StatusCode, FoodgramError> {
    let uc = LogoutUseCase {
        tokens: state.token_repo(),
    };
    uc.execute(&identity.token_key).await?;
    Ok(StatusCode::NO_CONTENT)
}
