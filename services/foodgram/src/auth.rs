//! Bearer-token identity extractors backed by the token store.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::domain::repository::TokenRepository;
use crate::domain::types::User;
use crate::error::FoodgramError;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization` header.
///
/// Rejects with 401 when the header is absent, malformed, or names a key
/// the token store does not know.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user: User,
    /// The presented token key, kept so logout can revoke it.
    pub token_key: String,
}

/// Optional variant for endpoints that also serve anonymous callers.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

fn bearer_key(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(http::header::AUTHORIZATION)?.to_str().ok()?;
    let key = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some(key.to_owned())
}

impl FromRequestParts<AppState> for Identity {
    type Rejection = FoodgramError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = bearer_key(parts);
        let tokens = state.token_repo();
        async move {
            let key = key.ok_or(FoodgramError::Unauthorized)?;
            let user = tokens
                .find_user_by_key(&key)
                .await?
                .ok_or(FoodgramError::Unauthorized)?;
            Ok(Self {
                user,
                token_key: key,
            })
        }
    }
}

impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = FoodgramError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = bearer_key(parts);
        let tokens = state.token_repo();
        async move {
            let Some(key) = key else {
                return Ok(Self(None));
            };
            // A presented but unknown key is still rejected; only a missing
            // header counts as anonymous.
            let user = tokens
                .find_user_by_key(&key)
                .await?
                .ok_or(FoodgramError::Unauthorized)?;
            Ok(Self(Some(Identity {
                user,
                token_key: key,
            })))
        }
    }
}
