use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Foodgram service error variants.
///
/// Duplicate-transition conflicts (subscribing twice, unfavoriting something
/// never favorited, ...) surface as 400, matching the public API contract.
#[derive(Debug, thiserror::Error)]
pub enum FoodgramError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },
    #[error("recipe must have at least one tag")]
    MissingTags,
    #[error("recipe must have at least one ingredient")]
    MissingIngredients,
    #[error("cannot subscribe to yourself")]
    SelfSubscription,
    #[error("already subscribed")]
    AlreadySubscribed,
    #[error("not subscribed")]
    NotSubscribed,
    #[error("recipe already favorited")]
    AlreadyFavorited,
    #[error("recipe not favorited")]
    NotFavorited,
    #[error("recipe already in shopping cart")]
    AlreadyInCart,
    #[error("recipe not in shopping cart")]
    NotInCart,
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("ingredient not found")]
    IngredientNotFound,
    #[error("shopping cart is empty")]
    EmptyCart,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl FoodgramError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION",
            Self::MissingTags => "MISSING_TAGS",
            Self::MissingIngredients => "MISSING_INGREDIENTS",
            Self::SelfSubscription => "SELF_SUBSCRIPTION",
            Self::AlreadySubscribed => "ALREADY_SUBSCRIBED",
            Self::NotSubscribed => "NOT_SUBSCRIBED",
            Self::AlreadyFavorited => "ALREADY_FAVORITED",
            Self::NotFavorited => "NOT_FAVORITED",
            Self::AlreadyInCart => "ALREADY_IN_CART",
            Self::NotInCart => "NOT_IN_CART",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::IngredientNotFound => "INGREDIENT_NOT_FOUND",
            Self::EmptyCart => "EMPTY_CART",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for FoodgramError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation { .. }
            | Self::MissingTags
            | Self::MissingIngredients
            | Self::SelfSubscription
            | Self::AlreadySubscribed
            | Self::NotSubscribed
            | Self::AlreadyFavorited
            | Self::NotFavorited
            | Self::AlreadyInCart
            | Self::NotInCart
            | Self::EmailTaken
            | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::RecipeNotFound
            | Self::TagNotFound
            | Self::IngredientNotFound
            | Self::EmptyCart => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors; TraceLayer already records them.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation { field, .. } = self {
            body["field"] = serde_json::Value::String(field.to_owned());
        }
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    async fn assert_error(
        error: FoodgramError,
        expected_status: StatusCode,
        expected_kind: &str,
    ) -> serde_json::Value {
        let resp = error.into_response();
        assert_eq!(resp.status(), expected_status);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], expected_kind);
        json
    }

    #[tokio::test]
    async fn should_return_400_for_validation_with_field_name() {
        let json = assert_error(
            FoodgramError::Validation {
                field: "cooking_time",
                message: "must be between 1 and 32000".into(),
            },
            StatusCode::BAD_REQUEST,
            "VALIDATION",
        )
        .await;
        assert_eq!(json["field"], "cooking_time");
    }

    #[tokio::test]
    async fn should_return_400_for_duplicate_transitions() {
        assert_error(
            FoodgramError::AlreadySubscribed,
            StatusCode::BAD_REQUEST,
            "ALREADY_SUBSCRIBED",
        )
        .await;
        assert_error(
            FoodgramError::NotFavorited,
            StatusCode::BAD_REQUEST,
            "NOT_FAVORITED",
        )
        .await;
        assert_error(
            FoodgramError::NotInCart,
            StatusCode::BAD_REQUEST,
            "NOT_IN_CART",
        )
        .await;
    }

    #[tokio::test]
    async fn should_return_404_for_missing_entities_and_empty_cart() {
        assert_error(
            FoodgramError::RecipeNotFound,
            StatusCode::NOT_FOUND,
            "RECIPE_NOT_FOUND",
        )
        .await;
        assert_error(FoodgramError::EmptyCart, StatusCode::NOT_FOUND, "EMPTY_CART").await;
    }

    #[tokio::test]
    async fn should_return_401_unauthorized_and_403_forbidden() {
        assert_error(
            FoodgramError::Unauthorized,
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
        )
        .await;
        assert_error(FoodgramError::Forbidden, StatusCode::FORBIDDEN, "FORBIDDEN").await;
    }

    #[tokio::test]
    async fn should_return_500_for_internal() {
        assert_error(
            FoodgramError::Internal(anyhow::anyhow!("db down")),
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL",
        )
        .await;
    }
}
