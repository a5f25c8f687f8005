use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use foodgram_core::health::{healthz, readyz};
use foodgram_core::middleware::request_id_layer;

use crate::handlers::{
    ingredient::{get_ingredient, list_ingredients},
    recipe::{
        add_favorite, add_to_cart, create_recipe, delete_recipe, download_shopping_cart,
        get_link, get_recipe, list_recipes, remove_favorite, remove_from_cart, update_recipe,
    },
    shortlink,
    tag::{get_tag, list_tags},
    token::{login, logout},
    user::{
        create_user, delete_avatar, get_me, get_user, list_subscriptions, list_users,
        set_avatar, set_password, subscribe, unsubscribe, update_me,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/token/login", post(login))
        .route("/auth/token/logout", delete(logout))
        // Users
        .route("/users", post(create_user))
        .route("/users", get(list_users))
        .route("/users/me", get(get_me))
        .route("/users/me", put(update_me))
        .route("/users/me/avatar", put(set_avatar))
        .route("/users/me/avatar", delete(delete_avatar))
        .route("/users/set_password", post(set_password))
        .route("/users/subscriptions", get(list_subscriptions))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/subscribe", post(subscribe))
        .route("/users/{id}/subscribe", delete(unsubscribe))
        // Reference data
        .route("/tags", get(list_tags))
        .route("/tags/{id}", get(get_tag))
        .route("/ingredients", get(list_ingredients))
        .route("/ingredients/{id}", get(get_ingredient))
        // Recipes
        .route("/recipes", get(list_recipes))
        .route("/recipes", post(create_recipe))
        .route("/recipes/download_shopping_cart", get(download_shopping_cart))
        .route("/recipes/{id}", get(get_recipe))
        .route("/recipes/{id}", patch(update_recipe))
        .route("/recipes/{id}", delete(delete_recipe))
        .route("/recipes/{id}/favorite", post(add_favorite))
        .route("/recipes/{id}/favorite", delete(remove_favorite))
        .route("/recipes/{id}/shopping_cart", post(add_to_cart))
        .route("/recipes/{id}/shopping_cart", delete(remove_from_cart))
        .route("/recipes/{id}/get-link", get(get_link))
        // Short links
        .route("/r/{slug}", get(shortlink::resolve))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
