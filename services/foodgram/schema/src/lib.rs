//! sea-orm entities for the Foodgram database, one module per table.

pub mod auth_tokens;
pub mod cart_items;
pub mod favorites;
pub mod ingredients;
pub mod recipe_ingredients;
pub mod recipe_tags;
pub mod recipes;
pub mod subscriptions;
pub mod tags;
pub mod users;
