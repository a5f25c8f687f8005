//! Random short-code generation for recipe slugs and auth tokens.

use rand::{RngExt, distr::Alphanumeric};

/// Length of generated recipe slugs.
pub const SLUG_LEN: usize = 8;

/// Length of opaque auth token keys.
pub const TOKEN_LEN: usize = 40;

fn random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a random recipe slug. Uniqueness is enforced by the store;
/// callers retry on collision.
pub fn generate_slug() -> String {
    random_code(SLUG_LEN)
}

/// Generate an opaque bearer token key.
pub fn generate_token_key() -> String {
    random_code(TOKEN_LEN)
}

/// Whether `slug` is non-empty and contains only letters, digits, hyphens
/// and underscores. Applies to both tag slugs and recipe slugs.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
