pub mod ingredient;
pub mod recipe;
pub mod shortlink;
pub mod tag;
pub mod token;
pub mod user;

/// Absolute URL of a stored media path.
pub(crate) fn media_url(public_url: &str, path: &str) -> String {
    format!("{public_url}/media/{path}")
}
