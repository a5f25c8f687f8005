/// Foodgram service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct FoodgramConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 8000). Env var: `FOODGRAM_PORT`.
    pub port: u16,
    /// Externally visible base URL, used for short links
    /// (e.g. "https://foodgram.example"). Env var: `PUBLIC_URL`.
    pub public_url: String,
    /// Directory for uploaded images (default "media"). Env var: `MEDIA_ROOT`.
    pub media_root: String,
}

impl FoodgramConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            port: std::env::var("FOODGRAM_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            public_url: std::env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_owned()),
            media_root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_owned()),
        }
    }
}
