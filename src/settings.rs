//! Process settings from environment variables (with .env support).

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/inventory";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    /// Single allowed origin for the browser frontend.
    pub cors_origin: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()),
            cors_origin: std::env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.into()),
        }
    }
}
