use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    /// Base URL the gateway and upload callbacks use (e.g. https://shop.example.com)
    pub base_url: String,
    /// Development tier gates the mock-data read fallback; never enabled in production.
    pub dev_mode: bool,
    /// Serve entirely from the fixture store instead of SQLite.
    pub use_mock_data: bool,
    /// Bearer token required on mutating routes (create/update/delete/upload).
    pub admin_token: Option<String>,
    pub image_host_url: String,
    pub image_host_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("WAFRAH_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let use_mock_data = env::var("USE_MOCK_DATA")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "wafrah.db".to_string()),
            base_url,
            dev_mode,
            use_mock_data,
            admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            image_host_url: env::var("IMAGE_HOST_URL")
                .unwrap_or_else(|_| "https://images.wafrah.dev".to_string()),
            image_host_key: env::var("IMAGE_HOST_KEY").ok(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
