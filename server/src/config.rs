/// Environment-driven application settings.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Self {
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Self {
            cors_allowed_origins,
        }
    }
}
