use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub google_places_api_key: String,
    pub places_base_url: String,
    pub places_timeout_secs: u64,
    pub vet_search_radius_meters: u32,
    pub vet_search_keyword: String,
    pub cors_origins: Vec<String>,
    /// Raw `subject:token` pairs; parsed by the server's identity resolver.
    pub api_tokens: Vec<String>,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self.env, Environment::Development)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("google_places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("vet_search_radius_meters", &self.vet_search_radius_meters)
            .field("vet_search_keyword", &self.vet_search_keyword)
            .field("cors_origins", &self.cors_origins)
            .field("api_tokens", &format!("[{} redacted]", self.api_tokens.len()))
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
