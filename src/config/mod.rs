use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket receiving article media. Uploads are disabled when unset.
    pub public_bucket: Option<String>,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub is_public: bool,
    pub upload_timeout_secs: u64,
    pub api_base_url: String,
    pub public_base_url: String,
}

impl SecurityConfig {
    pub fn jwt_expiry(&self) -> Duration {
        Duration::from_secs(self.jwt_expiry_hours * 3600)
    }
}

impl StorageConfig {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env::var("PORT").ok().and_then(|v| v.parse().ok()) {
            self.server.port = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = non_empty(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v.trim().to_string();
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = parse_cors_origins(&v);
        }
        if self.environment == Environment::Development {
            self.security.cors_origins =
                append_unique_origins(&self.security.cors_origins, &local_dev_origins());
        }

        // Storage overrides
        if let Ok(v) = env::var("PUBLIC_BUCKET") {
            self.storage.public_bucket = non_empty(v);
        }
        if let Ok(v) = env::var("GCS_ACCESS_TOKEN") {
            self.storage.access_token = non_empty(v);
        }
        if let Ok(v) = env::var("STORAGE_PUBLIC") {
            self.storage.is_public = v.parse().unwrap_or(self.storage.is_public);
        }
        if let Ok(v) = env::var("STORAGE_UPLOAD_TIMEOUT_SECS") {
            self.storage.upload_timeout_secs = v.parse().unwrap_or(self.storage.upload_timeout_secs);
        }
        if let Ok(v) = env::var("GCS_API_BASE") {
            self.storage.api_base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("GCS_PUBLIC_BASE") {
            self.storage.public_base_url = v.trim_end_matches('/').to_string();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                max_request_size_bytes: 32 * 1024 * 1024, // 32MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                cors_origins: Vec::new(),
            },
            storage: StorageConfig::defaults(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                max_request_size_bytes: 32 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                cors_origins: Vec::new(),
            },
            storage: StorageConfig::defaults(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                max_request_size_bytes: 20 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 12,
                cors_origins: Vec::new(),
            },
            storage: StorageConfig::defaults(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

impl StorageConfig {
    fn defaults() -> Self {
        Self {
            public_bucket: None,
            access_token: None,
            is_public: true,
            upload_timeout_secs: 50,
            api_base_url: "https://storage.googleapis.com".to_string(),
            public_base_url: "https://storage.googleapis.com".to_string(),
        }
    }
}

fn non_empty(v: String) -> Option<String> {
    let v = v.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

fn local_dev_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

/// Split a comma-separated origin list, trimming entries and dropping empties.
pub fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append origins that are not already present, keeping the existing order.
pub fn append_unique_origins(existing: &[String], new_origins: &[String]) -> Vec<String> {
    let mut out = existing.to_vec();
    for origin in new_origins {
        if !out.contains(origin) {
            out.push(origin.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.environment, Environment::Development);
        assert!(config.storage.public_bucket.is_none());
        assert_eq!(config.storage.upload_timeout(), Duration::from_secs(50));
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.is_production());
        assert_eq!(config.security.jwt_expiry(), Duration::from_secs(12 * 3600));
    }

    #[test]
    fn parses_cors_origins() {
        assert_eq!(
            parse_cors_origins("https://www.darulabror.com, https://admin.darulabror.com ,"),
            vec!["https://www.darulabror.com", "https://admin.darulabror.com"]
        );
        assert!(parse_cors_origins(" , , , ").is_empty());
        assert!(parse_cors_origins("").is_empty());
    }

    #[test]
    fn appends_only_new_origins() {
        let existing = vec![
            "https://www.darulabror.com".to_string(),
            "http://localhost:3000".to_string(),
        ];
        let merged = append_unique_origins(
            &existing,
            &["http://localhost:3000".to_string(), "http://127.0.0.1:3000".to_string()],
        );
        assert_eq!(
            merged,
            vec![
                "https://www.darulabror.com",
                "http://localhost:3000",
                "http://127.0.0.1:3000"
            ]
        );
    }
}
