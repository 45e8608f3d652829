use crate::auth::JwtConfig;
use crate::auth::jwt::MIN_SECRET_LEN;
use crate::core::ServerError;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DATABASE_PATH | kitchen.db | SQLite database file |
/// | HTTP_PORT | 3000 | HTTP / Socket.IO port |
/// | ENVIRONMENT | development | development, staging or production |
/// | LOG_LEVEL | info | tracing filter |
/// | LOG_JSON | false | JSON log lines |
/// | LOG_DIR | (unset) | directory for daily rolling log files |
/// | KITCHEN_ID | default | kitchen whose chef room receives events |
/// | SEED_DEMO_DATA | false | insert a small demo catalog into an empty database |
/// | JWT_SECRET | random (dev only) | HMAC secret shared with the login service |
/// | JWT_EXPIRATION_MINUTES | 1440 | lifetime of tokens issued by dev tooling |
/// | JWT_ISSUER | kitchen-platform | expected `iss` |
/// | JWT_AUDIENCE | kitchen-clients | expected `aud` |
/// | REQUEST_TIMEOUT_MS | 30000 | per request timeout |
///
/// # Example
///
/// ```ignore
/// DATABASE_PATH=/data/kitchen.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub kitchen_id: String,
    pub seed_demo_data: bool,
    pub jwt: JwtConfig,
    pub request_timeout_ms: u64,
    /// Set when no JWT_SECRET was provided and a random one is in use
    pub jwt_secret_generated: bool,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();
        let jwt_secret = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty());
        let jwt_secret_generated = jwt_secret.is_none();

        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "kitchen.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            kitchen_id: std::env::var("KITCHEN_ID").unwrap_or_else(|_| "default".into()),
            seed_demo_data: std::env::var("SEED_DEMO_DATA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            jwt: JwtConfig {
                secret: jwt_secret.unwrap_or(defaults.secret),
                expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.expiration_minutes),
                issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
                audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            },
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            jwt_secret_generated,
        }
    }

    /// Configuration for tests: temp database, fixed secret, no seeding
    pub fn for_tests(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "warn".into(),
            log_json: false,
            log_dir: None,
            kitchen_id: "default".into(),
            seed_demo_data: false,
            jwt: JwtConfig {
                secret: "test-secret-that-is-long-enough-for-hs256".into(),
                ..JwtConfig::default()
            },
            request_timeout_ms: 30000,
            jwt_secret_generated: false,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Reject settings that are unsafe to run with
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.is_production() {
            if self.jwt_secret_generated {
                return Err(ServerError::Config(
                    "JWT_SECRET must be set in production".into(),
                ));
            }
            if self.jwt.secret.len() < MIN_SECRET_LEN {
                return Err(ServerError::Config(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} bytes"
                )));
            }
        }
        if self.jwt.expiration_minutes <= 0 {
            return Err(ServerError::Config(
                "JWT_EXPIRATION_MINUTES must be positive".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ServerError::Config("REQUEST_TIMEOUT_MS must be positive".into()));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
