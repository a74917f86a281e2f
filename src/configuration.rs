use config::ConfigError;

/// Upper bound for either token lifetime (ten years)
const MAX_TOKEN_TTL_SECONDS: i64 = 10 * 365 * 24 * 3600;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub platform: Platform,
    /// Directory served under `/app`
    pub static_dir: String,
}

/// Deployment platform. Destructive admin routes only run on `dev`.
#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Dev,
    Production,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Token settings. The secret is the single static HS256 signing key.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,   // seconds (e.g., 3600 for 1 hour)
    pub refresh_token_expiry: i64,  // seconds (e.g., 5184000 for 60 days)
}

impl JwtSettings {
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_token_expiry)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_expiry)
    }

    /// Reject lifetimes that are not positive or exceed `MAX_TOKEN_TTL_SECONDS`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lifetimes = [
            ("jwt.access_token_expiry", self.access_token_expiry),
            ("jwt.refresh_token_expiry", self.refresh_token_expiry),
        ];

        for (key, seconds) in lifetimes {
            if !(1..=MAX_TOKEN_TTL_SECONDS).contains(&seconds) {
                return Err(ConfigError::Message(format!(
                    "{} must be between 1 and {} seconds, got {}",
                    key, MAX_TOKEN_TTL_SECONDS, seconds
                )));
            }
        }

        Ok(())
    }
}

/// Load settings from `configuration.yaml`, overridden by `APP_*` variables
/// (e.g. `APP_JWT__SECRET`, `APP_APPLICATION__PORT`).
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 8080_i64)?
        .set_default("application.platform", "production")?
        .set_default("application.static_dir", "./public")?
        .set_default("jwt.access_token_expiry", 3600_i64)?
        .set_default("jwt.refresh_token_expiry", 60_i64 * 24 * 3600)?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    settings.jwt.validate()?;
    Ok(settings)
}
