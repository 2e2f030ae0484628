use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WardrsSettings {
    pub application: ApplicationSettings,
    pub provider: ProviderSettings,
    pub cookies: CookieSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Public base URL of this service, used to build the OAuth callback URL
    pub redirect_base_url: String,
    pub cors_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// OAuth authority base, e.g. `https://login.microsoftonline.com`
    pub authority: String,
    pub tenant_id: String,

    // Direct values (can be overridden by environment variables)
    pub client_id: String,
    pub client_secret: String,

    /// Base URL of the provider's session API (session lookup, revocation,
    /// code exchange)
    pub session_api_url: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieSettings {
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            redirect_base_url: "http://localhost:8080".to_string(),
            cors_origins: "http://localhost:3000,http://localhost:8080".to_string(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            authority: "https://login.microsoftonline.com".to_string(),
            tenant_id: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            session_api_url: String::new(),
            scopes: crate::auth::DEFAULT_SCOPES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: true, // Default to secure cookies
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl WardrsSettings {
    /// Load settings from configuration files and environment variables.
    ///
    /// Priority (highest to lowest): environment variables, Settings.toml in
    /// the current directory, built-in defaults. Also loads `.env` and
    /// initializes the logger.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - The resulting configuration fails validation (missing provider
    ///   credentials abort startup rather than serving with broken auth)
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::initialize_environment()?;

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        settings.validate()?;
        Ok(settings)
    }

    /// Validate that the auth configuration is serviceable.
    ///
    /// # Errors
    ///
    /// Returns an error naming every missing or malformed value; the caller
    /// must treat this as fatal and refuse to serve traffic.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if self.provider.tenant_id.trim().is_empty() {
            problems.push("provider.tenant_id is not set");
        }
        if self.provider.client_id.trim().is_empty() {
            problems.push("provider.client_id is not set");
        }
        if self.provider.client_secret.trim().is_empty() {
            problems.push("provider.client_secret is not set");
        }
        if self.provider.session_api_url.trim().is_empty() {
            problems.push("provider.session_api_url is not set");
        }
        if self.provider.scopes.is_empty() {
            problems.push("provider.scopes must not be empty");
        }
        if url::Url::parse(&self.provider.authority).is_err() {
            problems.push("provider.authority is not a valid URL");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(format!("invalid auth configuration: {}", problems.join("; ")))
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Get CORS origins as a vector of strings
    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn initialize_environment() -> Result<(), Box<dyn std::error::Error>> {
        Self::load_env_file();
        // Tests and embedding callers may have initialized logging already
        let _ = env_logger::try_init();
        Ok(())
    }

    /// Load environment variables from a `.env` file if present
    fn load_env_file() {
        let Ok(contents) = fs::read_to_string(".env") else {
            return;
        };

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = basic_toml::from_str(&toml_content)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_provider_env_overrides(&mut settings.provider);
        Self::apply_cookie_env_overrides(&mut settings.cookies);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(redirect_base_url) = std::env::var("REDIRECT_BASE_URL") {
            app_settings.redirect_base_url = redirect_base_url;
        }
        if let Ok(cors_origins) = std::env::var("CORS_ORIGINS") {
            app_settings.cors_origins = cors_origins;
        }
    }

    /// Apply environment overrides for identity provider settings
    pub fn apply_provider_env_overrides(provider_settings: &mut ProviderSettings) {
        if let Ok(tenant_id) = std::env::var("ENTRA_ID_TENANT_ID") {
            provider_settings.tenant_id = tenant_id;
        }
        if let Ok(client_id) = std::env::var("ENTRA_ID_CLIENT_ID") {
            provider_settings.client_id = client_id;
        }
        if let Ok(client_secret) = std::env::var("ENTRA_ID_CLIENT_SECRET") {
            provider_settings.client_secret = client_secret;
        }
        if let Ok(session_api_url) = std::env::var("SESSION_API_URL") {
            provider_settings.session_api_url = session_api_url;
        }
    }

    fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        if let Ok(secure_str) = std::env::var("COOKIE_SECURE") {
            if let Ok(secure) = secure_str.parse::<bool>() {
                cookie_settings.secure = secure;
            }
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(level) = std::env::var("RUST_LOG") {
            logging_settings.level = level;
        }
    }
}
