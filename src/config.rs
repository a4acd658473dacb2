//! Process configuration read from the environment (and `.env` when present).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::assistant::AssistantConfig;
use crate::content::{ContentConfig, WodConfig};
use crate::session::{
    AuthConfig, CookieOptions, FailurePolicy, ProtectedArea, RouteRules, SessionGate,
    TokenConfig,
    DEFAULT_AUDIENCE, DEFAULT_SECRET,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(String),

    #[error("Invalid value '{value}' for {key}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Unset means in-memory repositories
    pub database_url: Option<String>,
    pub auth: AuthConfig,
    pub jwt_secret: Option<String>,
    pub jwt_audience: String,
    pub refresh_margin: chrono::Duration,
    pub refresh_cookie_max_age: chrono::Duration,
    pub cookie_secure: bool,
    pub auth_timeout: Duration,
    pub route_rules: RouteRules,
    pub failure_policy: FailurePolicy,
    pub upstream_timeout: Duration,
    pub content: ContentConfig,
    pub assistant: AssistantConfig,
    pub allowed_origin: Option<String>,
    pub static_dir: PathBuf,
}

/// Reads variables through `lookup`, treating blank values as unset
struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn parsed<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Like `parsed`, but zero is rejected
    fn positive(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        match self.parsed(key, default)? {
            0 => Err(ConfigError::Invalid {
                key: key.to_string(),
                value: "0".to_string(),
            }),
            value => Ok(value),
        }
    }

    /// Comma-separated path patterns, falling back to `default`
    fn patterns(&self, key: &str, default: &[&str]) -> Vec<String> {
        match self.optional(key) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            None => default.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Page rules are checked before API rules; exclusions win over both
    fn route_rules(&self) -> Result<RouteRules, ConfigError> {
        let invalid = |key: &str, value: String| ConfigError::Invalid {
            key: key.to_string(),
            value,
        };
        let mut rules = RouteRules::new();

        for (key, defaults, area) in [
            ("GATE_PAGE_PATTERNS", &DEFAULT_PAGE_PATTERNS[..], ProtectedArea::Page),
            ("GATE_API_PATTERNS", &DEFAULT_API_PATTERNS[..], ProtectedArea::Api),
        ] {
            for pattern in self.patterns(key, defaults) {
                rules = rules
                    .protect(&pattern, area)
                    .map_err(|_| invalid(key, pattern))?;
            }
        }

        let key = "GATE_EXCLUDED_PATTERNS";
        for pattern in self.patterns(key, &DEFAULT_EXCLUDED_PATTERNS) {
            rules = rules.exclude(&pattern).map_err(|_| invalid(key, pattern))?;
        }

        Ok(rules)
    }
}

const DEFAULT_PAGE_PATTERNS: [&str; 2] = ["/dashboard", "/dashboard/*"];
const DEFAULT_API_PATTERNS: [&str; 1] = ["/api/*"];
const DEFAULT_EXCLUDED_PATTERNS: [&str; 2] = ["/static/*", "/favicon.ico"];

impl AppConfig {
    /// Loads `.env` if one exists, then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!(error = %e, "Could not read .env file");
            }
        }

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        info!(bind_addr = %config.bind_addr, "Configuration loaded");
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let host: IpAddr = env.parsed("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port: u16 = env.parsed("PORT", 3000)?;

        let feeds = match env.optional("CONTENT_FEEDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect(),
            None => ContentConfig::default().feeds,
        };
        let wod_defaults = WodConfig::default();
        let assistant_defaults = AssistantConfig::default();

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            database_url: env.optional("DATABASE_URL"),
            auth: AuthConfig {
                url: env.required("AUTH_URL")?.trim_end_matches('/').to_string(),
                anon_key: env.required("AUTH_ANON_KEY")?,
            },
            jwt_secret: env.optional("AUTH_JWT_SECRET"),
            jwt_audience: env.string_or("AUTH_JWT_AUDIENCE", DEFAULT_AUDIENCE),
            refresh_margin: chrono::Duration::seconds(
                env.parsed("SESSION_REFRESH_MARGIN_SECS", 60)?,
            ),
            refresh_cookie_max_age: chrono::Duration::days(
                env.parsed("REFRESH_COOKIE_MAX_AGE_DAYS", 30)?,
            ),
            cookie_secure: env.parsed("COOKIE_SECURE", true)?,
            auth_timeout: Duration::from_millis(env.positive("AUTH_TIMEOUT_MS", 3000)?),
            route_rules: env.route_rules()?,
            failure_policy: FailurePolicy {
                redirect_on_failure: env.parsed("GATE_REDIRECT_ON_FAILURE", true)?,
                login_path: env.string_or("GATE_LOGIN_PATH", "/login"),
            },
            upstream_timeout: Duration::from_secs(env.parsed("UPSTREAM_TIMEOUT_SECS", 10)?),
            content: ContentConfig {
                feeds,
                wod: WodConfig {
                    url: env.optional("WOD_URL"),
                    selector: env.string_or("WOD_SELECTOR", &wod_defaults.selector),
                },
            },
            assistant: AssistantConfig {
                api_url: env.string_or("AI_API_URL", &assistant_defaults.api_url),
                api_key: env.optional("AI_API_KEY"),
                model: env.string_or("AI_MODEL", &assistant_defaults.model),
            },
            allowed_origin: env.optional("ALLOWED_ORIGIN"),
            static_dir: PathBuf::from(env.string_or("STATIC_DIR", "static")),
        })
    }

    pub fn token_config(&self) -> TokenConfig {
        let secret = self.jwt_secret.as_deref().unwrap_or(DEFAULT_SECRET);
        TokenConfig::new(secret, self.jwt_audience.clone()).with_refresh_margin(self.refresh_margin)
    }

    pub fn cookie_options(&self) -> CookieOptions {
        CookieOptions {
            secure: self.cookie_secure,
            ..CookieOptions::default()
        }
    }

    pub fn session_gate(&self) -> SessionGate {
        SessionGate {
            rules: self.route_rules.clone(),
            policy: self.failure_policy.clone(),
            auth_timeout: self.auth_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("AUTH_URL", "https://auth.example.test/auth/v1/"),
        ("AUTH_ANON_KEY", "anon-key"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.auth.url, "https://auth.example.test/auth/v1");
        assert!(config.database_url.is_none());
        assert!(config.cookie_secure);
        assert_eq!(config.auth_timeout, Duration::from_millis(3000));
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.refresh_margin, chrono::Duration::seconds(60));
        assert_eq!(config.refresh_cookie_max_age, chrono::Duration::days(30));
        assert!(config.failure_policy.redirect_on_failure);
        assert_eq!(config.failure_policy.login_path, "/login");
        assert_eq!(config.content.feeds.len(), 3);
        assert!(config.content.wod.url.is_none());
        assert!(config.assistant.api_key.is_none());
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(config.token_config().uses_default_secret());
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("DATABASE_URL", "postgres://localhost/gym"),
            ("AUTH_JWT_SECRET", "project-secret"),
            ("COOKIE_SECURE", "false"),
            ("GATE_REDIRECT_ON_FAILURE", "false"),
            ("CONTENT_FEEDS", " https://a.test/rss , ,https://b.test/rss"),
            ("WOD_URL", "https://box.test/wod"),
            ("WOD_SELECTOR", "#today"),
            ("AI_API_KEY", "sk-test"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/gym"));
        assert!(!config.token_config().uses_default_secret());
        assert!(!config.cookie_options().secure);
        assert!(!config.session_gate().policy.redirect_on_failure);
        assert_eq!(config.content.feeds, vec!["https://a.test/rss", "https://b.test/rss"]);
        assert_eq!(config.content.wod.url.as_deref(), Some("https://box.test/wod"));
        assert_eq!(config.content.wod.selector, "#today");
        assert_eq!(config.assistant.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_missing_required() {
        assert_eq!(
            load(&[("AUTH_ANON_KEY", "k")]).unwrap_err(),
            ConfigError::Missing("AUTH_URL".to_string())
        );
        assert_eq!(
            load(&[("AUTH_URL", "https://a.test"), ("AUTH_ANON_KEY", "  ")]).unwrap_err(),
            ConfigError::Missing("AUTH_ANON_KEY".to_string())
        );
    }

    #[test]
    fn test_default_route_rules() {
        let rules = load(&REQUIRED).unwrap().session_gate().rules;

        assert_eq!(rules.classify("/dashboard"), Some(ProtectedArea::Page));
        assert_eq!(rules.classify("/dashboard/settings"), Some(ProtectedArea::Page));
        assert_eq!(rules.classify("/api/gyms"), Some(ProtectedArea::Api));
        assert_eq!(rules.classify("/static/app.css"), None);
        assert_eq!(rules.classify("/health"), None);
    }

    #[test]
    fn test_configured_route_rules() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("GATE_PAGE_PATTERNS", "/account/*, /reports"),
            ("GATE_API_PATTERNS", "/api/*,/internal/*"),
            ("GATE_EXCLUDED_PATTERNS", "/api/public/*, *.png"),
        ]);
        let rules = load(&vars).unwrap().session_gate().rules;

        assert_eq!(rules.classify("/account/billing"), Some(ProtectedArea::Page));
        assert_eq!(rules.classify("/reports"), Some(ProtectedArea::Page));
        assert_eq!(rules.classify("/internal/jobs"), Some(ProtectedArea::Api));
        assert_eq!(rules.classify("/api/public/ping"), None);
        assert_eq!(rules.classify("/api/logo.png"), None);
        assert_eq!(rules.classify("/dashboard"), None);
    }

    #[test]
    fn test_malformed_route_pattern() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("GATE_API_PATTERNS", "/api/*, api/*"));

        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid {
                key: "GATE_API_PATTERNS".to_string(),
                value: "api/*".to_string()
            }
        );
    }

    #[test]
    fn test_zero_auth_timeout_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("AUTH_TIMEOUT_MS", "0"));

        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid {
                key: "AUTH_TIMEOUT_MS".to_string(),
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("PORT", "eighty"));
        assert_eq!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid {
                key: "PORT".to_string(),
                value: "eighty".to_string()
            }
        );

        let mut vars = REQUIRED.to_vec();
        vars.push(("COOKIE_SECURE", "sometimes"));
        assert!(matches!(load(&vars), Err(ConfigError::Invalid { key, .. }) if key == "COOKIE_SECURE"));
    }
}
