use std::env;
use std::time::Duration;

use crate::middleware::RateLimitPolicy;
use crate::routes::breach::BreachColumns;
use crate::routes::conference::ConferenceColumns;
use crate::sheets::SheetRange;

const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const BREACHES_SPREADSHEET_ID: &str = "1n5gJkgPVoGnyeUZAlmQUzv1dKtlwsKgG_DaRktTSuEs";
const BREACHES_RANGE: &str = "Data Breach Tracker!A:J";
const CONFERENCES_SPREADSHEET_ID: &str = "1i3ltEo2GhEiAFWdQOOqp7DY0LZ9GRwKknie5FKGdB3k";
const CONFERENCES_RANGE: &str = "A:F";

/// 缓存后端类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Redis(String),
    Memory,
    None,
}

/// 单个资源的表格位置、列映射和限流策略
#[derive(Debug, Clone)]
pub struct SheetResource<C> {
    pub sheet: SheetRange,
    pub columns: C,
    pub policy: RateLimitPolicy,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sheets_api_key: Option<String>,
    pub sheets_api_base: String,
    pub cache_backend: CacheBackend,
    pub cache_ttl_secs: u64,
    pub empty_cache_ttl_secs: u64,
    pub breaches: SheetResource<BreachColumns>,
    pub conferences: SheetResource<ConferenceColumns>,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sheets_api_key: None,
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            cache_backend: CacheBackend::None,
            cache_ttl_secs: 300,
            empty_cache_ttl_secs: 60,
            breaches: SheetResource {
                sheet: SheetRange::new(BREACHES_SPREADSHEET_ID, BREACHES_RANGE, 2),
                columns: BreachColumns::default(),
                policy: RateLimitPolicy::STANDARD,
            },
            conferences: SheetResource {
                sheet: SheetRange::new(CONFERENCES_SPREADSHEET_ID, CONFERENCES_RANGE, 1),
                columns: ConferenceColumns::default(),
                policy: RateLimitPolicy::STANDARD,
            },
            server_host: "::".to_string(),
            server_port: 3000,
            api_base_uri: "/api".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} 的值无效: {1}")]
    Invalid(&'static str, String),
    #[error("CACHE_BACKEND=redis 需要设置 REDIS_URL")]
    MissingRedisUrl,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = Config::default();

        config.sheets_api_key = var("GOOGLE_SHEETS_API_KEY");
        if let Some(base) = var("SHEETS_API_BASE") {
            config.sheets_api_base = base.trim_end_matches('/').to_string();
        }

        let redis_url = var("REDIS_URL");
        config.cache_backend = cache_backend(var("CACHE_BACKEND").as_deref(), redis_url)?;

        config.cache_ttl_secs = parse_or("CACHE_TTL_SECS", config.cache_ttl_secs)?;
        config.empty_cache_ttl_secs =
            parse_or("EMPTY_CACHE_TTL_SECS", config.empty_cache_ttl_secs)?;

        if let Some(id) = var("BREACHES_SPREADSHEET_ID") {
            config.breaches.sheet.spreadsheet_id = id;
        }
        if let Some(range) = var("BREACHES_RANGE") {
            config.breaches.sheet.range = range;
        }
        if let Some(policy) = var("BREACHES_RATE_LIMIT") {
            config.breaches.policy = policy_from_name("BREACHES_RATE_LIMIT", &policy)?;
        }
        if let Some(id) = var("CONFERENCES_SPREADSHEET_ID") {
            config.conferences.sheet.spreadsheet_id = id;
        }
        if let Some(range) = var("CONFERENCES_RANGE") {
            config.conferences.sheet.range = range;
        }
        if let Some(policy) = var("CONFERENCES_RATE_LIMIT") {
            config.conferences.policy = policy_from_name("CONFERENCES_RATE_LIMIT", &policy)?;
        }

        if let Some(host) = var("SERVER_HOST") {
            config.server_host = host;
        }
        config.server_port = parse_or("SERVER_PORT", config.server_port)?;
        if let Some(base) = var("API_BASE_URI") {
            config.api_base_uri = normalize_base_uri(&base)?;
        }

        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn empty_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.empty_cache_ttl_secs)
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match var(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name, raw)),
        None => Ok(default),
    }
}

fn cache_backend(raw: Option<&str>, redis_url: Option<String>) -> Result<CacheBackend, ConfigError> {
    let Some(raw) = raw else {
        // 未指定时，有 REDIS_URL 就用 Redis
        return Ok(redis_url.map_or(CacheBackend::None, CacheBackend::Redis));
    };
    match raw.to_ascii_lowercase().as_str() {
        "redis" => Ok(CacheBackend::Redis(redis_url.ok_or(ConfigError::MissingRedisUrl)?)),
        "memory" => Ok(CacheBackend::Memory),
        "none" => Ok(CacheBackend::None),
        _ => Err(ConfigError::Invalid("CACHE_BACKEND", raw.to_string())),
    }
}

/// 统一为 `/api` 形式：补前导 `/`，去掉末尾 `/`，根路径为空字符串
fn normalize_base_uri(raw: &str) -> Result<String, ConfigError> {
    if raw.contains(['{', '}', '*', '?', '#']) || raw.contains(char::is_whitespace) {
        return Err(ConfigError::Invalid("API_BASE_URI", raw.to_string()));
    }
    let path = raw.trim_matches('/');
    if path.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("/{}", path))
}

fn policy_from_name(name: &'static str, raw: &str) -> Result<RateLimitPolicy, ConfigError> {
    RateLimitPolicy::from_name(raw).ok_or_else(|| ConfigError::Invalid(name, raw.to_string()))
}
