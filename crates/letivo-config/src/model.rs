// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Letivo orchestration router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so typos in config keys
//! are rejected at startup with actionable diagnostics instead of being
//! silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Letivo configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with `LETIVO_*`
/// environment variable overrides. Every section is optional and defaults
/// to values that run out of the box (minus provider API keys).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LetivoConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Monthly token quota limits per role.
    #[serde(default)]
    pub quota: QuotaConfig,

    /// Module classifier cache and refinement settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Complexity estimator thresholds and keyword lists.
    #[serde(default)]
    pub complexity: ComplexityConfig,

    /// Provider routing chains, timeouts, and retry policy.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// OpenAI credentials.
    #[serde(default)]
    pub openai: ProviderCredentials,

    /// Google Gemini credentials.
    #[serde(default)]
    pub gemini: ProviderCredentials,

    /// xAI Grok credentials.
    #[serde(default)]
    pub grok: ProviderCredentials,

    /// Perplexity credentials.
    #[serde(default)]
    pub perplexity: ProviderCredentials,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in logs.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum accepted chat message length in characters. Longer inputs
    /// are rejected with a client error before any classification runs.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

fn default_service_name() -> String {
    "letivo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_message_chars() -> usize {
    2000
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Bind address for the HTTP listener.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Bind port for the HTTP listener.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bearer token required on every request. `None` disables the auth
    /// middleware entirely; when set, requests without the exact token
    /// are rejected with 401.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            bearer_token: None,
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("letivo").join("letivo.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "letivo.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Monthly token quota configuration.
///
/// Limits apply per (user, month); a quota row is created lazily with the
/// role's default limit on first use in a month.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuotaConfig {
    #[serde(default = "default_free_monthly_tokens")]
    pub free_monthly_tokens: u64,

    #[serde(default = "default_premium_monthly_tokens")]
    pub premium_monthly_tokens: u64,

    #[serde(default = "default_admin_monthly_tokens")]
    pub admin_monthly_tokens: u64,

    /// USD to BRL conversion rate applied when recording usage costs.
    #[serde(default = "default_usd_to_brl_rate")]
    pub usd_to_brl_rate: f64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_monthly_tokens: default_free_monthly_tokens(),
            premium_monthly_tokens: default_premium_monthly_tokens(),
            admin_monthly_tokens: default_admin_monthly_tokens(),
            usd_to_brl_rate: default_usd_to_brl_rate(),
        }
    }
}

fn default_free_monthly_tokens() -> u64 {
    100_000
}

fn default_premium_monthly_tokens() -> u64 {
    1_000_000
}

fn default_admin_monthly_tokens() -> u64 {
    10_000_000
}

fn default_usd_to_brl_rate() -> f64 {
    5.0
}

/// Module classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Seconds a cached classification stays valid.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum cached entries; the oldest entry is evicted past this cap.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Pattern-pass confidence below which provider-backed refinement is
    /// attempted (when `refine_provider` is set).
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Provider used for classification refinement. `None` disables the
    /// inference stage; the pattern pass result is used as-is.
    #[serde(default)]
    pub refine_provider: Option<String>,

    /// Model used for classification refinement.
    #[serde(default = "default_refine_model")]
    pub refine_model: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
            confidence_threshold: default_confidence_threshold(),
            refine_provider: None,
            refine_model: default_refine_model(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_max_entries() -> usize {
    4096
}

fn default_confidence_threshold() -> f32 {
    0.6
}

fn default_refine_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Complexity estimator configuration.
///
/// The scoring thresholds and keyword lists are deliberately configuration
/// rather than constants so operators can tune routing without a rebuild.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComplexityConfig {
    /// Messages at or below this length lean trivial.
    #[serde(default = "default_trivial_max_chars")]
    pub trivial_max_chars: usize,

    /// Messages at or above this length lean complex.
    #[serde(default = "default_complex_min_chars")]
    pub complex_min_chars: usize,

    /// Number of question marks from which a message counts as multi-part.
    #[serde(default = "default_multi_question_min")]
    pub multi_question_min: usize,

    /// Analytical keywords that push a message toward the complex tier.
    #[serde(default = "default_complex_keywords")]
    pub complex_keywords: Vec<String>,

    /// Modules whose tasks bias upward (e.g. essay grading, exam prep).
    #[serde(default = "default_heavier_modules")]
    pub heavier_modules: Vec<String>,

    /// Modules whose tasks bias downward (e.g. general support).
    #[serde(default = "default_lighter_modules")]
    pub lighter_modules: Vec<String>,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            trivial_max_chars: default_trivial_max_chars(),
            complex_min_chars: default_complex_min_chars(),
            multi_question_min: default_multi_question_min(),
            complex_keywords: default_complex_keywords(),
            heavier_modules: default_heavier_modules(),
            lighter_modules: default_lighter_modules(),
        }
    }
}

fn default_trivial_max_chars() -> usize {
    80
}

fn default_complex_min_chars() -> usize {
    150
}

fn default_multi_question_min() -> usize {
    2
}

fn default_complex_keywords() -> Vec<String> {
    [
        "compare",
        "comparar",
        "analise",
        "análise",
        "analisar",
        "detalhado",
        "detalhada",
        "explique passo a passo",
        "desenvolva",
        "justifique",
        "dissertação",
        "redação",
        "elabore",
        "avalie",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_heavier_modules() -> Vec<String> {
    ["redacao", "enem", "aula_interativa"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_lighter_modules() -> Vec<String> {
    ["atendimento", "social_media"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// One (provider, model) candidate in a routing chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteTarget {
    /// Provider identifier: `openai`, `gemini`, `grok`, or `perplexity`.
    pub provider: String,
    /// Model identifier in the provider's namespace.
    pub model: String,
}

impl RouteTarget {
    pub fn new(provider: &str, model: &str) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.to_string(),
        }
    }
}

/// Generation parameters applied per tier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Provider routing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Per-attempt timeout in seconds.
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,

    /// Retries on the same candidate after a transient failure. The total
    /// attempt count per candidate is `max_retries + 1`. Quota-like
    /// failures and timeouts never retry.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; doubles per retry.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Ordered candidates for trivial messages, cheapest/fastest first.
    #[serde(default = "default_trivial_chain")]
    pub trivial: Vec<RouteTarget>,

    /// Ordered candidates for simple messages.
    #[serde(default = "default_simple_chain")]
    pub simple: Vec<RouteTarget>,

    /// Ordered candidates for complex messages, most capable first.
    #[serde(default = "default_complex_chain")]
    pub complex: Vec<RouteTarget>,

    /// Generation parameters for trivial messages.
    #[serde(default = "default_trivial_params")]
    pub trivial_params: TierParams,

    /// Generation parameters for simple messages.
    #[serde(default = "default_simple_params")]
    pub simple_params: TierParams,

    /// Generation parameters for complex messages.
    #[serde(default = "default_complex_params")]
    pub complex_params: TierParams,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: default_attempt_timeout_secs(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            trivial: default_trivial_chain(),
            simple: default_simple_chain(),
            complex: default_complex_chain(),
            trivial_params: default_trivial_params(),
            simple_params: default_simple_params(),
            complex_params: default_complex_params(),
        }
    }
}

fn default_attempt_timeout_secs() -> u64 {
    15
}

fn default_max_retries() -> u32 {
    1
}

fn default_backoff_base_ms() -> u64 {
    250
}

fn default_trivial_chain() -> Vec<RouteTarget> {
    vec![
        RouteTarget::new("gemini", "gemini-2.0-flash"),
        RouteTarget::new("openai", "gpt-4o-mini"),
        RouteTarget::new("grok", "grok-4-fast"),
    ]
}

fn default_simple_chain() -> Vec<RouteTarget> {
    vec![
        RouteTarget::new("openai", "gpt-4o-mini"),
        RouteTarget::new("gemini", "gemini-2.0-flash"),
        RouteTarget::new("grok", "grok-4-fast"),
    ]
}

fn default_complex_chain() -> Vec<RouteTarget> {
    vec![
        RouteTarget::new("openai", "gpt-4o"),
        RouteTarget::new("gemini", "gemini-2.5-pro"),
        RouteTarget::new("perplexity", "sonar-pro"),
        RouteTarget::new("grok", "grok-4"),
    ]
}

fn default_trivial_params() -> TierParams {
    TierParams {
        max_tokens: 512,
        temperature: 0.5,
    }
}

fn default_simple_params() -> TierParams {
    TierParams {
        max_tokens: 1024,
        temperature: 0.7,
    }
}

fn default_complex_params() -> TierParams {
    TierParams {
        max_tokens: 4096,
        temperature: 0.7,
    }
}

/// API credentials for one provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderCredentials {
    /// API key. `None` falls back to the provider's environment variable.
    #[serde(default)]
    pub api_key: Option<String>,
}
