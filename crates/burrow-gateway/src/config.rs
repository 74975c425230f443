use burrow_telemetry::LogFormat;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::time::Duration;

use crate::app::DEFAULT_API_PATH;

pub const LISTEN_ADDR_ENV: &str = "BURROW_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "BURROW_PUBLIC_BASE_URL";
pub const API_PATH_ENV: &str = "BURROW_API_PATH";
pub const STORAGE_BACKEND_ENV: &str = "BURROW_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "BURROW_MYSQL_DSN";
pub const MYSQL_MAX_CONNECTIONS_ENV: &str = "BURROW_MYSQL_MAX_CONNECTIONS";
pub const GENERATOR_ENV: &str = "BURROW_GENERATOR";
pub const COUNTER_START_ENV: &str = "BURROW_COUNTER_START";
pub const CACHE_CAPACITY_ENV: &str = "BURROW_CACHE_CAPACITY";
pub const CACHE_TTL_SECS_ENV: &str = "BURROW_CACHE_TTL_SECS";
pub const NEGATIVE_CACHE_TTL_MS_ENV: &str = "BURROW_NEGATIVE_CACHE_TTL_MS";
pub const REDIS_URL_ENV: &str = "BURROW_REDIS_URL";
pub const REDIS_TTL_SECS_ENV: &str = "BURROW_REDIS_TTL_SECS";
pub const MAX_ATTEMPTS_ENV: &str = "BURROW_MAX_ATTEMPTS";
pub const STORAGE_RETRY_LIMIT_ENV: &str = "BURROW_STORAGE_RETRY_LIMIT";
pub const REUSE_EXISTING_ENV: &str = "BURROW_REUSE_EXISTING";
pub const REQUEST_TIMEOUT_MS_ENV: &str = "BURROW_REQUEST_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "BURROW_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorArg {
    #[value(name = "random")]
    Random,
    #[value(name = "counter")]
    Counter,
}

impl Display for GeneratorArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorArg::Random => write!(f, "random"),
            GeneratorArg::Counter => write!(f, "counter"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "compact")]
    Compact,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Pretty => write!(f, "pretty"),
            LogFormatArg::Compact => write!(f, "compact"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "burrow-gateway", about = "URL shortener HTTP gateway")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix of every returned short URL.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(long, env = API_PATH_ENV, default_value = DEFAULT_API_PATH)]
    pub api_path: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = MYSQL_MAX_CONNECTIONS_ENV, default_value_t = 32)]
    pub mysql_max_connections: u32,

    #[arg(
        long,
        env = GENERATOR_ENV,
        value_enum,
        default_value_t = GeneratorArg::Random
    )]
    pub generator: GeneratorArg,

    /// First counter value for the counter generator. Nodes sharing a store
    /// need disjoint ranges.
    #[arg(long, env = COUNTER_START_ENV, default_value_t = 0)]
    pub counter_start: u64,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = 100_000)]
    pub cache_capacity: u64,

    #[arg(long, env = CACHE_TTL_SECS_ENV)]
    pub cache_ttl_secs: Option<u64>,

    /// Remember unknown codes for this long. Off when unset.
    #[arg(long, env = NEGATIVE_CACHE_TTL_MS_ENV)]
    pub negative_cache_ttl_ms: Option<u64>,

    /// Shared second cache level. Off when unset.
    #[arg(long, env = REDIS_URL_ENV)]
    pub redis_url: Option<String>,

    #[arg(long, env = REDIS_TTL_SECS_ENV)]
    pub redis_ttl_secs: Option<u64>,

    #[arg(long, env = MAX_ATTEMPTS_ENV, default_value_t = 5)]
    pub max_attempts: u32,

    #[arg(long, env = STORAGE_RETRY_LIMIT_ENV, default_value_t = 1)]
    pub storage_retry_limit: u32,

    #[arg(long, env = REUSE_EXISTING_ENV, default_value_t = false)]
    pub reuse_existing: bool,

    /// Zero disables the per-request deadline.
    #[arg(long, env = REQUEST_TIMEOUT_MS_ENV, default_value_t = 2_000)]
    pub request_timeout_ms: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Compact
    )]
    pub log_format: LogFormatArg,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl Cli {
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    pub fn negative_cache_ttl(&self) -> Option<Duration> {
        self.negative_cache_ttl_ms
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
    }

    pub fn redis_ttl(&self) -> Option<Duration> {
        self.redis_ttl_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}
