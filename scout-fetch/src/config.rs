//! Configuration resolution for scout-fetch
//!
//! **Priority:** CLI → ENV → TOML → compiled default
//!
//! clap handles the first two tiers (`#[arg(env = ...)]`); the TOML tier
//! comes from [`scout_common::config`].

use crate::clients::HttpClientConfig;
use clap::{Parser, ValueEnum};
use scout_common::config::TomlConfig;
use scout_common::{Error, Result};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_LIST_ROUTE: &str = "/api/list";
pub const DEFAULT_DETAIL_ROUTE: &str = "/api/detail";
pub const DEFAULT_RESULT_COUNT: usize = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments for scout-fetch
#[derive(Parser, Debug, Default)]
#[command(name = "scout-fetch")]
#[command(about = "Find the K youngest entities with a valid phone number")]
#[command(version)]
pub struct Args {
    /// Config file (default: <config_dir>/scout/config.toml)
    #[arg(short, long, env = "SCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Service base URL
    #[arg(long, env = "SCOUT_BASE_URL")]
    pub base_url: Option<String>,

    /// Listing endpoint route
    #[arg(long, env = "SCOUT_LIST_ROUTE")]
    pub list_route: Option<String>,

    /// Detail endpoint route prefix
    #[arg(long, env = "SCOUT_DETAIL_ROUTE")]
    pub detail_route: Option<String>,

    /// Number of records to keep
    #[arg(short = 'k', long = "count", env = "SCOUT_RESULT_COUNT")]
    pub result_count: Option<usize>,

    /// Maximum concurrent detail fetches per batch (default: whole batch)
    #[arg(long, env = "SCOUT_MAX_CONCURRENCY")]
    pub max_concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, env = "SCOUT_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Abort the whole run after this many seconds
    #[arg(long, env = "SCOUT_DEADLINE_SECS")]
    pub deadline_secs: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, env = "SCOUT_OUTPUT")]
    pub output: Option<OutputFormat>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "SCOUT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!(
                "Unknown output format '{}' (expected text or json)",
                other
            ))),
        }
    }
}

/// Settings consumed by [`crate::pipeline::Pipeline`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// K
    pub result_count: NonZeroUsize,
    /// `None`: one fetch per identifier in the batch at once
    pub max_concurrency: Option<NonZeroUsize>,
    /// Overall run deadline
    pub deadline: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            result_count: NonZeroUsize::new(DEFAULT_RESULT_COUNT).unwrap_or(NonZeroUsize::MIN),
            max_concurrency: None,
            deadline: None,
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub http: HttpClientConfig,
    pub output: OutputFormat,
    pub log_level: String,
}

impl AppConfig {
    /// Merge CLI/ENV arguments over the TOML tier and defaults
    pub fn resolve(args: &Args, toml: &TomlConfig) -> Result<Self> {
        let result_count = args
            .result_count
            .or(toml.result_count)
            .unwrap_or(DEFAULT_RESULT_COUNT);
        let result_count = NonZeroUsize::new(result_count)
            .ok_or_else(|| Error::Config("result_count must be at least 1".to_string()))?;

        let max_concurrency = match args.max_concurrency.or(toml.max_concurrency) {
            Some(n) => Some(NonZeroUsize::new(n).ok_or_else(|| {
                Error::Config("max_concurrency must be at least 1".to_string())
            })?),
            None => None,
        };

        let timeout_secs = args
            .request_timeout_secs
            .or(toml.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        let deadline = args
            .deadline_secs
            .or(toml.deadline_secs)
            .map(Duration::from_secs);

        let output = match (args.output, toml.output.as_deref()) {
            (Some(format), _) => format,
            (None, Some(text)) => text.parse()?,
            (None, None) => OutputFormat::default(),
        };

        let pick = |cli: &Option<String>, file: &Option<String>, default: &str| {
            cli.clone()
                .or_else(|| file.clone())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            pipeline: PipelineConfig {
                result_count,
                max_concurrency,
                deadline,
            },
            http: HttpClientConfig {
                base_url: pick(&args.base_url, &toml.base_url, DEFAULT_BASE_URL),
                list_route: pick(&args.list_route, &toml.list_route, DEFAULT_LIST_ROUTE),
                detail_route: pick(&args.detail_route, &toml.detail_route, DEFAULT_DETAIL_ROUTE),
                timeout: Duration::from_secs(timeout_secs),
            },
            output,
            log_level: args
                .log_level
                .clone()
                .unwrap_or_else(|| toml.logging.level.clone()),
        })
    }
}
