//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If any collaborator credential is set in the environment, the
//!    environment is the source
//! 2. Otherwise falls back to a config file when one is found
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Missing collaborator credentials are not a load error. They stay blank
//! and the adapter that needs them fails on its own at startup. Only global
//! settings (scan window, HTTP tuning) are rejected here.
//!
//! ## Environment Variables
//! Collaborator credentials:
//! - `ZENDESK_SUBDOMAIN`, `ZENDESK_EMAIL`, `ZENDESK_API_TOKEN`
//! - `SLACK_BOT_TOKEN`, `SLACK_CHANNEL_ID`
//!
//! Optional:
//! - `ZENDESK_BASE_URL`: full API base, overrides the subdomain-derived one
//! - `TICKETING_DOMAIN`: hostname suffix ticket links must belong to
//! - `SLACK_API_BASE`: Slack Web API base URL
//! - `GOOGLE_CALENDAR_ID`: calendar to scan (default `primary`)
//! - `GOOGLE_CALENDAR_API_BASE`: Calendar API base URL
//! - `GOOGLE_TOKEN_FILE`: authorized-user token file (default `token.json`)
//! - `PREPDESK_HTTP_TIMEOUT_SECS`, `PREPDESK_HTTP_MAX_ATTEMPTS`
//! - `PREPDESK_FAN_OUT_CONCURRENCY`
//! - `PREPDESK_SCAN_MIN_OFFSET_MINUTES`, `PREPDESK_SCAN_MAX_OFFSET_MINUTES`,
//!   `PREPDESK_SCAN_TOLERANCE_MINUTES`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./prepdesk.json` or `./prepdesk.toml` (current working directory)
//! 2. `../prepdesk.json` or `../prepdesk.toml` (parent directory)
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use prepdesk_domain::constants::DEFAULT_TICKETING_DOMAIN;
use prepdesk_domain::{
    CalendarConfig, Config, HttpConfig, PrepDeskError, Result, ScanConfig, SlackConfig,
    ZendeskConfig,
};

const FILE_NAMES: [&str; 2] = ["prepdesk.json", "prepdesk.toml"];

const CREDENTIAL_VARS: [&str; 5] = [
    "ZENDESK_SUBDOMAIN",
    "ZENDESK_EMAIL",
    "ZENDESK_API_TOKEN",
    "SLACK_BOT_TOKEN",
    "SLACK_CHANNEL_ID",
];

/// Load configuration with automatic fallback strategy
///
/// Uses the environment when any collaborator credential is present there.
/// Otherwise a probed config file wins; with no file either, the environment
/// is still used and every collaborator reports its missing credentials.
///
/// # Errors
/// Returns `PrepDeskError::Config` if:
/// - File format is invalid
/// - A tuning variable does not parse
/// - The scan window or HTTP settings are unusable
pub fn load() -> Result<Config> {
    if !CREDENTIAL_VARS.iter().any(|key| env_opt(key).is_some()) {
        if let Some(path) = probe_config_paths() {
            return load_from_file(Some(path));
        }
        tracing::debug!("No credentials in environment and no config file found");
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Unset credential variables leave the field blank.
///
/// # Errors
/// Returns `PrepDeskError::Config` if tuning variables have invalid values
/// or the resulting scan window or HTTP settings are unusable.
pub fn load_from_env() -> Result<Config> {
    let zendesk = ZendeskConfig {
        subdomain: env_or_blank("ZENDESK_SUBDOMAIN"),
        email: env_or_blank("ZENDESK_EMAIL"),
        api_token: env_or_blank("ZENDESK_API_TOKEN"),
        base_url: env_opt("ZENDESK_BASE_URL"),
        ticketing_domain: env_opt("TICKETING_DOMAIN")
            .unwrap_or_else(|| DEFAULT_TICKETING_DOMAIN.to_string()),
    };

    let slack = SlackConfig {
        bot_token: env_or_blank("SLACK_BOT_TOKEN"),
        channel_id: env_or_blank("SLACK_CHANNEL_ID"),
        api_base: env_opt("SLACK_API_BASE"),
    };

    let calendar_defaults = CalendarConfig::default();
    let calendar = CalendarConfig {
        calendar_id: env_opt("GOOGLE_CALENDAR_ID").unwrap_or(calendar_defaults.calendar_id),
        api_base: env_opt("GOOGLE_CALENDAR_API_BASE"),
        token_file: env_opt("GOOGLE_TOKEN_FILE").unwrap_or(calendar_defaults.token_file),
    };

    let scan_defaults = ScanConfig::default();
    let scan = ScanConfig {
        min_offset_minutes: env_parse(
            "PREPDESK_SCAN_MIN_OFFSET_MINUTES",
            scan_defaults.min_offset_minutes,
        )?,
        max_offset_minutes: env_parse(
            "PREPDESK_SCAN_MAX_OFFSET_MINUTES",
            scan_defaults.max_offset_minutes,
        )?,
        tolerance_minutes: env_parse(
            "PREPDESK_SCAN_TOLERANCE_MINUTES",
            scan_defaults.tolerance_minutes,
        )?,
        keyword: scan_defaults.keyword,
    };

    let http_defaults = HttpConfig::default();
    let http = HttpConfig {
        timeout_seconds: env_parse("PREPDESK_HTTP_TIMEOUT_SECS", http_defaults.timeout_seconds)?,
        max_attempts: env_parse("PREPDESK_HTTP_MAX_ATTEMPTS", http_defaults.max_attempts)?,
        fan_out_concurrency: env_parse(
            "PREPDESK_FAN_OUT_CONCURRENCY",
            http_defaults.fan_out_concurrency,
        )?,
    };

    let config = Config { zendesk, slack, calendar, scan, http };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `PrepDeskError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The scan window or HTTP settings are unusable
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(PrepDeskError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths()
            .ok_or_else(|| PrepDeskError::Config("No config file found".to_string()))?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| PrepDeskError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`). Parse errors
/// report the position only; the offending line may hold a token.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PrepDeskError::Config(format!("Invalid TOML format: {}", e.message()))),
        "json" => serde_json::from_str(contents).map_err(|e| {
            PrepDeskError::Config(format!(
                "Invalid JSON format ({:?}) at line {} column {}",
                e.classify(),
                e.line(),
                e.column()
            ))
        }),
        _ => Err(PrepDeskError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory and its parent, then the
/// executable's directory.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(FILE_NAMES.iter().map(|name| cwd.join(name)));
        candidates.extend(FILE_NAMES.iter().map(|name| cwd.join("..").join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(FILE_NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Reject configurations the scanner or adapters cannot work with.
fn validate(config: &Config) -> Result<()> {
    let scan = &config.scan;
    if scan.min_offset_minutes > scan.max_offset_minutes {
        return Err(PrepDeskError::Config(format!(
            "scan window is empty: min offset {} exceeds max offset {}",
            scan.min_offset_minutes, scan.max_offset_minutes
        )));
    }
    if scan.tolerance_minutes < 0 {
        return Err(PrepDeskError::Config("scan tolerance must not be negative".into()));
    }
    if scan.keyword.trim().is_empty() {
        return Err(PrepDeskError::Config("meeting keyword must not be empty".into()));
    }
    if config.http.timeout_seconds == 0 {
        return Err(PrepDeskError::Config("HTTP timeout must be at least one second".into()));
    }
    Ok(())
}

/// Credential variable, blank when unset.
fn env_or_blank(key: &str) -> String {
    env_opt(key).unwrap_or_default()
}

/// Blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

/// Parse an optional tuning variable, falling back to `default` when unset.
///
/// # Errors
/// Returns `PrepDeskError::Config` naming the variable when the value does
/// not parse.
fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env_opt(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| PrepDeskError::Config(format!("Invalid value for {key}: {raw}"))),
        None => Ok(default),
    }
}
