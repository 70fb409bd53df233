use std::{env, str::FromStr, time::Duration};

use anyhow::Context as _;

const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_STATS_INTERVAL_SECS: u64 = 60;
const DEFAULT_STATS_TIMEOUT_SECS: u64 = 30;

/// Where the stats gauges are shipped.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MetricsExporter {
    /// OTLP over HTTP; the endpoint comes from the standard `OTEL_EXPORTER_OTLP_*` variables.
    #[default]
    Otlp,
    /// Gauges are recorded but never exported.
    None,
}

impl MetricsExporter {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "otlp" => Ok(Self::Otlp),
            "none" => Ok(Self::None),
            other => anyhow::bail!("METRICS_EXPORTER must be 'otlp' or 'none', got '{other}'"),
        }
    }
}

/// Runtime settings read from the environment.
pub struct BotConfig {
    pub discord_token: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub stats_interval: Duration,
    pub stats_timeout: Duration,
    pub metrics_exporter: MetricsExporter,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let discord_token = required(&lookup, "DISCORD_TOKEN")?;
        let database_url = required(&lookup, "DATABASE_URL")?;
        let database_max_connections = parse_or(
            &lookup,
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_DATABASE_MAX_CONNECTIONS,
        )?;
        let stats_interval_secs =
            parse_or(&lookup, "STATS_INTERVAL_SECS", DEFAULT_STATS_INTERVAL_SECS)?;
        let stats_timeout_secs =
            parse_or(&lookup, "STATS_TIMEOUT_SECS", DEFAULT_STATS_TIMEOUT_SECS)?;

        let metrics_exporter = match lookup("METRICS_EXPORTER").filter(|v| !v.trim().is_empty()) {
            Some(raw) => MetricsExporter::parse(&raw)?,
            None => MetricsExporter::default(),
        };

        anyhow::ensure!(
            database_max_connections >= 1,
            "DATABASE_MAX_CONNECTIONS must be at least 1"
        );
        anyhow::ensure!(
            stats_interval_secs >= 1,
            "STATS_INTERVAL_SECS must be at least 1"
        );
        anyhow::ensure!(
            stats_timeout_secs >= 1,
            "STATS_TIMEOUT_SECS must be at least 1"
        );

        Ok(Self {
            discord_token,
            database_url,
            database_max_connections,
            stats_interval: Duration::from_secs(stats_interval_secs),
            stats_timeout: Duration::from_secs(stats_timeout_secs),
            metrics_exporter,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<String> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{key} must be set"))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|value| !value.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
