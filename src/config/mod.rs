use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

/// HTTP side of the scraper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Where the leaderboard lives in a segment page and what each column means.
///
/// Column indices are zero-based over the `td` cells of a row. The page has
/// reordered columns before, so none of them are hard-coded in the parser.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_heading_selector")]
    pub heading_selector: String,

    /// Visible heading text preceding the table. `None` takes the first
    /// table matching `table_selector`.
    #[serde(default = "default_heading")]
    pub heading: Option<String>,

    #[serde(default = "default_table_selector")]
    pub table_selector: String,

    #[serde(default = "default_rank_column")]
    pub rank_column: Option<usize>,

    #[serde(default = "default_name_column")]
    pub name_column: usize,

    #[serde(default = "default_activity_path")]
    pub activity_path: String,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://www.strava.com".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
fn default_heading_selector() -> String {
    "h2".to_string()
}
fn default_heading() -> Option<String> {
    Some("Overall Leaderboard".to_string())
}
fn default_table_selector() -> String {
    "table.table-leaderboard".to_string()
}
fn default_rank_column() -> Option<usize> {
    Some(0)
}
fn default_name_column() -> usize {
    1
}
fn default_activity_path() -> String {
    "/activities/".to_string()
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            heading_selector: default_heading_selector(),
            heading: default_heading(),
            table_selector: default_table_selector(),
            rank_column: default_rank_column(),
            name_column: default_name_column(),
            activity_path: default_activity_path(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

/// `KOM__SCRAPER__BASE_URL` → `scraper.base_url`
fn env_source() -> config::Environment {
    config::Environment::with_prefix("KOM")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(env_source())
            .build()
            .context("Failed to read configuration")?;

        cfg.try_deserialize()
            .context("Invalid configuration")
    }
}
