use crate::pipeline::ColumnLayout;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
    pub dashboard: DashboardConfig,
}

const DEFAULT_HIGH_SCHOOL_FILE: &str = "都道府県別_学校数(高).xlsx";
const DEFAULT_UNIVERSITY_FILE: &str = "都道府県別_学校数(大)_2025.xlsx";
const DEFAULT_OUTCOME_FILE: &str = "都道府県別_卒業後状況_2025.xlsx";
const DEFAULT_OUTCOME_SHEETS: &str = "国立,公立,私立";
const OUTCOME_FILE_VARS: [&str; 3] = [
    "APP_OUTCOME_NATIONAL_FILE",
    "APP_OUTCOME_PUBLIC_FILE",
    "APP_OUTCOME_PRIVATE_FILE",
];

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_limit = env::var("APP_RANKING_LIMIT")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<usize>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or(ConfigError::InvalidRankingLimit)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig::from_env()?,
            dashboard: DashboardConfig { default_limit },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// A single tabular input: a file and, for workbooks, the sheet to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub sheet: Option<String>,
}

/// Locations and layout of the source spreadsheets.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub high_school: SourceConfig,
    pub university: SourceConfig,
    /// National, public, private.
    pub outcomes: [SourceConfig; 3],
    pub header_rows: usize,
    pub layout: ColumnLayout,
}

impl DataConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(env::var("APP_DATA_DIR").unwrap_or_else(|_| "files".into()));
        let file = |var: &str, default: &str| {
            data_dir.join(env::var(var).unwrap_or_else(|_| default.into()))
        };

        let outcome_file = file("APP_OUTCOME_FILE", DEFAULT_OUTCOME_FILE);
        let sheets = parse_outcome_sheets(
            &env::var("APP_OUTCOME_SHEETS").unwrap_or_else(|_| DEFAULT_OUTCOME_SHEETS.into()),
        )?;
        let outcomes = [0, 1, 2].map(|slot| SourceConfig {
            path: env::var(OUTCOME_FILE_VARS[slot])
                .map(|name| data_dir.join(name))
                .unwrap_or_else(|_| outcome_file.clone()),
            sheet: Some(sheets[slot].clone()),
        });

        let header_rows = env::var("APP_HEADER_ROWS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidHeaderRows)?;

        let defaults = ColumnLayout::default();
        let layout = ColumnLayout {
            region: env::var("APP_REGION_COLUMN").unwrap_or(defaults.region),
            school_total: env::var("APP_TOTAL_COLUMN").unwrap_or(defaults.school_total),
            graduates: env::var("APP_GRADUATES_COLUMN").unwrap_or(defaults.graduates),
            university_track: env::var("APP_UNIVERSITY_TRACK_COLUMN")
                .unwrap_or(defaults.university_track),
        };

        Ok(Self {
            high_school: SourceConfig {
                path: file("APP_HIGH_SCHOOL_FILE", DEFAULT_HIGH_SCHOOL_FILE),
                sheet: None,
            },
            university: SourceConfig {
                path: file("APP_UNIVERSITY_FILE", DEFAULT_UNIVERSITY_FILE),
                sheet: None,
            },
            outcomes,
            header_rows,
            layout,
        })
    }
}

fn parse_outcome_sheets(raw: &str) -> Result<[String; 3], ConfigError> {
    let sheets: Vec<String> = raw
        .split(',')
        .map(|sheet| sheet.trim().to_string())
        .filter(|sheet| !sheet.is_empty())
        .collect();

    <[String; 3]>::try_from(sheets).map_err(|_| ConfigError::InvalidOutcomeSheets)
}

/// Defaults for the interactive views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    pub default_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidHeaderRows,
    InvalidRankingLimit,
    InvalidOutcomeSheets,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidHeaderRows => {
                write!(f, "APP_HEADER_ROWS must be a non-negative integer")
            }
            ConfigError::InvalidRankingLimit => {
                write!(f, "APP_RANKING_LIMIT must be a positive integer")
            }
            ConfigError::InvalidOutcomeSheets => write!(
                f,
                "APP_OUTCOME_SHEETS must list exactly three sheet names (national, public, private)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
