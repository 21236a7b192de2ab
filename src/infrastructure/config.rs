use std::env;
use std::path::PathBuf;

pub const DEFAULT_LOAN_PERIOD_DAYS: u32 = 14;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    /// Directory the log relay appends `server.log` and `error.log` to
    pub log_dir: PathBuf,
    /// Default loan length when an issuance is created without a due date
    pub loan_period_days: u32,
    pub seed_demo: bool,
}

impl Config {
    /// Read the environment, letting an explicit profile (from `--profile`)
    /// win over `PROFILE`.
    pub fn with_profile(profile: Option<String>) -> Self {
        let profile = profile
            .or_else(|| env::var("PROFILE").ok())
            .unwrap_or_else(|| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://library_desk.db?mode=rwc".to_string()
            } else {
                format!("sqlite://library_desk_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            profile,
            log_dir: env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("logs")),
            loan_period_days: env::var("LOAN_PERIOD_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_LOAN_PERIOD_DAYS),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }
}
