use std::env;
use std::path::PathBuf;

pub const DEFAULT_EXPENSES_CSV: &str = "data/nl_rijksbegroting_uitgaven.csv";
pub const DEFAULT_INCOME_CSV: &str = "data/nl_rijksbegroting_inkomsten.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub expenses_path: PathBuf,
    pub income_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; unset or unparseable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("BUDGET_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("BUDGET_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(7070),
            expenses_path: lookup("BUDGET_EXPENSES_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPENSES_CSV)),
            income_path: lookup("BUDGET_INCOME_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INCOME_CSV)),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
