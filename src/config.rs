use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub allowed_origin: String,
    pub seed_file: Option<PathBuf>,
    pub api_base_url: String,
}

impl Config {
    /// Read the environment, after loading `.env` if there is one.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: try_load("DATABASE_URL", "sqlite:menu.db"),
            host: try_load("API_HOST", "127.0.0.1"),
            port: try_load("API_PORT", "8080"),
            allowed_origin: try_load("ALLOWED_ORIGIN", "http://localhost:3000"),
            seed_file: env::var("SEED_FILE").ok().map(PathBuf::from),
            api_base_url: try_load("API_BASE_URL", "http://127.0.0.1:8080/api/v1"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => return value,
            Err(e) => warn!("Invalid {key} value {raw:?}: {e}, using default: {default}"),
        },
        Err(_) => info!("{key} not set, using default: {default}"),
    }
    parse_default(key, default)
}

fn parse_default<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    match default.parse() {
        Ok(value) => value,
        Err(e) => panic!("built-in default for {key} does not parse: {e}"),
    }
}
