//! Environment-driven service configuration.

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_path: String,
    pub table_ttl_secs: u64,
    pub static_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("DASH_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("DASH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            data_path: std::env::var("DASH_DATA_PATH")
                .unwrap_or_else(|_| "data/trials.csv".to_string()),
            table_ttl_secs: std::env::var("DASH_TABLE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            static_dir: std::env::var("DASH_STATIC_DIR")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
