//! Front-end configuration.

use std::env;

use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Jobs beyond this count are refused.
    pub max_job_number: usize,
    pub tile_layer: String,
    pub api_host: String,
    pub api_port: u16,
    pub overpass_endpoint: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_job_number: 100,
            tile_layer: "http://{s}.tile.osm.org/{z}/{x}/{y}.png".to_string(),
            api_host: "http://localhost".to_string(),
            api_port: 3000,
            overpass_endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Defaults overridden by `API_HOST`, `API_PORT` and `MAX_JOB_NUMBER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = lookup("API_HOST") {
            config.api_host = host.trim_end_matches('/').to_string();
        }
        if let Some(port) = lookup("API_PORT") {
            match port.parse() {
                Ok(port) => config.api_port = port,
                Err(_) => warn!("API_PORT {:?} is not a port number, using {}", port, config.api_port),
            }
        }
        if let Some(max) = lookup("MAX_JOB_NUMBER") {
            match max.parse() {
                Ok(max) => config.max_job_number = max,
                Err(_) => warn!(
                    "MAX_JOB_NUMBER {:?} is not a number, using {}",
                    max, config.max_job_number
                ),
            }
        }
        config
    }

    /// Base URL of the solving API.
    pub fn api_url(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            base_url: self.api_url(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Config::default().solver_config()
    }
}
