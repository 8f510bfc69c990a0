use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub recommendation: RecommendationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port).parse().unwrap()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            workers: num_cpus::get(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub movies_path: String,
    pub ratings_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            movies_path: "data/movies.csv".to_string(),
            ratings_path: "data/ratings.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Number of similar movies returned when the request does not ask for
    /// an explicit count.
    pub default_top_n: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self { default_top_n: 10 }
    }
}

impl Config {
    /// Optional config file layered under CINEREC_* environment overrides;
    /// falls back to defaults when neither is present.
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/cinerec").required(false))
            .add_source(
                config::Environment::with_prefix("CINEREC")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
