pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{RecError, RecResult};
pub use models::*;

use services::dataset::Dataset;
use services::recommendation::RecommenderService;
use std::sync::Arc;

/// Shared application state. Everything behind the Arcs is built once at
/// startup and immutable afterwards, so clones handed to request handlers
/// need no locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recommender: Arc<RecommenderService>,
}

impl AppState {
    pub fn new(config: Config) -> RecResult<Self> {
        let config = Arc::new(config);

        let dataset = Dataset::load(&config.data)?;
        let recommender = Arc::new(RecommenderService::new(
            dataset.movies,
            &dataset.ratings,
            config.recommendation.default_top_n,
        )?);

        Ok(Self {
            config,
            recommender,
        })
    }
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
