pub mod app_config;
pub mod config;
pub mod product_url;
pub mod products;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use product_url::{parse_product_url, ProductRef};
pub use products::{
    Category, LookupError, LookupRequest, LookupResult, MatchCandidate, ProductIdentity,
    RatingMarker,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
