pub mod app_config;
pub mod config;
pub mod geo;
pub mod place;
pub mod rating;
pub mod restaurant;
pub mod seed;
pub mod selection;
pub mod session;
pub mod store;
pub mod view;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{haversine_m, Coordinate};
pub use place::{find_registered, mark_registered, CandidatePlace};
pub use restaurant::{Cuisine, NewRestaurant, Restaurant, RestaurantPatch};
pub use seed::{load_seed_file, SeedFile, SeedRestaurant};
pub use selection::{ActiveFilter, Selection, SelectionState, SortOption};
pub use session::{record_review, register_candidate, Registration, SessionError};
pub use store::{RestaurantStore, StoreError};
pub use view::{render, RenderModel, ViewContext};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid cuisine: {0}")]
    InvalidCuisine(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[from] serde_yaml::Error),

    #[error("seed validation failed: {0}")]
    Validation(String),
}
