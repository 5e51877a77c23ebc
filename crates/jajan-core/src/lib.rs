pub mod app_config;
pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod keyword;
pub mod rank;
pub mod seed;
pub mod store;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use engine::{SearchEngine, SearchSettings};
pub use error::{ConfigError, SearchError, StoreError};
pub use geo::{distance_meters, format_distance_label, EARTH_RADIUS_METERS};
pub use keyword::filter_by_keywords;
pub use rank::rank;
pub use seed::{load_seed_file, parse_seed, SeedFile};
pub use store::{CandidateFilter, CandidateStore, InMemoryCandidateStore};
pub use types::{
    AdminArea, Coordinate, Listing, NewPeddler, PeddlerRecord, PeddlerStatus, RankedItem,
    ResultPage, SearchQuery,
};
