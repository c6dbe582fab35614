pub mod app_config;
pub mod database;
pub mod offer_repo;

pub use app_config::Config;
pub use database::DbClient;
pub use offer_repo::PostgresOfferRepository;
