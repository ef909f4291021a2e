pub mod config;
pub mod error;
pub mod export;
pub mod postprocess;
pub mod publish;
pub mod site;
pub mod sitemap;
pub mod templates;

pub use config::Config;
pub use error::ConfigError;
