//! Configuration loading

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, DatabaseConfig, LogFormat, LoggingConfig, RedisConfig, ServerConfig,
    SessionConfig,
};
