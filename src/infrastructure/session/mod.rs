pub mod in_memory;
pub mod redis_store;

pub use in_memory::InMemorySessionStore;
pub use redis_store::{RedisSessionConfig, RedisSessionStore};
