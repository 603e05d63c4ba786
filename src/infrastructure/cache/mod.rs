pub mod in_memory;
pub mod redis;

pub use in_memory::InMemoryCache;
pub use redis::{RedisCache, RedisCacheConfig};
