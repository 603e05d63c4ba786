pub mod in_memory_repository;
pub mod postgres_repository;
pub mod service;

pub use in_memory_repository::InMemoryUserRepository;
pub use postgres_repository::PostgresUserRepository;
pub use service::UserService;
