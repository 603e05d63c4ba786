pub mod audit;
pub mod cache;
pub mod logging;
pub mod session;
pub mod user;
