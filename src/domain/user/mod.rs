//! User domain - entity, inputs, repository seam

mod entity;
mod repository;

pub use entity::{User, UserInput};
pub use repository::UserRepository;
