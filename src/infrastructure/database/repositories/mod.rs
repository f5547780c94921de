//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories.

pub mod options_repository;
pub mod user_repository;

pub use options_repository::OptionsRepository;
pub use user_repository::UserRepository;
