//! User aggregate
//!
//! Contains the User entity, persistence DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_update;

pub use model::{normalize_email, User, UserRole};

pub use dto_create::NewUser;
pub use dto_update::UserChanges;

pub use repository::UserRepositoryInterface;
