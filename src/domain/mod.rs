//! Domain layer: entities and repository interfaces.

pub mod options;
pub mod user;

pub use options::{GlobalOptions, GlobalOptionsRepository, SmtpSettings};
pub use user::{normalize_email, NewUser, User, UserChanges, UserRepositoryInterface, UserRole};

pub use crate::support::errors::{DomainError, DomainResult};
