pub mod errors;

pub use errors::{DomainError, DomainResult, ErrorKind, InfraError};
