//! Global options aggregate

pub mod model;
pub mod repository;

pub use model::{GlobalOptions, SmtpSettings};
pub use repository::GlobalOptionsRepository;
