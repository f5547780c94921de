//! Database entities module

pub mod global_options;
pub mod user;

pub use global_options::Entity as GlobalOptions;
pub use user::Entity as User;
