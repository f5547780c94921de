//! Application ports (hexagonal architecture boundaries)
//!
//! Repository interfaces are defined in `domain`.
//! Outbound ports that depend on application-layer types live here.

pub mod outbound;

pub use outbound::{DeliveryError, MailMessage, MailTransport, MailTransportFactory};
