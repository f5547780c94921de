pub mod identity;
pub mod notifications;
pub mod ports;

// Re-export key types for convenience
pub use identity::{AccountService, RedeemResetRequest, RegisterRequest, UpdateProfileRequest};
pub use notifications::{NotificationDispatcher, RenderedTemplate, Template, TemplateKind};
pub use ports::{DeliveryError, MailMessage, MailTransport, MailTransportFactory};
