//! Notification pipeline: template rendering and best-effort dispatch.

pub mod dispatcher;
pub mod templates;

pub use dispatcher::{DispatchReport, NotificationDispatcher, Outgoing};
pub use templates::{
    RenderedTemplate, Template, TemplateKind, TemplateVars, DEFAULT_FORGOT_PASSWORD_TEMPLATE,
    DEFAULT_NOTIFICATION_TEMPLATE,
};
