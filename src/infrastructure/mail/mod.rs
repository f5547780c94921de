//! Mail transports

mod memory;
mod smtp;

pub use memory::RecordingTransportFactory;
pub use smtp::{SmtpTransport, SmtpTransportFactory};
