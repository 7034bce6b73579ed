//! Outbound email adapters: staff notification dispatcher and transports.

mod notifier;
mod transport;

pub use notifier::{EmailNotifier, NotificationSettings};
pub use transport::{ApiMailTransport, ConsoleMailTransport, MailTransport, OutgoingEmail};
