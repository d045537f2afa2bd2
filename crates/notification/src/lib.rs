mod address;
mod config;
mod mailer;
mod message;
mod notifier;
mod resend;
mod smtp;
pub(crate) mod template;

pub use address::*;
pub use config::*;
pub use mailer::*;
pub use notifier::*;
pub use resend::*;
pub use smtp::*;

rust_i18n::i18n!("locales", fallback = "en");
