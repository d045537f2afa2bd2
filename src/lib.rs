pub mod assets;
pub mod config;
pub mod cookies;
pub mod images;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;
pub mod session;
pub mod template;
pub mod view;

pub use routes::AppState;

rust_i18n::i18n!("locales", fallback = "en");
