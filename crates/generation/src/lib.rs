//! Structured generation of menus, images, shopping lists and nutrition
//! reports on top of a hosted language model.
//!
//! [`Generator`] owns the prompts and validates every response against its
//! schema before handing back domain types. The model itself sits behind the
//! [`LlmProvider`] trait so that tests and offline development can use
//! [`FakeProvider`].

mod config;
mod fake;
mod generator;
mod openai;
mod prompts;
mod provider;
mod schema;

pub use config::*;
pub use fake::*;
pub use generator::*;
pub use openai::*;
pub use provider::*;
