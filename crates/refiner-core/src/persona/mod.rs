//! Persona domain module.
//!
//! A persona is a user-authored set of instructions (and optional examples)
//! that is sent as extra context with gateway requests while it is selected.
//!
//! - `model`: the immutable [`Persona`] value
//! - `request`: [`CreatePersonaRequest`] with form validation

mod model;
pub mod request;

pub use model::Persona;
pub use request::CreatePersonaRequest;
