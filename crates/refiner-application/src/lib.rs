//! Application layer of the prompt refiner.
//!
//! [`RefinementSession`] coordinates the generation gateway, the history
//! and the personas. Each operation kind has its own fenced state machine.

pub mod bootstrap;
pub mod history_service;
pub mod operation_state;
pub mod persona_service;
pub mod refinement_session;
pub mod refinement_state;

pub use bootstrap::{open_default_session, open_session};
pub use history_service::HistoryService;
pub use operation_state::{OperationSlot, OperationState, RequestToken};
pub use persona_service::PersonaService;
pub use refinement_session::RefinementSession;
pub use refinement_state::RefinementState;
