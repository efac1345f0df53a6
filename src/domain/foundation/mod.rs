//! Foundation types shared across the domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccessToken, ChatId, OrderId};
pub use state_machine::StateMachine;
