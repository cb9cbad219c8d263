//! Controller contracts.
//!
//! One trait per resource, one async method per operation. The router only
//! needs the trait; any `Send + Sync` implementation can be mounted.

mod pet;
mod store;
mod user;

pub use pet::PetController;
pub use store::StoreController;
pub use user::UserController;

/// Failure raised by a controller capability.
///
/// Opaque to the router: it is carried to the transport unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ControllerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type returned by controller capabilities.
pub type ControllerResult<T> = Result<T, ControllerError>;
