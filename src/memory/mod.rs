//! In-memory controllers.
//!
//! Process-local implementations of the controller traits, used by the
//! binary and by tests. Nothing is persisted; state lives in `DashMap`s so
//! concurrent requests need no extra locking.

mod pet;
mod store;
mod user;

use std::sync::Arc;

pub use pet::InMemoryPets;
pub use store::InMemoryStore;
pub use user::InMemoryUsers;

use crate::api::api_router;
use crate::routing::{RouteTableError, Router};

/// Build the Petstore router over fresh in-memory controllers.
pub fn router() -> Result<Router, RouteTableError> {
    let pets = Arc::new(InMemoryPets::new());
    let store = Arc::new(InMemoryStore::new(pets.clone()));
    let users = Arc::new(InMemoryUsers::new());
    api_router(pets, store, users)
}
