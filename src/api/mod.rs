//! Petstore route schemes and the composite router built from them.
//!
//! Each resource module owns its fixed scheme (method, template, operation)
//! and the small binding functions that turn an [`Invocation`] into the typed
//! arguments of one controller capability.
//!
//! [`Invocation`]: crate::routing::Invocation

use std::sync::Arc;

use crate::controller::{PetController, StoreController, UserController};
use crate::routing::{RouteTableError, Router};

pub mod pet;
pub mod store;
pub mod user;

/// Compose the Petstore API from one controller per resource.
///
/// Tables are mounted in the order pet, store, user. The controllers stay owned
/// by the caller; the router only keeps shared handles to them.
pub fn api_router(
    pet_controller: Arc<dyn PetController>,
    store_controller: Arc<dyn StoreController>,
    user_controller: Arc<dyn UserController>,
) -> Result<Router, RouteTableError> {
    Ok(Router::builder()
        .mount(pet::routes(&pet_controller)?)
        .mount(store::routes(&store_controller)?)
        .mount(user::routes(&user_controller)?)
        .build())
}
