//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use petstore_router::controller::{
    ControllerError, ControllerResult, PetController, StoreController, UserController,
};
use petstore_router::model::{ApiResponse, Order, Pet, User};
use petstore_router::routing::Router;
use petstore_router::{api_router, HttpServer, ServerConfig, Shutdown};

/// Id that every stub treats as missing.
pub const MISSING_ID: i64 = 404;

/// One capability invocation seen by a stub controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub capability: &'static str,
    pub args: Value,
}

/// Shared log of capability invocations, in call order.
#[derive(Debug, Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
}

impl Recorder {
    fn record(&self, capability: &'static str, args: Value) {
        self.calls.lock().unwrap().push(Call { capability, args });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn capabilities(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.capability).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

fn missing(id: i64) -> ControllerResult<()> {
    if id == MISSING_ID {
        Err(ControllerError::not_found(format!("id {id}")))
    } else {
        Ok(())
    }
}

/// Controller stub implementing all three resources, recording every call.
pub struct StubController {
    pub recorder: Arc<Recorder>,
}

#[async_trait]
impl PetController for StubController {
    async fn add_pet(&self, pet: Pet) -> ControllerResult<Pet> {
        self.recorder.record("addPet", json!({ "name": pet.name }));
        Ok(pet)
    }

    async fn update_pet(&self, pet: Pet) -> ControllerResult<Pet> {
        self.recorder.record("updatePet", json!({ "name": pet.name }));
        Ok(pet)
    }

    async fn find_pets_by_status(&self, statuses: Vec<String>) -> ControllerResult<Vec<Pet>> {
        self.recorder.record("findPetsByStatus", json!({ "status": statuses }));
        Ok(Vec::new())
    }

    async fn find_pets_by_tags(&self, tags: Vec<String>) -> ControllerResult<Vec<Pet>> {
        self.recorder.record("findPetsByTags", json!({ "tags": tags }));
        Ok(Vec::new())
    }

    async fn get_pet_by_id(&self, pet_id: i64) -> ControllerResult<Pet> {
        self.recorder.record("getPetById", json!({ "petId": pet_id }));
        missing(pet_id)?;
        Ok(Pet {
            id: Some(pet_id),
            name: "stub".into(),
            ..Pet::default()
        })
    }

    async fn update_pet_with_form(
        &self,
        pet_id: i64,
        name: Option<String>,
        status: Option<String>,
    ) -> ControllerResult<()> {
        self.recorder.record(
            "updatePetWithForm",
            json!({ "petId": pet_id, "name": name, "status": status }),
        );
        missing(pet_id)
    }

    async fn delete_pet(&self, pet_id: i64, api_key: Option<String>) -> ControllerResult<()> {
        self.recorder
            .record("deletePet", json!({ "petId": pet_id, "api_key": api_key }));
        missing(pet_id)
    }

    async fn upload_file(
        &self,
        pet_id: i64,
        additional_metadata: Option<String>,
        file: Bytes,
    ) -> ControllerResult<ApiResponse> {
        self.recorder.record(
            "uploadFile",
            json!({ "petId": pet_id, "additionalMetadata": additional_metadata, "size": file.len() }),
        );
        Ok(ApiResponse {
            code: 200,
            kind: "stub".into(),
            message: String::new(),
        })
    }
}

#[async_trait]
impl StoreController for StubController {
    async fn get_inventory(&self) -> ControllerResult<HashMap<String, i32>> {
        self.recorder.record("getInventory", json!({}));
        Ok(HashMap::from([("available".to_string(), 3)]))
    }

    async fn place_order(&self, order: Order) -> ControllerResult<Order> {
        self.recorder.record("placeOrder", json!({ "petId": order.pet_id }));
        Ok(order)
    }

    async fn get_order_by_id(&self, order_id: i64) -> ControllerResult<Order> {
        self.recorder.record("getOrderById", json!({ "orderId": order_id }));
        missing(order_id)?;
        Ok(Order {
            id: Some(order_id),
            ..Order::default()
        })
    }

    async fn delete_order(&self, order_id: i64) -> ControllerResult<()> {
        self.recorder.record("deleteOrder", json!({ "orderId": order_id }));
        missing(order_id)
    }
}

#[async_trait]
impl UserController for StubController {
    async fn create_user(&self, user: User) -> ControllerResult<()> {
        self.recorder.record("createUser", json!({ "username": user.username }));
        Ok(())
    }

    async fn create_users_with_array_input(&self, users: Vec<User>) -> ControllerResult<()> {
        self.recorder
            .record("createUsersWithArrayInput", json!({ "count": users.len() }));
        Ok(())
    }

    async fn create_users_with_list_input(&self, users: Vec<User>) -> ControllerResult<()> {
        self.recorder
            .record("createUsersWithListInput", json!({ "count": users.len() }));
        Ok(())
    }

    async fn login_user(&self, username: String, password: String) -> ControllerResult<String> {
        self.recorder.record(
            "loginUser",
            json!({ "username": username, "password": password }),
        );
        Ok("token".into())
    }

    async fn logout_user(&self) -> ControllerResult<()> {
        self.recorder.record("logoutUser", json!({}));
        Ok(())
    }

    async fn get_user_by_name(&self, username: String) -> ControllerResult<User> {
        self.recorder.record("getUserByName", json!({ "username": username }));
        Ok(User {
            username,
            ..User::default()
        })
    }

    async fn update_user(&self, username: String, _user: User) -> ControllerResult<()> {
        self.recorder.record("updateUser", json!({ "username": username }));
        Ok(())
    }

    async fn delete_user(&self, username: String) -> ControllerResult<()> {
        self.recorder.record("deleteUser", json!({ "username": username }));
        Ok(())
    }
}

/// Petstore router over recording stubs, plus the shared recorder.
pub fn stub_router() -> (Router, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let stub = || {
        Arc::new(StubController {
            recorder: recorder.clone(),
        })
    };
    let router = api_router(stub(), stub(), stub()).unwrap();
    (router, recorder)
}

/// HTTP server over recording stubs.
pub fn stub_server(config: ServerConfig) -> (HttpServer, Arc<Recorder>) {
    let (router, recorder) = stub_router();
    (HttpServer::new(config, Arc::new(router)), recorder)
}

/// Bind an ephemeral port, serve `server` on it and return its address.
pub async fn spawn_server(server: HttpServer, shutdown: &Shutdown) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}
