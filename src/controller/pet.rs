use async_trait::async_trait;
use axum::body::Bytes;

use crate::controller::ControllerResult;
use crate::model::{ApiResponse, Pet};

/// Capabilities of the `pet` resource.
#[async_trait]
pub trait PetController: Send + Sync {
    /// Add a new pet to the store.
    async fn add_pet(&self, pet: Pet) -> ControllerResult<Pet>;

    /// Replace an existing pet, identified by `pet.id`.
    async fn update_pet(&self, pet: Pet) -> ControllerResult<Pet>;

    /// Pets whose status is one of `statuses`.
    async fn find_pets_by_status(&self, statuses: Vec<String>) -> ControllerResult<Vec<Pet>>;

    /// Pets carrying any of `tags`.
    async fn find_pets_by_tags(&self, tags: Vec<String>) -> ControllerResult<Vec<Pet>>;

    async fn get_pet_by_id(&self, pet_id: i64) -> ControllerResult<Pet>;

    async fn update_pet_with_form(
        &self,
        pet_id: i64,
        name: Option<String>,
        status: Option<String>,
    ) -> ControllerResult<()>;

    async fn delete_pet(&self, pet_id: i64, api_key: Option<String>) -> ControllerResult<()>;

    /// Attach an image to a pet. `file` is the raw request body.
    async fn upload_file(
        &self,
        pet_id: i64,
        additional_metadata: Option<String>,
        file: Bytes,
    ) -> ControllerResult<ApiResponse>;
}
