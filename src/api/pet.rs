//! `pet` resource scheme.

use std::sync::Arc;

use crate::controller::PetController;
use crate::model::Pet;
use crate::routing::{bind, DispatchError, Invocation, Reply, RouteTable, RouteTableError};

pub const MOUNT: &str = "/pet";

/// Build the pet route table. Literal paths precede `/pet/{petId}`.
pub fn routes(controller: &Arc<dyn PetController>) -> Result<RouteTable, RouteTableError> {
    RouteTable::builder("pet", MOUNT)
        .put("/pet", "updatePet", bind(controller, update_pet))
        .post("/pet", "addPet", bind(controller, add_pet))
        .get("/pet/findByStatus", "findPetsByStatus", bind(controller, find_pets_by_status))
        .get("/pet/findByTags", "findPetsByTags", bind(controller, find_pets_by_tags))
        .get("/pet/{petId}", "getPetById", bind(controller, get_pet_by_id))
        .post("/pet/{petId}", "updatePetWithForm", bind(controller, update_pet_with_form))
        .delete("/pet/{petId}", "deletePet", bind(controller, delete_pet))
        .post("/pet/{petId}/uploadImage", "uploadFile", bind(controller, upload_file))
        .build()
}

async fn update_pet(c: Arc<dyn PetController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let pet: Pet = inv.json()?;
    Reply::json(&c.update_pet(pet).await?)
}

async fn add_pet(c: Arc<dyn PetController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let pet: Pet = inv.json()?;
    Reply::json(&c.add_pet(pet).await?)
}

async fn find_pets_by_status(
    c: Arc<dyn PetController>,
    inv: Invocation,
) -> Result<Reply, DispatchError> {
    let statuses = inv.query_list("status");
    if statuses.is_empty() {
        return Err(DispatchError::invalid_input("missing query parameter `status`"));
    }
    Reply::json(&c.find_pets_by_status(statuses).await?)
}

async fn find_pets_by_tags(
    c: Arc<dyn PetController>,
    inv: Invocation,
) -> Result<Reply, DispatchError> {
    let tags = inv.query_list("tags");
    if tags.is_empty() {
        return Err(DispatchError::invalid_input("missing query parameter `tags`"));
    }
    Reply::json(&c.find_pets_by_tags(tags).await?)
}

async fn get_pet_by_id(c: Arc<dyn PetController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let pet_id: i64 = inv.parse_param("petId")?;
    Reply::json(&c.get_pet_by_id(pet_id).await?)
}

async fn update_pet_with_form(
    c: Arc<dyn PetController>,
    inv: Invocation,
) -> Result<Reply, DispatchError> {
    let pet_id: i64 = inv.parse_param("petId")?;
    let name = inv.form_field("name");
    let status = inv.form_field("status");
    c.update_pet_with_form(pet_id, name, status).await?;
    Ok(Reply::Empty)
}

async fn delete_pet(c: Arc<dyn PetController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let pet_id: i64 = inv.parse_param("petId")?;
    let api_key = inv.header("api_key").map(str::to_string);
    c.delete_pet(pet_id, api_key).await?;
    Ok(Reply::Empty)
}

async fn upload_file(c: Arc<dyn PetController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let pet_id: i64 = inv.parse_param("petId")?;
    let metadata = inv.query("additionalMetadata").map(str::to_string);
    Reply::json(&c.upload_file(pet_id, metadata, inv.body().clone()).await?)
}
