use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use axum::body::Bytes;
use dashmap::DashMap;

use crate::controller::{ControllerError, ControllerResult, PetController};
use crate::model::{ApiResponse, Pet, PetStatus};

/// Pets kept in process memory.
#[derive(Debug)]
pub struct InMemoryPets {
    pets: DashMap<i64, Pet>,
    next_id: AtomicI64,
}

impl InMemoryPets {
    pub fn new() -> Self {
        Self {
            pets: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Snapshot of all pets, ordered by id.
    pub fn all(&self) -> Vec<Pet> {
        let mut pets: Vec<Pet> = self.pets.iter().map(|e| e.value().clone()).collect();
        pets.sort_by_key(|p| p.id);
        pets
    }

    fn allocate_id(&self) -> ControllerResult<i64> {
        self.next_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
            .map_err(|_| ControllerError::Internal("pet id space exhausted".into()))
    }

    fn filtered(&self, keep: impl Fn(&Pet) -> bool) -> Vec<Pet> {
        self.all().into_iter().filter(|p| keep(p)).collect()
    }
}

impl Default for InMemoryPets {
    fn default() -> Self {
        Self::new()
    }
}

fn check_name(pet: &Pet) -> ControllerResult<()> {
    if pet.name.trim().is_empty() {
        return Err(ControllerError::validation("pet name must not be empty"));
    }
    Ok(())
}

#[async_trait]
impl PetController for InMemoryPets {
    async fn add_pet(&self, mut pet: Pet) -> ControllerResult<Pet> {
        check_name(&pet)?;
        let id = match pet.id {
            Some(id) => {
                self.next_id.fetch_max(id.saturating_add(1), Ordering::Relaxed);
                id
            }
            None => self.allocate_id()?,
        };
        pet.id = Some(id);
        self.pets.insert(id, pet.clone());
        tracing::debug!(pet_id = id, "Pet added");
        Ok(pet)
    }

    async fn update_pet(&self, pet: Pet) -> ControllerResult<Pet> {
        let id = pet
            .id
            .ok_or_else(|| ControllerError::invalid_input("pet id is required"))?;
        check_name(&pet)?;
        match self.pets.get_mut(&id) {
            Some(mut entry) => {
                *entry = pet.clone();
                Ok(pet)
            }
            None => Err(ControllerError::not_found(format!("pet {id}"))),
        }
    }

    async fn find_pets_by_status(&self, statuses: Vec<String>) -> ControllerResult<Vec<Pet>> {
        let wanted = statuses
            .iter()
            .map(|s| s.parse::<PetStatus>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(ControllerError::InvalidInput)?;
        Ok(self.filtered(|p| p.status.is_some_and(|s| wanted.contains(&s))))
    }

    async fn find_pets_by_tags(&self, tags: Vec<String>) -> ControllerResult<Vec<Pet>> {
        Ok(self.filtered(|p| {
            p.tags
                .iter()
                .any(|t| t.name.as_ref().is_some_and(|name| tags.contains(name)))
        }))
    }

    async fn get_pet_by_id(&self, pet_id: i64) -> ControllerResult<Pet> {
        self.pets
            .get(&pet_id)
            .map(|e| e.value().clone())
            .ok_or_else(|| ControllerError::not_found(format!("pet {pet_id}")))
    }

    async fn update_pet_with_form(
        &self,
        pet_id: i64,
        name: Option<String>,
        status: Option<String>,
    ) -> ControllerResult<()> {
        let status = status
            .map(|s| s.parse::<PetStatus>())
            .transpose()
            .map_err(ControllerError::InvalidInput)?;

        let mut entry = self
            .pets
            .get_mut(&pet_id)
            .ok_or_else(|| ControllerError::not_found(format!("pet {pet_id}")))?;
        if let Some(name) = name {
            entry.name = name;
        }
        if let Some(status) = status {
            entry.status = Some(status);
        }
        Ok(())
    }

    async fn delete_pet(&self, pet_id: i64, _api_key: Option<String>) -> ControllerResult<()> {
        self.pets
            .remove(&pet_id)
            .map(|_| ())
            .ok_or_else(|| ControllerError::not_found(format!("pet {pet_id}")))
    }

    async fn upload_file(
        &self,
        pet_id: i64,
        additional_metadata: Option<String>,
        file: Bytes,
    ) -> ControllerResult<ApiResponse> {
        if !self.pets.contains_key(&pet_id) {
            return Err(ControllerError::not_found(format!("pet {pet_id}")));
        }
        Ok(ApiResponse {
            code: 200,
            kind: "unknown".to_string(),
            message: format!(
                "additionalMetadata: {}\nFile uploaded, {} bytes",
                additional_metadata.unwrap_or_default(),
                file.len()
            ),
        })
    }
}
