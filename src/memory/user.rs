use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::controller::{ControllerError, ControllerResult, UserController};
use crate::model::User;

/// Users kept in process memory, keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUsers {
    users: DashMap<String, User>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, user: User) -> ControllerResult<()> {
        check_username(&user)?;
        self.users.insert(user.username.clone(), user);
        Ok(())
    }
}

fn check_username(user: &User) -> ControllerResult<()> {
    if user.username.trim().is_empty() {
        return Err(ControllerError::validation("username must not be empty"));
    }
    Ok(())
}

#[async_trait]
impl UserController for InMemoryUsers {
    async fn create_user(&self, user: User) -> ControllerResult<()> {
        self.insert(user)
    }

    async fn create_users_with_array_input(&self, users: Vec<User>) -> ControllerResult<()> {
        users.into_iter().try_for_each(|u| self.insert(u))
    }

    async fn create_users_with_list_input(&self, users: Vec<User>) -> ControllerResult<()> {
        users.into_iter().try_for_each(|u| self.insert(u))
    }

    async fn login_user(&self, username: String, password: String) -> ControllerResult<String> {
        let valid = self
            .users
            .get(&username)
            .is_some_and(|u| u.password.as_deref() == Some(password.as_str()));
        if !valid {
            return Err(ControllerError::invalid_input("invalid username/password supplied"));
        }
        Ok(format!("logged in user session:{}", Uuid::new_v4()))
    }

    async fn logout_user(&self) -> ControllerResult<()> {
        Ok(())
    }

    async fn get_user_by_name(&self, username: String) -> ControllerResult<User> {
        self.users
            .get(&username)
            .map(|e| e.value().clone())
            .ok_or_else(|| ControllerError::not_found(format!("user {username}")))
    }

    async fn update_user(&self, username: String, mut user: User) -> ControllerResult<()> {
        if user.username.is_empty() {
            user.username = username.clone();
        }
        check_username(&user)?;

        if user.username == username {
            let mut entry = self
                .users
                .get_mut(&username)
                .ok_or_else(|| ControllerError::not_found(format!("user {username}")))?;
            *entry = user;
            return Ok(());
        }

        if !self.users.contains_key(&username) {
            return Err(ControllerError::not_found(format!("user {username}")));
        }
        // New key is claimed before the old one is released.
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => {
                return Err(ControllerError::validation(format!(
                    "username `{}` is already taken",
                    user.username
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(user);
            }
        }
        self.users.remove(&username);
        Ok(())
    }

    async fn delete_user(&self, username: String) -> ControllerResult<()> {
        self.users
            .remove(&username)
            .map(|_| ())
            .ok_or_else(|| ControllerError::not_found(format!("user {username}")))
    }
}
