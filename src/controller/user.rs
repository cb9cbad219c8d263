use async_trait::async_trait;

use crate::controller::ControllerResult;
use crate::model::User;

/// Capabilities of the `user` resource.
#[async_trait]
pub trait UserController: Send + Sync {
    async fn create_user(&self, user: User) -> ControllerResult<()>;

    async fn create_users_with_array_input(&self, users: Vec<User>) -> ControllerResult<()>;

    async fn create_users_with_list_input(&self, users: Vec<User>) -> ControllerResult<()>;

    /// Returns a session token.
    async fn login_user(&self, username: String, password: String) -> ControllerResult<String>;

    async fn logout_user(&self) -> ControllerResult<()>;

    async fn get_user_by_name(&self, username: String) -> ControllerResult<User>;

    async fn update_user(&self, username: String, user: User) -> ControllerResult<()>;

    async fn delete_user(&self, username: String) -> ControllerResult<()>;
}
