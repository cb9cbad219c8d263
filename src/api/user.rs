//! `user` resource scheme.

use std::sync::Arc;

use crate::controller::UserController;
use crate::model::User;
use crate::routing::{bind, DispatchError, Invocation, Reply, RouteTable, RouteTableError};

pub const MOUNT: &str = "/user";

/// Build the user route table. `login`/`logout` precede `/user/{username}`
/// so they are not captured as usernames.
pub fn routes(controller: &Arc<dyn UserController>) -> Result<RouteTable, RouteTableError> {
    RouteTable::builder("user", MOUNT)
        .post("/user", "createUser", bind(controller, create_user))
        .post("/user/createWithArray", "createUsersWithArrayInput", bind(controller, create_with_array))
        .post("/user/createWithList", "createUsersWithListInput", bind(controller, create_with_list))
        .get("/user/login", "loginUser", bind(controller, login_user))
        .get("/user/logout", "logoutUser", bind(controller, logout_user))
        .get("/user/{username}", "getUserByName", bind(controller, get_user_by_name))
        .put("/user/{username}", "updateUser", bind(controller, update_user))
        .delete("/user/{username}", "deleteUser", bind(controller, delete_user))
        .build()
}

async fn create_user(c: Arc<dyn UserController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let user: User = inv.json()?;
    c.create_user(user).await?;
    Ok(Reply::Empty)
}

async fn create_with_array(
    c: Arc<dyn UserController>,
    inv: Invocation,
) -> Result<Reply, DispatchError> {
    let users: Vec<User> = inv.json()?;
    c.create_users_with_array_input(users).await?;
    Ok(Reply::Empty)
}

async fn create_with_list(
    c: Arc<dyn UserController>,
    inv: Invocation,
) -> Result<Reply, DispatchError> {
    let users: Vec<User> = inv.json()?;
    c.create_users_with_list_input(users).await?;
    Ok(Reply::Empty)
}

async fn login_user(c: Arc<dyn UserController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let username = inv.require_query("username")?.to_string();
    let password = inv.require_query("password")?.to_string();
    Reply::json(&c.login_user(username, password).await?)
}

async fn logout_user(c: Arc<dyn UserController>, _: Invocation) -> Result<Reply, DispatchError> {
    c.logout_user().await?;
    Ok(Reply::Empty)
}

async fn get_user_by_name(
    c: Arc<dyn UserController>,
    inv: Invocation,
) -> Result<Reply, DispatchError> {
    let username: String = inv.parse_param("username")?;
    Reply::json(&c.get_user_by_name(username).await?)
}

async fn update_user(c: Arc<dyn UserController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let username: String = inv.parse_param("username")?;
    let user: User = inv.json()?;
    c.update_user(username, user).await?;
    Ok(Reply::Empty)
}

async fn delete_user(c: Arc<dyn UserController>, inv: Invocation) -> Result<Reply, DispatchError> {
    let username: String = inv.parse_param("username")?;
    c.delete_user(username).await?;
    Ok(Reply::Empty)
}
