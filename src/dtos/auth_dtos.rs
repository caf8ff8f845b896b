use serde::{Deserialize, Serialize};

use crate::models::user::UserPublic;

#[derive(Debug, Deserialize)]
pub struct RegisterIn {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginIn {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthOut {
    pub token: String,
    pub user: UserPublic,
}
