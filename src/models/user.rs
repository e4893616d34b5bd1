use serde::{Deserialize, Serialize};

/// Account created on first Google sign-in.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub google_id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
    pub created_at: String,
    pub last_login: String,
}

/// Shape of `users.json`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UsersFile {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Public part of a user returned by `/auth/status`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub picture: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        SessionUser {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone(),
        }
    }
}
