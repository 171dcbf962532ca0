//! Admin user models: the API's wire shape and the denormalized row
//! projection used by the users table.

use serde::{Deserialize, Serialize};

use super::common::Pagination;

/// `GET /users` response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersPayload {
    #[serde(default)]
    pub users: Vec<ApiUser>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// A user as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub role: Option<ApiUserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiUserRole {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Page-local projection for the users table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub avatar: String,
    pub status: String,
}

impl ApiUser {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            full_name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            role: self
                .role
                .as_ref()
                .and_then(|r| r.name.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            avatar: self.profile_image.clone().unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_else(|| "active".to_string()),
        }
    }
}

/// Create/update payload for a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    #[serde(rename = "roleId")]
    pub role_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// `PUT /profile` payload for the signed-in user's own account.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileInput {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// `PUT /profile/change-password` payload.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordInput {
    #[serde(rename = "currentPassword")]
    pub current_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_payload() {
        let json = r#"{
            "users": [
                {"id": 1, "name": "Amira Hassan", "email": "amira@example.test",
                 "profile_image": "/uploads/amira.png", "status": "Active",
                 "role": {"id": 2, "name": "Editor"}},
                {"id": 2, "email": "norole@example.test"}
            ],
            "pagination": {"page": 1, "limit": 10, "total": 2, "totalPages": 1}
        }"#;

        let payload: UsersPayload = serde_json::from_str(json).expect("parse users payload");
        assert_eq!(payload.users.len(), 2);
        assert_eq!(payload.pagination.total, 2);

        let user = payload.users[0].to_user();
        assert_eq!(user.full_name, "Amira Hassan");
        assert_eq!(user.role, "Editor");
        assert_eq!(user.status, "active");

        // Missing fields fall back to display defaults
        let bare = payload.users[1].to_user();
        assert_eq!(bare.full_name, "");
        assert_eq!(bare.role, "N/A");
        assert_eq!(bare.status, "active");
    }
}
