//! Role models and the role create/update payload.

use serde::{Deserialize, Serialize};

use super::common::Pagination;

/// `GET /roles` response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RolesPayload {
    #[serde(default)]
    pub roles: Vec<ApiRole>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRole {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ar: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Permission keys granted to the role; present on the detail view.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Row projection for the roles table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub name_ar: String,
    pub status: String,
}

impl ApiRole {
    pub fn to_role(&self) -> Role {
        Role {
            id: self.id,
            name: self.name.clone().unwrap_or_default(),
            name_ar: self.name_ar.clone().unwrap_or_default(),
            status: self.status.clone().unwrap_or_default(),
        }
    }
}

/// Create/update payload for a role.
#[derive(Debug, Clone, Serialize)]
pub struct RoleInput {
    pub name: String,
    pub name_ar: String,
    #[serde(rename = "permissionIds")]
    pub permission_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_input_wire_names() {
        let input = RoleInput {
            name: "Support".to_string(),
            name_ar: "الدعم".to_string(),
            permission_ids: vec![4, 9],
        };
        let json = serde_json::to_value(&input).expect("serialize role input");
        assert_eq!(json["permissionIds"], serde_json::json!([4, 9]));
        assert_eq!(json["name"], "Support");
    }
}
