use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic point with a human-readable address.
///
/// Stored as an opaque JSON blob, not as normalized columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// How a user participates in rides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Rider,
    Driver,
    Both,
}

impl Role {
    /// Wire/database representation of the role
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Rider => "rider",
            Role::Driver => "driver",
            Role::Both => "both",
        }
    }

    /// Parse a role from its wire/database representation
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "rider" => Some(Role::Rider),
            "driver" => Some(Role::Driver),
            "both" => Some(Role::Both),
            _ => None,
        }
    }
}

/// User account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub location: Option<Location>,
    pub rating: f64,
    pub trust_score: i32,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Registration payload. Server-controlled fields (id, rating, trust score,
/// verification flag, timestamps) are filled in by the storage layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// Partial update for a user. `None` fields are left untouched;
/// patches set fields, they never clear them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub location: Option<Location>,
    pub rating: Option<f64>,
    pub trust_score: Option<i32>,
    pub is_verified: Option<bool>,
}

impl UserPatch {
    /// Merge the provided fields over an existing record
    pub fn apply(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = Some(avatar.clone());
        }
        if let Some(phone) = &self.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(location) = &self.location {
            user.location = Some(location.clone());
        }
        if let Some(rating) = self.rating {
            user.rating = rating;
        }
        if let Some(trust_score) = self.trust_score {
            user.trust_score = trust_score;
        }
        if let Some(is_verified) = self.is_verified {
            user.is_verified = is_verified;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            email: "alex@example.com".to_string(),
            name: "Alex Kumar".to_string(),
            role: Role::Both,
            avatar: None,
            phone: None,
            location: None,
            rating: 4.5,
            trust_score: 85,
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Both).unwrap(), "\"both\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"in valid\"").ok(),
            None
        );
        assert_eq!(Role::parse("driver"), Some(Role::Driver));
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn test_patch_merges_provided_fields_only() {
        let mut user = sample_user();
        let patch = UserPatch {
            name: Some("Alexander Kumar".to_string()),
            rating: Some(4.9),
            ..Default::default()
        };

        patch.apply(&mut user);

        assert_eq!(user.name, "Alexander Kumar");
        assert_eq!(user.rating, 4.9);
        // Untouched fields keep their values
        assert_eq!(user.email, "alex@example.com");
        assert_eq!(user.trust_score, 85);
        assert!(!user.is_verified);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut user = sample_user();
        let before = user.clone();

        UserPatch::default().apply(&mut user);

        assert_eq!(user, before);
    }

    #[test]
    fn test_patch_deserializes_camel_case() {
        let patch: UserPatch =
            serde_json::from_str(r#"{"trustScore": 90, "isVerified": true}"#).unwrap();
        assert_eq!(patch.trust_score, Some(90));
        assert_eq!(patch.is_verified, Some(true));
        assert!(patch.name.is_none());
    }
}
