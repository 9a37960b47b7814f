//! User, role and session models matching the backend auth payloads.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::FieldErrors;

/// Club role carried by every authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Mentor,
    Member,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Mentor => "mentor",
            Role::Member => "member",
            Role::Guest => "guest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "mentor" => Some(Role::Mentor),
            "member" => Some(Role::Member),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }

    /// Dashboard heading shown for this role.
    pub fn dashboard_title(&self) -> &'static str {
        match self {
            Role::Admin => "Admin Controls",
            Role::Mentor => "Mentor Tools",
            Role::Member => "Member Area",
            Role::Guest => "Guest Access",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    /// Unknown role strings degrade to the least-privileged role.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw.to_ascii_lowercase()).unwrap_or_else(|| {
            tracing::warn!("Unknown role {:?}, treating as guest", raw);
            Role::Guest
        }))
    }
}

/// Identity part of a session, as persisted under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// The authenticated identity bound to this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserPayload) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token: token.into(),
        }
    }

    /// The user payload this session was created from.
    pub fn user(&self) -> UserPayload {
        UserPayload {
            id: self.user_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Response body of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: UserPayload,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.name.trim().chars().count() < 2 {
            errors.push("name", "Name must be at least 2 characters");
        }
        if !is_valid_email(&self.email) {
            errors.push("email", "Invalid email address");
        }
        if self.password.chars().count() < 6 {
            errors.push("password", "Password must be at least 6 characters");
        }
        errors
    }
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !is_valid_email(&self.email) {
            errors.push("email", "Invalid email address");
        }
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors
    }
}

/// Shape check only: one `@`, a non-empty local part, a dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|part| !part.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_response_accepts_extra_fields() {
        let body = json!({
            "token": "jwt-123",
            "_id": "u1",
            "name": "Asha Rao",
            "email": "asha@citc.dev",
            "role": "mentor",
            "rollNo": "21CS042"
        });
        let response: AuthResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.token, "jwt-123");
        assert_eq!(response.user.id, "u1");
        assert_eq!(response.user.role, Role::Mentor);
    }

    #[test]
    fn test_unknown_role_is_guest() {
        let user: UserPayload = serde_json::from_value(json!({
            "id": "u2",
            "name": "Visitor",
            "email": "v@citc.dev",
            "role": "superuser"
        }))
        .unwrap();
        assert_eq!(user.role, Role::Guest);
        assert_eq!(user.id, "u2");
    }

    #[test]
    fn test_session_round_trips_user_payload() {
        let user = UserPayload {
            id: "u3".into(),
            name: "Kiran Patel".into(),
            email: "kiran@citc.dev".into(),
            role: Role::Admin,
        };
        let session = Session::new("tok", user.clone());
        assert_eq!(session.user(), user);
        assert_eq!(session.first_name(), "Kiran");
    }

    #[test]
    fn test_signup_validation() {
        let request = SignupRequest {
            name: "A".into(),
            email: "not-an-email".into(),
            password: "12345".into(),
            roll_no: None,
            semester: None,
        };
        let errors = request.validate();
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );

        let request = SignupRequest {
            name: "Al".into(),
            email: "al@citc.dev".into(),
            password: "123456".into(),
            roll_no: Some("21CS001".into()),
            semester: None,
        };
        assert!(request.validate().is_empty());
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["rollNo"], "21CS001");
        assert!(body.get("semester").is_none());
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a@.co"));
    }
}
