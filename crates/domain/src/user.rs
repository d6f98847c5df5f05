use crate::shared::entity::Entity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Access-role tag attached to every stored user.
///
/// Persisted as the strings `ADMIN` / `USER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Admin => write!(f, "ADMIN"),
            UserType::User => write!(f, "USER"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("invalid user type: {0}")]
pub struct InvalidUserType(pub String);

impl FromStr for UserType {
    type Err = InvalidUserType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserType::Admin),
            "USER" => Ok(UserType::User),
            other => Err(InvalidUserType(other.to_string())),
        }
    }
}

/// A single user record. The username doubles as the natural key and is
/// immutable after creation; the password is stored verbatim as provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    pub user_type: UserType,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        user_type: UserType,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            user_type,
        }
    }
}

impl Entity for User {
    fn id(&self) -> String {
        self.username.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_type_roundtrips_through_display_and_fromstr() {
        for user_type in [UserType::Admin, UserType::User] {
            let parsed: UserType = user_type.to_string().parse().unwrap();
            assert_eq!(parsed, user_type);
        }
    }

    #[test]
    fn unknown_user_type_is_rejected() {
        let err = "SUPERADMIN".parse::<UserType>().unwrap_err();
        assert_eq!(err.0, "SUPERADMIN");
    }

    #[test]
    fn username_is_the_entity_id() {
        let user = User::new("a@x.com", "pw1", UserType::Admin);
        assert_eq!(user.id(), "a@x.com");
    }
}
