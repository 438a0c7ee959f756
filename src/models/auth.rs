//! Roles y tipos de autenticación
//!
//! Este módulo define los roles del sistema y los claims del JWT.

use serde::{Deserialize, Serialize};

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    User,
    Mechanic,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Mechanic => "mechanic",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(UserRole::User),
            "mechanic" => Some(UserRole::Mechanic),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Mecánicos y administradores: el personal del taller
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Mechanic | UserRole::Admin)
    }
}

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::User, UserRole::Mechanic, UserRole::Admin] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("superadmin"), None);
    }

    #[test]
    fn test_is_staff() {
        assert!(!UserRole::User.is_staff());
        assert!(UserRole::Mechanic.is_staff());
        assert!(UserRole::Admin.is_staff());
    }
}
