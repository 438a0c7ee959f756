//! Modelo de User
//!
//! Este módulo contiene el struct User que mapea a la tabla users.
//! El hash de la contraseña nunca sale en las responses (ver dto).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::auth::UserRole;

/// User principal - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: String,
    pub specialization: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Rol tipado; un valor desconocido en la fila degrada a `user`
    pub fn role(&self) -> UserRole {
        UserRole::from_str(&self.role).unwrap_or(UserRole::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            phone: None,
            role: role.to_string(),
            specialization: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_typed_role() {
        assert_eq!(sample_user("mechanic").role(), UserRole::Mechanic);
        assert_eq!(sample_user("garbage").role(), UserRole::User);
    }
}
