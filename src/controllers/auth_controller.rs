//! Controller de autenticación
//!
//! Registro, login y perfil del usuario autenticado. Las contraseñas se
//! almacenan con bcrypt; el hash nunca sale en las responses.

use sqlx::PgPool;

use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::middleware::auth::{generate_jwt_token, AuthenticatedUser};
use crate::models::auth::UserRole;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{conflict_error, validation_error, AppError};

pub struct AuthController {
    repository: UserRepository,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            config,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        use validator::Validate;
        request.validate()?;

        // El rol admin nunca se autoasigna en el registro
        let role = match request.role.as_deref() {
            None => UserRole::User,
            Some("user") => UserRole::User,
            Some("mechanic") => UserRole::Mechanic,
            Some(_) => return Err(validation_error("role", "role must be user or mechanic")),
        };

        if self.repository.email_exists(&request.email).await? {
            return Err(conflict_error("User", "email", &request.email));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let user = self
            .repository
            .create(
                request.name,
                request.email.to_lowercase(),
                password_hash,
                request.phone,
                role.as_str().to_string(),
                request.specialization,
            )
            .await?;

        let token = generate_jwt_token(&user, &self.config)?;

        tracing::info!(user_id = %user.id, "Usuario registrado");

        Ok(AuthResponse {
            success: true,
            token,
            user: UserResponse::from(user),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        use validator::Validate;
        request.validate()?;

        let user = self
            .repository
            .find_by_email(&request.email.to_lowercase())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        if !valid {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = generate_jwt_token(&user, &self.config)?;

        Ok(AuthResponse {
            success: true,
            token,
            user: UserResponse::from(user),
        })
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserResponse::from(user))
    }
}
