use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{NewUser, RegisterUser, User};
use crate::infrastructure::basic_auth::Credentials;
use crate::infrastructure::security::PasswordSecurity;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    password_security: PasswordSecurity,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_security: PasswordSecurity,
    ) -> Self {
        Self {
            user_repository,
            password_security,
        }
    }

    #[instrument(skip(self, req))]
    pub async fn register_user(&self, req: RegisterUser) -> Result<User> {
        trace!("Starting user registration");

        let registration = req.validate().map_err(|errors| {
            warn!(violations = errors.len(), "Registration payload rejected");
            DomainError::Validation(errors)
        })?;

        let password_hash = self
            .password_security
            .hash_password(&registration.password)
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                DomainError::Internal(format!("Failed to hash password: {}", e))
            })?;

        debug!(email = %registration.email_address, "Saving user to repository");
        let user = self
            .user_repository
            .create_user(NewUser {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email_address: registration.email_address,
                password_hash,
            })
            .await?;

        info!(
            user_id = user.id,
            email = %user.email_address,
            "User registered successfully"
        );

        Ok(user)
    }

    /// Resolves the user behind a Basic credential pair.
    ///
    /// Missing credentials, an unknown email and a wrong password all fail
    /// with the same `DomainError::Unauthorized`.
    #[instrument(skip(self, credentials))]
    pub async fn authenticate(&self, credentials: Option<Credentials>) -> Result<User> {
        let Some(credentials) = credentials else {
            warn!("Missing or malformed Authorization header");
            return Err(DomainError::Unauthorized.into());
        };

        let user = self
            .user_repository
            .find_user_by_email(&credentials.identifier)
            .await?
            .ok_or_else(|| {
                warn!(email = %credentials.identifier, "User not found during authentication");
                DomainError::Unauthorized
            })?;

        let is_valid = self
            .password_security
            .verify_password(&credentials.secret, &user.password_hash)
            .map_err(|e| {
                error!(user_id = user.id, error = %e, "Failed to verify password");
                DomainError::Internal(format!("Failed to verify password: {}", e))
            })?;

        if !is_valid {
            warn!(user_id = user.id, "Invalid password during authentication");
            return Err(DomainError::Unauthorized.into());
        }

        debug!(user_id = user.id, "Authentication successful");
        Ok(user)
    }
}
