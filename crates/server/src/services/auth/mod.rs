//! Authentication service.
//!
//! Password login, self-signup and password change. Passwords are stored as
//! Argon2id PHC strings; plaintext never reaches the Data Store.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use store_ratings_core::validation::{
    bounded_password_check, loose_name_check, parse_email, password_confirmation_check, required,
    signup_address_check, signup_password_check,
};
use store_ratings_core::{Field, Role, UserId};

use crate::db::{DataStore, RepositoryError, UserRepository};
use crate::models::{NewUser, SessionUser};

/// Self-signup form fields.
#[derive(Debug, Clone, Copy)]
pub struct Signup<'f> {
    pub name: &'f str,
    pub email: &'f str,
    pub address: &'f str,
    pub password: &'f str,
}

/// Authentication service.
///
/// Handles signup, login and password changes.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a DataStore) -> Self {
        Self {
            users: UserRepository::new(store),
        }
    }

    /// Register a customer account.
    ///
    /// Fields are checked in form order: name, email, password, address.
    /// The new user always gets the customer role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for the first failing field.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered;
    /// the Users collection is left untouched.
    pub async fn signup(&self, form: Signup<'_>) -> Result<SessionUser, AuthError> {
        loose_name_check(form.name)?;
        required(Field::Email, form.email)?;
        let email = parse_email(form.email)?;
        signup_password_check(form.password)?;
        signup_address_check(form.address)?;

        // Fail fast before paying for the hash; `create` re-checks under the lock.
        if self.users.get_by_email(&email).await.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(form.password)?;

        let user = self
            .users
            .create(NewUser {
                name: form.name.to_owned(),
                email,
                address: form.address.to_owned(),
                password_hash: Some(password_hash),
                role: Role::Customer,
                store_id: None,
                avatar: None,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(SessionUser::from(&user))
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field is blank or the email is malformed.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        required(Field::Email, email)?;
        required(Field::Password, password)?;
        let email = parse_email(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await
            .ok_or(AuthError::InvalidCredentials)?;
        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, password_hash)?;

        Ok(SessionUser::from(&user))
    }

    /// Replace a user's password.
    ///
    /// The new password must match its confirmation and satisfy both the
    /// bounded and the signup password rules.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for the first failing rule.
    /// Returns `AuthError::UserNotFound` if the user has been deleted.
    pub async fn change_password(
        &self,
        user_id: UserId,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        required(Field::Password, new_password)?;
        password_confirmation_check(new_password, confirm_password)?;
        bounded_password_check(new_password)?;
        signup_password_check(new_password)?;

        let password_hash = hash_password(new_password)?;

        self.users
            .set_password_hash(user_id, password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
