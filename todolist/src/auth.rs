//! Registration and login against the `users` table.
//!
//! Passwords are stored as a single unsalted SHA-256 pass, hex encoded. This
//! matches the stored data of existing installations; it is a known weakness
//! and not something to build on.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::entity::user;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Storage failure: {0}")]
    Storage(#[from] DbErr),
}

/// Lowercase hex SHA-256 of the password's UTF-8 bytes.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Store a new user. Fails with [`AuthError::DuplicateUsername`] when the
/// username is taken; the existing row is left untouched in that case.
pub async fn register(
    db: &impl ConnectionTrait,
    username: &str,
    password: &str,
) -> Result<(), AuthError> {
    let new_user = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)),
    };

    match new_user.insert(db).await {
        Ok(_) => {
            log::info!("registered user {username}");
            Ok(())
        }
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                log::warn!("registration rejected, {username} already exists");
                Err(AuthError::DuplicateUsername)
            }
            _ => Err(AuthError::Storage(err)),
        },
    }
}

/// Registration as the form submits it: the confirmation must match before
/// anything reaches storage.
pub async fn register_confirmed(
    db: &impl ConnectionTrait,
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), AuthError> {
    if password != confirm {
        return Err(AuthError::PasswordMismatch);
    }
    register(db, username, password).await
}

/// Look a user up by username and password hash.
///
/// Returns `None` both for an unknown username and for a wrong password.
pub async fn authenticate(
    db: &impl ConnectionTrait,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>, DbErr> {
    let found = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::PasswordHash.eq(hash_password(password)))
        .one(db)
        .await?;

    if found.is_some() {
        log::info!("user {username} authenticated");
    } else {
        log::warn!("failed login attempt for {username}");
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hash_is_deterministic_and_unsalted() {
        assert_eq!(hash_password("pw1"), hash_password("pw1"));
        assert_ne!(hash_password("pw1"), hash_password("pw2"));
        assert_eq!(hash_password("pw1").len(), 64);
    }
}
