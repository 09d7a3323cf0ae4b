use crate::error::BrokerError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use core_types::{Account, CoreError};
use database::{DbError, DbRepository};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Account registration and credential handling.
///
/// Passwords are stored as salted Argon2id hashes; the plaintext never leaves
/// this module. Every new account is issued the configured starting cash.
pub struct AccountService {
    repo: DbRepository,
    issuance: Decimal,
}

impl AccountService {
    pub fn new(repo: DbRepository, issuance: Decimal) -> Self {
        Self { repo, issuance }
    }

    /// Registers a new account and grants it the starting issuance.
    ///
    /// Fails with `DuplicateUsername` when the name is taken and with
    /// `PasswordMismatch` when the confirmation disagrees. The caller is
    /// expected to authenticate the returned account immediately.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Account, BrokerError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CoreError::InvalidInput(
                "username".to_string(),
                "username must not be blank".to_string(),
            )
            .into());
        }
        if password.is_empty() {
            return Err(CoreError::InvalidInput(
                "password".to_string(),
                "password must not be blank".to_string(),
            )
            .into());
        }
        if password != confirmation {
            return Err(BrokerError::PasswordMismatch);
        }

        let password_hash = hash_password(password)?;
        let account = self
            .repo
            .create_account(username, &password_hash, self.issuance)
            .await
            .map_err(|e| match e {
                DbError::DuplicateUsername(name) => BrokerError::DuplicateUsername(name),
                other => other.into(),
            })?;

        tracing::info!(username = %account.username, "account registered");
        Ok(account)
    }

    /// Verifies a username/password pair.
    ///
    /// Returns the same `InvalidCredentials` error for an unknown username
    /// and a wrong password; callers cannot tell which check failed.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, BrokerError> {
        let account = self.repo.find_account_by_username(username.trim()).await?;

        let Some(account) = account else {
            return Err(BrokerError::InvalidCredentials);
        };
        if !verify_password(password, &account.password_hash)? {
            return Err(BrokerError::InvalidCredentials);
        }
        Ok(account)
    }

    /// Replaces an account's password after re-verifying the old one.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        old_password: &str,
        new_password: &str,
        confirmation: &str,
    ) -> Result<(), BrokerError> {
        if new_password.is_empty() {
            return Err(CoreError::InvalidInput(
                "password".to_string(),
                "new password must not be blank".to_string(),
            )
            .into());
        }
        if new_password != confirmation {
            return Err(BrokerError::PasswordMismatch);
        }

        let account = self.repo.find_account_by_id(account_id).await?;
        if !verify_password(old_password, &account.password_hash)? {
            return Err(BrokerError::InvalidCredentials);
        }

        let password_hash = hash_password(new_password)?;
        self.repo
            .update_password_hash(account_id, &password_hash)
            .await?;

        tracing::info!(username = %account.username, "password changed");
        Ok(())
    }
}

/// Hashes a plaintext password into an Argon2id PHC string with a fresh salt.
fn hash_password(plaintext: &str) -> Result<String, BrokerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BrokerError::Hashing(e.to_string()))
}

/// Verifies a plaintext password against a stored PHC string.
fn verify_password(plaintext: &str, stored: &str) -> Result<bool, BrokerError> {
    let parsed = PasswordHash::new(stored).map_err(|e| BrokerError::Hashing(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn each_hash_gets_a_fresh_salt() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn garbage_stored_hash_is_an_error_not_a_match() {
        assert!(verify_password("hunter2", "not-a-phc-string").is_err());
    }
}
