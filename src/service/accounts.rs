use crate::db::UsersStorage;
use crate::error::PestError;
use crate::service::password::PasswordScheme;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    MissingFields,
    UsernameTaken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(String),
    InvalidCredentials,
}

/// Registration and login over the `users` table. Usernames are stored and
/// matched exactly as submitted.
#[derive(Clone)]
pub struct AccountService {
    storage: UsersStorage,
    scheme: PasswordScheme,
}

impl AccountService {
    pub fn new(storage: UsersStorage, scheme: PasswordScheme) -> Self {
        Self { storage, scheme }
    }

    pub fn storage(&self) -> &UsersStorage {
        &self.storage
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisterOutcome, PestError> {
        if username.is_empty() || password.is_empty() {
            return Ok(RegisterOutcome::MissingFields);
        }

        match self
            .storage
            .insert(username, &self.scheme.digest(password))
            .await
        {
            Ok(()) => {
                info!(username = %username, "account created");
                Ok(RegisterOutcome::Created)
            }
            Err(PestError::UsernameTaken) => {
                info!(username = %username, "registration rejected; username exists");
                Ok(RegisterOutcome::UsernameTaken)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, PestError> {
        let found = self
            .storage
            .find_by_credentials(username, &self.scheme.digest(password))
            .await?;

        match found {
            Some(user) => {
                info!(username = %user.username, "login succeeded");
                Ok(LoginOutcome::Authenticated(user.username))
            }
            None => {
                warn!(username = %username, "login failed");
                Ok(LoginOutcome::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::tests::memory_storage;

    async fn service(scheme: PasswordScheme) -> AccountService {
        AccountService::new(memory_storage().await, scheme)
    }

    #[tokio::test]
    async fn second_registration_of_same_username_is_rejected() {
        let svc = service(PasswordScheme::Sha256).await;
        assert_eq!(
            svc.register("alice", "pw1").await.unwrap(),
            RegisterOutcome::Created
        );
        assert_eq!(
            svc.register("alice", "pw2").await.unwrap(),
            RegisterOutcome::UsernameTaken
        );
        assert_eq!(svc.storage().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_fields_are_not_stored() {
        let svc = service(PasswordScheme::Sha256).await;
        assert_eq!(
            svc.register("", "pw").await.unwrap(),
            RegisterOutcome::MissingFields
        );
        assert_eq!(
            svc.register("bob", "").await.unwrap(),
            RegisterOutcome::MissingFields
        );
        assert_eq!(svc.storage().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn usernames_are_matched_verbatim() {
        let svc = service(PasswordScheme::Sha256).await;
        assert_eq!(
            svc.register("alice", "pw").await.unwrap(),
            RegisterOutcome::Created
        );
        assert_eq!(
            svc.register(" alice", "pw").await.unwrap(),
            RegisterOutcome::Created
        );
        assert_eq!(svc.storage().count().await.unwrap(), 2);

        assert_eq!(
            svc.login(" alice", "pw").await.unwrap(),
            LoginOutcome::Authenticated(" alice".to_string())
        );
        assert_eq!(
            svc.login("alice ", "pw").await.unwrap(),
            LoginOutcome::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn login_succeeds_iff_password_matches() {
        for scheme in [PasswordScheme::Plain, PasswordScheme::Sha256] {
            let svc = service(scheme).await;
            svc.register("carol", "s3cret").await.unwrap();

            assert_eq!(
                svc.login("carol", "s3cret").await.unwrap(),
                LoginOutcome::Authenticated("carol".to_string())
            );
            assert_eq!(
                svc.login("carol", "S3cret").await.unwrap(),
                LoginOutcome::InvalidCredentials
            );
            assert_eq!(
                svc.login("nobody", "s3cret").await.unwrap(),
                LoginOutcome::InvalidCredentials
            );
        }
    }

    #[tokio::test]
    async fn sha256_scheme_never_stores_plaintext() {
        let svc = service(PasswordScheme::Sha256).await;
        svc.register("dave", "plaintext").await.unwrap();
        let row = svc
            .storage()
            .find_by_credentials("dave", "plaintext")
            .await
            .unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn failed_attempts_do_not_block_the_right_password() {
        let svc = service(PasswordScheme::Sha256).await;
        svc.register("erin", "right").await.unwrap();

        for _ in 0..50 {
            assert_eq!(
                svc.login("erin", "guess").await.unwrap(),
                LoginOutcome::InvalidCredentials
            );
        }
        assert_eq!(
            svc.login("erin", "right").await.unwrap(),
            LoginOutcome::Authenticated("erin".to_string())
        );
    }
}
