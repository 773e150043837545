use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};

use super::{
    dto::PublicUser,
    errors::AuthError,
    jwt::JwtKeys,
    password::{derive_credential, verify_credential},
    repo::UserRepository,
    repo_types::UserRecord,
};

/// Registration and login on top of a user repository and the token keys.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<PublicUser, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation(
                "userName must be a non-empty field".into(),
            ));
        }
        if password.is_empty() {
            return Err(AuthError::Validation(
                "password must be a non-empty field".into(),
            ));
        }

        let record = UserRecord::new(username, derive_credential(password));
        self.users.append(record).await.map_err(|e| {
            warn!(username = %username, error = %e, "register rejected");
            AuthError::from(e)
        })?;

        info!(username = %username, "user registered");
        Ok(PublicUser {
            user_name: username.to_owned(),
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        self.login_at(username, password, OffsetDateTime::now_utc())
            .await
    }

    pub async fn login_at(
        &self,
        username: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<String, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation(
                "userName must be a non-empty field".into(),
            ));
        }
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(username = %username, "login unknown user");
            return Err(AuthError::UserNotFound);
        };

        if !verify_credential(password, &user.password_salt, &user.password_hash) {
            warn!(username = %username, "login invalid password");
            return Err(AuthError::BadCredentials);
        }

        let token = self.keys.sign_at(&user.user_name, now)?;
        info!(username = %username, "user logged in");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::JsonUserRepository;
    use std::path::Path;
    use tempfile::TempDir;

    const SECRET: &[u8] = b"test-secret";

    async fn make_service(dir: &Path) -> AuthService {
        let repo = JsonUserRepository::open(dir.join("users.json"))
            .await
            .unwrap();
        AuthService::new(Arc::new(repo), JwtKeys::from_secret(SECRET))
    }

    async fn stored_users(dir: &TempDir) -> Vec<UserRecord> {
        let raw = tokio::fs::read(dir.path().join("users.json")).await.unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    #[tokio::test]
    async fn register_persists_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let svc = make_service(dir.path()).await;

        let user = svc.register("alice", "hunter2").await.unwrap();
        assert_eq!(user.user_name, "alice");

        let users = stored_users(&dir).await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user_name, "alice");
        assert!(verify_credential(
            "hunter2",
            &users[0].password_salt,
            &users[0].password_hash
        ));
    }

    #[tokio::test]
    async fn register_twice_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let svc = make_service(dir.path()).await;
        svc.register("alice", "hunter2").await.unwrap();

        let err = svc.register("alice", "other").await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
        assert_eq!(stored_users(&dir).await.len(), 1);
    }

    #[tokio::test]
    async fn register_rejects_blank_username_and_empty_password() {
        let dir = tempfile::tempdir().unwrap();
        let svc = make_service(dir.path()).await;

        let err = svc.register("   ", "hunter2").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        let err = svc.register("alice", "").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn register_trims_username() {
        let dir = tempfile::tempdir().unwrap();
        let svc = make_service(dir.path()).await;
        let user = svc.register("  alice ", "hunter2").await.unwrap();
        assert_eq!(user.user_name, "alice");
        assert!(svc.login("alice", "hunter2").await.is_ok());
    }

    #[tokio::test]
    async fn login_issues_token_for_username() {
        let dir = tempfile::tempdir().unwrap();
        let svc = make_service(dir.path()).await;
        svc.register("alice", "hunter2").await.unwrap();

        let now = OffsetDateTime::now_utc();
        let token = svc.login_at("alice", "hunter2", now).await.unwrap();
        assert!(!token.is_empty());

        let claims = JwtKeys::from_secret(SECRET).verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, claims.iat + 24 * 60 * 60);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_bad_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let svc = make_service(dir.path()).await;
        svc.register("alice", "hunter2").await.unwrap();

        let err = svc.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
    }

    #[tokio::test]
    async fn login_matches_trimmed_username_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let svc = make_service(dir.path()).await;
        svc.register("alice", "hunter2").await.unwrap();

        assert!(svc.login("  alice\t", "hunter2").await.is_ok());
        let err = svc.login("Alice", "hunter2").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        let err = svc.login("   ", "hunter2").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn login_unknown_user_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let svc = make_service(dir.path()).await;

        let err = svc.login("bob", "x").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registration_keeps_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let svc = make_service(dir.path()).await;

        let a = tokio::spawn({
            let svc = svc.clone();
            async move { svc.register("carol", "first").await }
        });
        let b = tokio::spawn({
            let svc = svc.clone();
            async move { svc.register("carol", "second").await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AuthError::UsernameTaken))));

        let users = stored_users(&dir).await;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].user_name, "carol");
    }
}
