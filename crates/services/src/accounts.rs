//! # AccountService
//!
//! Registration, password login, cookie sessions and profile settings.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use domains::{
    DomainError, NewUser, PasswordHasher, ProfileUpdate, Result, Session, SessionRepository,
    SocialLinks, TokenGenerator, User, UserRepository,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::validation::{is_valid_username, optional, required};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const UNAUTHORIZED: &str = "Unauthorized";

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Settings form input. Blank optional values clear the field.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

/// A fresh login: the plaintext token goes into the cookie, nowhere else.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenGenerator>,
    session_ttl: Duration,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenGenerator>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            tokens,
            session_ttl,
        }
    }

    #[tracing::instrument(skip_all, fields(username = ?form.username))]
    pub async fn register(&self, form: Registration) -> Result<User> {
        const MISSING: &str = "Missing required fields";
        let name = required(form.name.as_deref(), MISSING)?;
        let email = required(form.email.as_deref(), MISSING)?.to_lowercase();
        let username = required(form.username.as_deref(), MISSING)?;
        let password = form
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| DomainError::validation(MISSING))?;

        if !email.contains('@') {
            return Err(DomainError::validation("Email is invalid"));
        }
        if !is_valid_username(&username) {
            return Err(DomainError::validation("Username is invalid"));
        }

        // Email first, then username
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Email already exists"));
        }
        if self.users.find_by_username(&username).await?.is_some() {
            return Err(DomainError::conflict("Username already taken"));
        }

        let password_hash = self.hasher.hash_password(&password)?;
        let user = self
            .users
            .create_user(NewUser {
                name,
                email,
                username,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str, now: DateTime<Utc>) -> Result<LoginSession> {
        let email = email.trim().to_lowercase();
        let credentials = self
            .users
            .find_credentials(&email)
            .await?
            .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

        if !self
            .hasher
            .verify_password(password, &credentials.password_hash)
        {
            warn!(user_id = %credentials.user.id, "password mismatch");
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        // Housekeeping only, a failure here must not block the login
        if let Err(e) = self.sessions.purge_expired(now).await {
            warn!(error = %e, "could not purge expired sessions");
        }

        let token = self.tokens.session_token()?;
        let expires_at = now + self.session_ttl;
        self.sessions
            .create_session(Session {
                token_hash: self.tokens.digest(&token),
                user_id: credentials.user.id,
                created_at: now,
                expires_at,
            })
            .await?;

        info!(user_id = %credentials.user.id, "user logged in");
        Ok(LoginSession {
            token,
            user: credentials.user,
            expires_at,
        })
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        self.sessions
            .delete_session(&self.tokens.digest(token))
            .await
    }

    /// Resolves a cookie token to its user.
    pub async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<User> {
        let session = self
            .sessions
            .find_session(&self.tokens.digest(token))
            .await?
            .filter(|s| !s.is_expired(now))
            .ok_or_else(|| DomainError::unauthorized(UNAUTHORIZED))?;

        self.users
            .get_user(session.user_id)
            .await?
            .ok_or_else(|| DomainError::unauthorized(UNAUTHORIZED))
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<User> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn update_profile(&self, user_id: Uuid, form: ProfileForm) -> Result<User> {
        let update = ProfileUpdate {
            name: required(form.name.as_deref(), "Please provide a name")?,
            image: optional(form.image),
            bio: optional(form.bio),
            social_links: SocialLinks {
                twitter: optional(form.twitter),
                github: optional(form.github),
                website: optional(form.website),
            },
        };
        self.users.update_profile(user_id, update).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        MockPasswordHasher, MockSessionRepository, MockTokenGenerator, MockUserRepository,
        UserCredentials,
    };
    use mockall::predicate::eq;

    fn user(email: &str) -> User {
        User {
            id: Uuid::now_v7(),
            name: "Jane".into(),
            email: email.into(),
            username: "jane".into(),
            image: None,
            bio: None,
            social_links: SocialLinks::default(),
            created_at: Utc::now(),
        }
    }

    fn tokens() -> MockTokenGenerator {
        let mut tokens = MockTokenGenerator::new();
        tokens
            .expect_session_token()
            .returning(|| Ok("plain-token".to_string()));
        tokens
            .expect_digest()
            .returning(|secret| format!("digest({secret})"));
        tokens
    }

    fn service(
        users: MockUserRepository,
        sessions: MockSessionRepository,
        hasher: MockPasswordHasher,
    ) -> AccountService {
        AccountService::new(
            Arc::new(users),
            Arc::new(sessions),
            Arc::new(hasher),
            Arc::new(tokens()),
            Duration::hours(24),
        )
    }

    fn registration() -> Registration {
        Registration {
            name: Some("Jane".into()),
            email: Some("Jane@Example.com".into()),
            username: Some("jane".into()),
            password: Some("hunter22".into()),
        }
    }

    #[tokio::test]
    async fn register_hashes_password_and_lowercases_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email()
            .with(eq("jane@example.com"))
            .returning(|_| Ok(None));
        users.expect_find_by_username().returning(|_| Ok(None));
        users.expect_create_user().returning(|new| {
            assert_eq!(new.password_hash, "hashed:hunter22");
            Ok(user(&new.email))
        });

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash_password()
            .returning(|p| Ok(format!("hashed:{p}")));

        let created = service(users, MockSessionRepository::new(), hasher)
            .register(registration())
            .await
            .unwrap();
        assert_eq!(created.email, "jane@example.com");
    }

    #[tokio::test]
    async fn register_reports_which_identity_is_taken() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email()
            .returning(|e| Ok(Some(user(e))));
        let err = service(users, MockSessionRepository::new(), MockPasswordHasher::new())
            .register(registration())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::conflict("Email already exists"));

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_find_by_username()
            .returning(|_| Ok(Some(user("other@example.com"))));
        let err = service(users, MockSessionRepository::new(), MockPasswordHasher::new())
            .register(registration())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::conflict("Username already taken"));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let accounts = service(
            MockUserRepository::new(),
            MockSessionRepository::new(),
            MockPasswordHasher::new(),
        );

        let mut missing = registration();
        missing.password = None;
        assert_eq!(
            accounts.register(missing).await.unwrap_err(),
            DomainError::validation("Missing required fields")
        );

        let mut bad = registration();
        bad.username = Some("jane doe".into());
        assert_eq!(
            accounts.register(bad).await.unwrap_err(),
            DomainError::validation("Username is invalid")
        );
    }

    #[tokio::test]
    async fn login_creates_session_with_digest() {
        let now = Utc::now();
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().returning(|e| {
            Ok(Some(UserCredentials {
                user: user(e),
                password_hash: "stored".into(),
            }))
        });

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify_password()
            .with(eq("hunter22"), eq("stored"))
            .returning(|_, _| true);

        let mut sessions = MockSessionRepository::new();
        sessions.expect_purge_expired().returning(|_| Ok(0));
        sessions
            .expect_create_session()
            .withf(move |s| s.token_hash == "digest(plain-token)" && s.expires_at == now + Duration::hours(24))
            .times(1)
            .returning(|_| Ok(()));

        let login = service(users, sessions, hasher)
            .login(" JANE@example.com ", "hunter22", now)
            .await
            .unwrap();
        assert_eq!(login.token, "plain-token");
        assert_eq!(login.user.email, "jane@example.com");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email() {
        let mut users = MockUserRepository::new();
        users.expect_find_credentials().returning(|e| {
            Ok(Some(UserCredentials {
                user: user(e),
                password_hash: "stored".into(),
            }))
        });
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify_password().returning(|_, _| false);
        let mut sessions = MockSessionRepository::new();
        sessions.expect_create_session().never();

        let err = service(users, sessions, hasher)
            .login("jane@example.com", "nope", Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::unauthorized(INVALID_CREDENTIALS));

        let mut users = MockUserRepository::new();
        users.expect_find_credentials().returning(|_| Ok(None));
        let err = service(users, MockSessionRepository::new(), MockPasswordHasher::new())
            .login("ghost@example.com", "x", Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::unauthorized(INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn expired_sessions_do_not_authenticate() {
        let now = Utc::now();
        let mut sessions = MockSessionRepository::new();
        sessions
            .expect_find_session()
            .with(eq("digest(cookie)"))
            .returning(move |hash| {
                Ok(Some(Session {
                    token_hash: hash.to_string(),
                    user_id: Uuid::now_v7(),
                    created_at: now - Duration::days(8),
                    expires_at: now - Duration::days(1),
                }))
            });
        let mut users = MockUserRepository::new();
        users.expect_get_user().never();

        let err = service(users, sessions, MockPasswordHasher::new())
            .authenticate("cookie", now)
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::unauthorized(UNAUTHORIZED));
    }

    #[tokio::test]
    async fn profile_update_clears_blank_fields() {
        let id = Uuid::now_v7();
        let mut users = MockUserRepository::new();
        users
            .expect_update_profile()
            .withf(|_, update| {
                update.name == "Jane D."
                    && update.bio.is_none()
                    && update.social_links.github.as_deref() == Some("janed")
            })
            .returning(|_, update| {
                let mut u = user("jane@example.com");
                u.name = update.name;
                Ok(u)
            });

        let updated = service(users, MockSessionRepository::new(), MockPasswordHasher::new())
            .update_profile(
                id,
                ProfileForm {
                    name: Some(" Jane D. ".into()),
                    bio: Some("  ".into()),
                    github: Some("janed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Jane D.");
    }
}
