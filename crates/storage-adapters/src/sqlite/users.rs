use async_trait::async_trait;
use domains::{
    DomainError, NewUser, ProfileUpdate, Result, SocialLinks, User, UserCredentials,
    UserRepository,
};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::{db_error, internal, SqliteStore};

const COLUMNS: &str = "id, name, email, username, image, bio, social_links, created_at";

fn to_user(row: &SqliteRow) -> std::result::Result<User, sqlx::Error> {
    // Unreadable link JSON just means "no links"
    let social_links: SocialLinks =
        serde_json::from_str(&row.try_get::<String, _>("social_links")?).unwrap_or_default();

    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        image: row.try_get("image")?,
        bio: row.try_get("bio")?,
        social_links,
        created_at: row.try_get("created_at")?,
    })
}

fn links_json(links: &SocialLinks) -> Result<String> {
    serde_json::to_string(links).map_err(|e| DomainError::internal(e.to_string()))
}

impl SqliteStore {
    async fn user_where(&self, clause: &str, value: &str) -> Result<Option<User>> {
        sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE {clause} = ?"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?
            .map(|row| to_user(&row))
            .transpose()
            .map_err(internal)
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    #[tracing::instrument(skip(self, user), fields(username = %user.username), level = "debug")]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let created = User {
            id: Uuid::now_v7(),
            name: user.name,
            email: user.email,
            username: user.username,
            image: None,
            bio: None,
            social_links: SocialLinks::default(),
            created_at: chrono::Utc::now(),
        };

        sqlx::query(
            "INSERT INTO users (id, name, email, username, password_hash, social_links, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(created.id)
        .bind(&created.name)
        .bind(&created.email)
        .bind(&created.username)
        .bind(&user.password_hash)
        .bind(links_json(&created.social_links)?)
        .bind(created.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Email or username already exists"))?;

        Ok(created)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(internal)?
            .map(|row| to_user(&row))
            .transpose()
            .map_err(internal)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_where("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_where("username", username).await
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS}, password_hash FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(internal)?;

        match row {
            Some(row) => Ok(Some(UserCredentials {
                user: to_user(&row).map_err(internal)?,
                password_hash: row.try_get("password_hash").map_err(internal)?,
            })),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, update), level = "debug")]
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<User> {
        let result = sqlx::query(
            "UPDATE users SET name = ?, image = ?, bio = ?, social_links = ? WHERE id = ?",
        )
        .bind(&update.name)
        .bind(&update.image)
        .bind(&update.bio)
        .bind(links_json(&update.social_links)?)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(internal)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("user", id));
        }
        self.get_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::{store, user};

    #[tokio::test]
    async fn lookups_by_email_and_username() {
        let store = store().await;
        let jane = user(&store, "jane").await;

        assert_eq!(store.find_by_email("jane@example.com").await.unwrap(), Some(jane.clone()));
        assert_eq!(store.find_by_username("jane").await.unwrap(), Some(jane.clone()));
        assert_eq!(store.get_user(jane.id).await.unwrap(), Some(jane));
        assert_eq!(store.find_by_username("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn credentials_carry_the_hash() {
        let store = store().await;
        user(&store, "jane").await;

        let creds = store
            .find_credentials("jane@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.password_hash, "$argon2id$stub");
        assert_eq!(creds.user.username, "jane");
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let store = store().await;
        user(&store, "jane").await;

        let err = store
            .create_user(NewUser {
                name: "Other".into(),
                email: "other@example.com".into(),
                username: "jane".into(),
                password_hash: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn profile_update_round_trips_links() {
        let store = store().await;
        let jane = user(&store, "jane").await;

        let updated = store
            .update_profile(
                jane.id,
                ProfileUpdate {
                    name: "Jane Doe".into(),
                    image: None,
                    bio: Some("Writes things".into()),
                    social_links: SocialLinks {
                        github: Some("https://github.com/jane".into()),
                        ..Default::default()
                    },
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Jane Doe");
        assert_eq!(updated.bio.as_deref(), Some("Writes things"));
        assert_eq!(
            updated.social_links.github.as_deref(),
            Some("https://github.com/jane")
        );
        assert_eq!(updated.social_links.twitter, None);
    }
}
