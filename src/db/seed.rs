//! One-time idempotent bootstrap data: the admin account and the default
//! bookable resources. Guarded by existence checks so re-running is a no-op.

use anyhow::{Context, Result};
use tracing::info;
use uuid::Uuid;

use crate::api::auth::hash_password;
use crate::config::AuthConfig;
use crate::db::{DbPool, ResourceType};

/// Seed the database with the bootstrap admin and default resources.
pub async fn run(pool: &DbPool, auth: &AuthConfig) -> Result<()> {
    ensure_admin_user(pool, &auth.admin_username, &auth.admin_password).await?;
    ensure_default_resources(pool).await?;
    Ok(())
}

async fn ensure_admin_user(pool: &DbPool, username: &str, password: &str) -> Result<()> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    let id = Uuid::new_v4().to_string();
    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO users (id, username, password_hash, role, created_at) VALUES (?, ?, ?, 'admin', ?)")
        .bind(&id)
        .bind(username)
        .bind(&password_hash)
        .bind(&now)
        .execute(pool)
        .await
        .context("Failed to create admin user")?;

    info!("Created default admin user '{}'", username);
    Ok(())
}

/// Default bookable resources, created only when the table is empty.
const DEFAULT_RESOURCES: [(&str, ResourceType); 4] = [
    ("Athéna", ResourceType::MeetingRoom),
    ("Héra", ResourceType::MeetingRoom),
    ("Hephaïstos", ResourceType::Supercomputer),
    ("Artémis", ResourceType::Supercomputer),
];

async fn ensure_default_resources(pool: &DbPool) -> Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resources")
        .fetch_one(pool)
        .await?;

    if count.0 > 0 {
        return Ok(());
    }

    let now = chrono::Utc::now().to_rfc3339();
    for (name, kind) in DEFAULT_RESOURCES {
        sqlx::query("INSERT INTO resources (id, name, type, created_at) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(name)
            .bind(kind)
            .bind(&now)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to seed resource '{}'", name))?;
    }

    info!("Created {} default resources", DEFAULT_RESOURCES.len());
    Ok(())
}
