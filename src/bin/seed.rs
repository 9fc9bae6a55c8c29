//! Creates the bootstrap Admin account. Registering users requires an Admin
//! token, so a fresh database needs one before the API is usable.

use anyhow::Context;
use clinic_api::{
    auth::password::hash_password_sync,
    db::{create_pool, run_migrations},
    models::Role,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let email = std::env::var("SEED_ADMIN_EMAIL").context("SEED_ADMIN_EMAIL is not set")?;
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD is not set")?;
    if password.chars().count() < 6 {
        anyhow::bail!("SEED_ADMIN_PASSWORD must be at least 6 characters");
    }

    let pool = create_pool(&database_url, 1).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, &email, &password, Role::Admin).await?;
    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

/// Insert the account, or reset the password and role of an existing one.
async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<i32> {
    let password_hash = hash_password_sync(password)?;

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, password, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE SET password = EXCLUDED.password, role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(id)
}
