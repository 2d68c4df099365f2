use lazy_static::lazy_static;
use sqlx::PgPool;

use crate::models::user::{FullName, User, UserData};

lazy_static! {
    /// Checked against when the email is unknown, so both login failures
    /// cost one bcrypt verification.
    static ref DUMMY_HASH: String =
        bcrypt::hash("kotiki-dummy-password", bcrypt::DEFAULT_COST).unwrap_or_default();
}

pub struct UserService;

impl UserService {
    pub async fn email_exists(pool: &PgPool, email: &str) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    pub async fn exists(pool: &PgPool, id: i32) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    /// Hash the password and insert the user. Returns the new row.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password: &str,
        name: &FullName,
        bcrypt_cost: u32,
    ) -> anyhow::Result<User> {
        let hash = bcrypt::hash(password, bcrypt_cost)?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password, name, surname, third_name)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, email, password, name, surname, third_name",
        )
        .bind(email)
        .bind(hash)
        .bind(&name.name)
        .bind(&name.surname)
        .bind(&name.third_name)
        .fetch_one(pool)
        .await?;
        Ok(user)
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password, name, surname, third_name FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn get_data(pool: &PgPool, id: i32) -> anyhow::Result<Option<UserData>> {
        let user = sqlx::query_as::<_, UserData>(
            "SELECT id, email, name, surname, third_name FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    /// Look the user up by email and check the password.
    /// Returns `None` for an unknown email or a wrong password alike.
    pub async fn check_credentials(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = Self::get_by_email(pool, email).await?;
        let valid = verify_password(password, user.as_ref().map(|u| u.password.as_str()));
        Ok(user.filter(|_| valid))
    }
}

/// Check `password` against `hash`. Without a hash the dummy one is verified
/// anyway and the result is always `false`.
fn verify_password(password: &str, hash: Option<&str>) -> bool {
    match hash {
        // A corrupt hash is treated as a mismatch rather than a server error.
        Some(hash) => bcrypt::verify(password, hash).unwrap_or(false),
        None => {
            let _ = bcrypt::verify(password, &DUMMY_HASH);
            false
        }
    }
}

/// Signup input checks that don't need the database.
pub fn validate_signup(email: &str, password: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("invalid email");
    }
    if password.chars().count() < 8 {
        return Err("password must be at least 8 characters");
    }
    Ok(())
}
