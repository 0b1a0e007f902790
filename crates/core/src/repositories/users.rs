//! Lab staff accounts.
//!
//! Passwords are never stored in clear. Each account keeps `"<iterations>$<salt>$<key>"`, with
//! salt and key hex encoded, where the key is PBKDF2-HMAC-SHA256 over the password. The
//! iteration count travels with the hash so older hashes still verify after it is raised.
//!
//! Derivation runs on the blocking pool, off the async workers.

use crate::repositories::helpers::unique_error;
use crate::validation::{has_text, require_fields, required_text};
use crate::{Database, LabError, LabResult};
use api_shared::{LoginReq, SignupReq};
use lab_types::non_blank;
use serde::{Deserialize, Serialize};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

pub(crate) const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// The account returned by a successful login.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LoginUser {
    pub user_id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(sqlx::FromRow)]
struct Credentials {
    user_id: i64,
    username: String,
    full_name: Option<String>,
    role: Option<String>,
    password_hash: String,
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

/// Hashes `password` under a fresh random salt.
pub(crate) fn hash_password(password: &str) -> String {
    hash_password_with(password, PBKDF2_ITERATIONS)
}

fn hash_password_with(password: &str, iterations: u32) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    format!(
        "{iterations}${}${}",
        hex::encode(salt),
        hex::encode(derive(password, &salt, iterations))
    )
}

/// Checks `password` against a stored hash in constant time. Malformed hashes never verify.
pub(crate) fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(iterations), Some(salt_hex), Some(key_hex)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(key_hex)) else {
        return false;
    };
    if iterations == 0 || expected.len() != KEY_LEN {
        return false;
    }
    let key = derive(password, &salt, iterations);
    key[..].ct_eq(&expected[..]).into()
}

async fn hash_blocking(password: String) -> LabResult<String> {
    Ok(tokio::task::spawn_blocking(move || hash_password(&password)).await?)
}

async fn verify_blocking(password: String, stored: String) -> LabResult<bool> {
    Ok(tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await?)
}

/// Service for signup, login and profile lookup.
#[derive(Clone, Debug)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// - [`LabError::InvalidInput`] if `username` or `password` is missing
    /// - [`LabError::Conflict`] if the username is taken
    pub async fn signup(&self, req: SignupReq) -> LabResult<i64> {
        require_fields(&[
            ("username", has_text(&req.username)),
            ("password", has_text(&req.password)),
        ])?;
        let username = required_text("username", req.username)?;
        let password = required_text("password", req.password)?;
        let password_hash = hash_blocking(password.as_str().to_owned()).await?;

        let result = sqlx::query(
            "INSERT INTO users (username, full_name, password_hash, role, contact_number, question, answer) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(username.as_str())
        .bind(non_blank(req.full_name))
        .bind(password_hash)
        .bind(non_blank(req.role))
        .bind(non_blank(req.contact_number))
        .bind(non_blank(req.security_question))
        .bind(non_blank(req.security_answer))
        .execute(self.db.pool())
        .await
        .map_err(|err| unique_error(err, "Username already exists"))?;

        let user_id = result.last_insert_rowid();
        tracing::info!(user_id, "account created");
        Ok(user_id)
    }

    /// Verifies a username/password pair.
    ///
    /// Unknown usernames and wrong passwords both yield [`LabError::InvalidCredentials`].
    pub async fn login(&self, req: LoginReq) -> LabResult<LoginUser> {
        require_fields(&[
            ("username", has_text(&req.username)),
            ("password", has_text(&req.password)),
        ])?;
        let username = required_text("username", req.username)?;
        let password = required_text("password", req.password)?;

        let row = sqlx::query_as::<_, Credentials>(
            "SELECT user_id, username, full_name, role, password_hash FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(self.db.pool())
        .await?;

        let verified = match row {
            Some(creds) => {
                let ok = verify_blocking(password.as_str().to_owned(), creds.password_hash.clone())
                    .await?;
                ok.then_some(creds)
            }
            None => None,
        };

        match verified {
            Some(creds) => Ok(LoginUser {
                user_id: creds.user_id,
                username: creds.username,
                full_name: creds.full_name,
                role: creds.role,
            }),
            None => {
                tracing::warn!(username = username.as_str(), "failed login");
                Err(LabError::InvalidCredentials)
            }
        }
    }

    pub async fn get(&self, user_id: i64) -> LabResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, username, full_name, role, contact_number FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| LabError::NotFound("User not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_req(username: &str) -> SignupReq {
        SignupReq {
            username: Some(username.into()),
            full_name: Some("Lab One".into()),
            password: Some("s3cret".into()),
            role: Some("technician".into()),
            contact_number: Some("98765".into()),
            ..Default::default()
        }
    }

    fn login_req(username: &str, password: &str) -> LoginReq {
        LoginReq {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let stored = hash_password("s3cret");
        assert!(stored.starts_with(&format!("{PBKDF2_ITERATIONS}$")));
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("S3cret", &stored));
        assert_ne!(stored, hash_password("s3cret"), "salts should differ");
    }

    #[test]
    fn test_stored_iteration_count_is_honoured() {
        let stored = hash_password_with("s3cret", 1_000);
        assert!(stored.starts_with("1000$"));
        assert!(verify_password("s3cret", &stored));

        let tampered = stored.replacen("1000$", "1001$", 1);
        assert!(!verify_password("s3cret", &tampered));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("s3cret", "s3cret"));
        assert!(!verify_password("s3cret", "zz$zz"));
        assert!(!verify_password("s3cret", "1000$zz$zz"));
        assert!(!verify_password("s3cret", "0$00$00"));

        let stored = hash_password_with("s3cret", 1_000);
        let truncated = &stored[..stored.len() - 2];
        assert!(!verify_password("s3cret", truncated));
    }

    #[tokio::test]
    async fn test_signup_login_and_get() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = UserService::new(db.clone());

        let user_id = service
            .signup(signup_req("lab1"))
            .await
            .expect("signup should succeed");

        let user = service
            .login(login_req("lab1", "s3cret"))
            .await
            .expect("login should succeed");
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role.as_deref(), Some("technician"));

        let profile = service.get(user_id).await.expect("get should succeed");
        assert_eq!(profile.contact_number.as_deref(), Some("98765"));

        let stored: String = sqlx::query_scalar("SELECT password_hash FROM users")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert!(!stored.contains("s3cret"));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = UserService::new(db);
        service.signup(signup_req("lab1")).await.unwrap();

        let err = service
            .login(login_req("lab1", "wrong"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, LabError::InvalidCredentials));

        let err = service
            .login(login_req("nobody", "s3cret"))
            .await
            .expect_err("should fail");
        assert!(matches!(err, LabError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = UserService::new(db);
        service.signup(signup_req("lab1")).await.unwrap();

        let err = service
            .signup(signup_req("lab1"))
            .await
            .expect_err("should fail");
        assert_eq!(err.to_string(), "Username already exists");
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let db = Database::connect_in_memory().await.unwrap();
        let service = UserService::new(db);

        let err = service.get(404).await.expect_err("should fail");
        assert!(matches!(err, LabError::NotFound(_)));
    }
}
