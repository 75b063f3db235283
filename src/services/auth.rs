//! Authentication service: password hashing, JWT, registration, login and token revocation.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::user::{MemberResponse, MemberStatus, RegisterUser, User, UserRole};

/// Maximum failed login attempts before account lockout.
const MAX_FAILED_ATTEMPTS: i32 = 3;

/// Lockout duration in minutes after exceeding max failed attempts.
const LOCKOUT_DURATION_MINUTES: i64 = 30;

/// Redis key prefix for revoked access and refresh tokens.
const REVOKED_PREFIX: &str = "gymdesk:revoked:";

/// JWT claims embedded in access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub role: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token pair returned on successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login/registration response: tokens plus the profile the client keeps in its session.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: MemberResponse,
}

/// Token lifetimes and signing secret, pulled from config by the route layer.
#[derive(Debug, Clone, Copy)]
pub struct TokenSettings<'a> {
    pub secret: &'a str,
    pub access_expiry_secs: i64,
    pub refresh_expiry_secs: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a JWT token pair (access + refresh).
pub fn generate_tokens(user: &User, settings: TokenSettings<'_>) -> Result<TokenPair, AppError> {
    let now = Utc::now();
    let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());

    let access_claims = Claims {
        sub: user.email.clone(),
        user_id: user.id.to_string(),
        role: user.role.as_str().to_string(),
        token_type: "access".to_string(),
        exp: (now + Duration::seconds(settings.access_expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    let refresh_claims = Claims {
        token_type: "refresh".to_string(),
        exp: (now + Duration::seconds(settings.refresh_expiry_secs)).timestamp(),
        ..access_claims.clone()
    };

    let access_token = jsonwebtoken::encode(&Header::default(), &access_claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    let refresh_token = jsonwebtoken::encode(&Header::default(), &refresh_claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    Ok(TokenPair {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: settings.access_expiry_secs,
    })
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Stable, non-reversible key for a token in the revocation list.
pub fn revocation_key(token: &str) -> String {
    format!("{REVOKED_PREFIX}{}", hex::encode(Sha256::digest(token.as_bytes())))
}

/// Register a new account. Only an administrator may create another administrator.
pub async fn register(
    pool: &PgPool,
    input: &RegisterUser,
    requested_by: Option<UserRole>,
) -> Result<User, AppError> {
    input.validate()?;

    let role = input.role.unwrap_or(UserRole::Member);
    if role == UserRole::Administrator && requested_by != Some(UserRole::Administrator) {
        return Err(AppError::Forbidden(
            "Only administrators can register administrators".to_string(),
        ));
    }

    let password_hash = hash_password(&input.password)?;
    let emergency_contact = input
        .emergency_contact
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| AppError::Internal(format!("Emergency contact encoding failed: {e}")))?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, role, phone, membership_type,
            address, emergency_contact, status)
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'Basic'::membership_type), $7, $8, 'Active')
        RETURNING *
        "#,
    )
    .bind(input.name.trim())
    .bind(input.email.trim().to_lowercase())
    .bind(&password_hash)
    .bind(role)
    .bind(&input.phone)
    .bind(input.membership_type)
    .bind(&input.address)
    .bind(&emergency_contact)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Email already exists"))?;

    tracing::info!(user_id = %user.id, role = role.as_str(), "Registered account");
    Ok(user)
}

/// Whether a failed-attempt count is enough to lock the account.
fn lockout_reached(attempts: i32) -> bool {
    attempts >= MAX_FAILED_ATTEMPTS
}

/// Authenticate by email and password, returning a token pair.
///
/// `login_type`, when given, must match the account's role.
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
    login_type: Option<UserRole>,
    settings: TokenSettings<'_>,
) -> Result<(User, TokenPair), AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Unauthorized);
        }
    }

    if !verify_password(password, &user.password_hash)? {
        let attempts: i32 = sqlx::query_scalar(
            "UPDATE users SET failed_login_attempts = failed_login_attempts + 1
             WHERE id = $1 RETURNING failed_login_attempts",
        )
        .bind(user.id)
        .fetch_one(pool)
        .await?;

        if lockout_reached(attempts) {
            let lock_until = Utc::now() + Duration::minutes(LOCKOUT_DURATION_MINUTES);
            sqlx::query("UPDATE users SET locked_until = $1 WHERE id = $2")
                .bind(lock_until)
                .bind(user.id)
                .execute(pool)
                .await?;
            tracing::warn!(
                user_id = %user.id,
                attempts,
                "Account locked after repeated failed logins"
            );
        }
        return Err(AppError::Unauthorized);
    }

    if let Some(expected) = login_type {
        if expected != user.role {
            return Err(AppError::Forbidden(format!(
                "This account is not registered as {}",
                expected.as_str()
            )));
        }
    }

    if user.status != MemberStatus::Active {
        return Err(AppError::Forbidden(format!(
            "Account is {:?}, contact the front desk",
            user.status
        )));
    }

    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET failed_login_attempts = 0, locked_until = NULL, last_login = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(user.id)
    .fetch_one(pool)
    .await?;

    let tokens = generate_tokens(&user, settings)?;
    Ok((user, tokens))
}

/// Refresh an access token using a valid refresh token.
///
/// With a blocklist configured, a refresh token revoked by logout is refused.
pub async fn refresh_token(
    pool: &PgPool,
    redis: Option<&redis::Client>,
    refresh_token_str: &str,
    settings: TokenSettings<'_>,
) -> Result<TokenPair, AppError> {
    let claims = validate_token(refresh_token_str, settings.secret)?;

    if claims.token_type != "refresh" {
        return Err(AppError::Unauthorized);
    }

    if let Some(redis) = redis {
        if is_revoked(redis, refresh_token_str).await? {
            return Err(AppError::Unauthorized);
        }
    }

    let user_id: Uuid = claims
        .user_id
        .parse()
        .map_err(|_| AppError::Unauthorized)?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND status = 'Active'")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::Unauthorized)?;

    generate_tokens(&user, settings)
}

/// Claims of a refresh token handed in at logout. It must belong to the signed-in user.
pub fn logout_refresh_claims(
    token: &str,
    user_id: Uuid,
    jwt_secret: &str,
) -> Result<Claims, AppError> {
    let claims = validate_token(token, jwt_secret)?;
    if claims.token_type != "refresh" || claims.user_id != user_id.to_string() {
        return Err(AppError::Unauthorized);
    }
    Ok(claims)
}

/// Put a token on the revocation list until it would have expired anyway.
pub async fn revoke_token(
    redis: &redis::Client,
    token: &str,
    expires_at: i64,
) -> Result<(), AppError> {
    let ttl = expires_at - Utc::now().timestamp();
    if ttl <= 0 {
        return Ok(());
    }

    let mut conn = redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection failed: {e}")))?;
    let _: () = conn
        .set_ex(revocation_key(token), 1u8, ttl as u64)
        .await
        .map_err(|e| AppError::Internal(format!("Token revocation failed: {e}")))?;
    Ok(())
}

/// Whether a token has been revoked by logout.
pub async fn is_revoked(redis: &redis::Client, token: &str) -> Result<bool, AppError> {
    let mut conn = redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection failed: {e}")))?;
    conn.exists(revocation_key(token))
        .await
        .map_err(|e| AppError::Internal(format!("Revocation lookup failed: {e}")))
}

/// Find a user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
