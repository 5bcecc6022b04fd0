use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Level name the auth server assigns to administrators.
pub const ADMIN_LEVEL: &str = "Admin";

/// JWT Claims structure, as issued by the auth server.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Username
    pub uid: i32,           // User ID
    pub level_name: String, // "Admin", "User", ...
    pub exp: usize,         // Expiration timestamp
}

/// Sign a new JWT token for a user.
///
/// Tokens are normally issued by the auth server; this exists for tests and local tooling.
pub fn sign(user_id: i32, username: &str, level_name: &str, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(7))
        .context("token expiry out of range")?
        .timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        uid: user_id,
        level_name: level_name.to_owned(),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
