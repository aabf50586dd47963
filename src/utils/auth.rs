use axum_extra::extract::CookieJar;
use chrono::Utc;
use color_eyre::eyre::{eyre, Context, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthAPIError, WorkerId};

use super::constants::JWT_COOKIE_NAME;

// How long an issued JWT auth token stays valid
pub const TOKEN_TTL_SECONDS: i64 = 3600;

// Tokens are issued by the account service; this is the same encoding so
// tooling and tests can mint them.
#[tracing::instrument(name = "Generating auth token", skip_all)]
pub fn generate_auth_token(
    worker_id: &WorkerId,
    jwt_secret: &Secret<String>,
) -> Result<Secret<String>> {
    let delta = chrono::Duration::try_seconds(TOKEN_TTL_SECONDS)
        .ok_or(eyre!("failed to create token time delta"))?;

    let exp = Utc::now()
        .checked_add_signed(delta)
        .ok_or(eyre!("failed to add to current time"))?
        .timestamp();

    let exp: usize = exp.try_into().wrap_err(format!(
        "failed to cast exp time to usize. exp time: {}",
        exp
    ))?;

    let claims = Claims {
        sub: worker_id.to_string(),
        exp,
    };

    create_token(&claims, jwt_secret)
}

// Check if JWT auth token is valid by decoding it using the JWT secret
#[tracing::instrument(name = "Validating auth token", skip_all)]
pub fn validate_token(
    token: &Secret<String>,
    jwt_secret: &Secret<String>,
) -> Result<Claims> {
    decode::<Claims>(
        token.expose_secret(),
        &DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .wrap_err("failed to decode token")
}

/// Reads and validates the token carried in the `jwt` cookie.
#[tracing::instrument(name = "Getting claims from auth cookie", skip_all)]
pub fn get_claims(
    jar: &CookieJar,
    jwt_secret: &Secret<String>,
) -> Result<Claims, AuthAPIError> {
    let cookie = jar.get(JWT_COOKIE_NAME).ok_or(AuthAPIError::MissingToken)?;
    let token = Secret::new(cookie.value().to_owned());

    validate_token(&token, jwt_secret).map_err(|e| {
        tracing::debug!("rejected auth token: {e:#}");
        AuthAPIError::InvalidToken
    })
}

#[tracing::instrument(name = "Creating auth token", skip_all)]
fn create_token(
    claims: &Claims,
    jwt_secret: &Secret<String>,
) -> Result<Secret<String>> {
    let token_string = encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
    )
    .wrap_err("failed to create token")?;

    Ok(Secret::new(token_string))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}
