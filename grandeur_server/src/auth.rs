use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use chrono::Utc;
use grandeur_engine::db_types::{Role, Roles, User};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::AuthError, errors::ServerError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The user's database id.
    pub sub: i64,
    /// The user's public id.
    pub uuid: String,
    pub email: String,
    pub roles: Roles,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn user_id(&self) -> i64 {
        self.sub
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Handlers declare a `JwtClaims` parameter to receive the identity that the ACL middleware has already validated
/// and stored on the request.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned();
        ready(claims.ok_or(ServerError::AuthenticationError(AuthError::MissingToken)))
    }
}

/// Issues and verifies the HS256 access tokens handed out at registration and login.
#[derive(Clone)]
pub struct TokenIssuer {
    config: AuthConfig,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { config: config.clone() }
    }

    /// Issue a new access token for the given user. The caller is responsible for having verified the user's
    /// credentials first.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user.id,
            uuid: user.public_id.clone(),
            email: user.email.clone(),
            roles: user.roles(),
            iat: now.timestamp(),
            exp: (now + self.config.token_lifetime).timestamp(),
        };
        let header = Header::new(Algorithm::HS256);
        encode(&header, &claims, &EncodingKey::from_secret(self.config.jwt_secret.reveal().as_bytes()))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    pub fn check_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<JwtClaims>(token, &DecodingKey::from_secret(self.config.jwt_secret.reveal().as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

/// Pulls the bearer token out of the Authorization header.
pub fn extract_bearer_token(headers: &actix_web::http::header::HeaderMap) -> Result<String, AuthError> {
    let header = headers.get("Authorization").ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|_| AuthError::MissingToken)?;
    let token = value.strip_prefix("Bearer ").ok_or(AuthError::MissingToken)?.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token.to_string())
}
