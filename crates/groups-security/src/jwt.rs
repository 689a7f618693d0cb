//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use groups_core::{Actor, Permission};

const TOKEN_TYPE_ACCESS: &str = "access";

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
    #[error("Malformed claims: {0}")]
    MalformedClaims(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub tenant_id: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

impl Claims {
    /// Unknown permission names are ignored.
    pub fn into_actor(self) -> Result<Actor, JwtError> {
        if self.token_type != TOKEN_TYPE_ACCESS {
            return Err(JwtError::MalformedClaims(format!(
                "unexpected token type {}",
                self.token_type
            )));
        }
        let id = Uuid::parse_str(&self.sub)
            .map_err(|e| JwtError::MalformedClaims(format!("sub: {}", e)))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| JwtError::MalformedClaims(format!("tenant_id: {}", e)))?;
        let permissions = self
            .permissions
            .iter()
            .filter_map(|p| Permission::from_str(p))
            .collect();

        Ok(Actor::new(id, tenant_id, permissions))
    }
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry: access_expiry,
        }
    }

    pub fn generate_access_token(&self, actor: &Actor) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: actor.id.to_string(),
            tenant_id: actor.tenant_id.to_string(),
            permissions: actor.permissions.iter().map(|p| p.as_str().to_string()).collect(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            token_type: TOKEN_TYPE_ACCESS.to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::ValidationError(e.to_string()),
            })
    }

    /// Validate a bearer token and resolve the actor it names.
    pub fn authenticate(&self, token: &str) -> Result<Actor, JwtError> {
        let actor = self.validate_token(token)?.into_actor()?;
        debug!(actor_id = %actor.id, tenant_id = %actor.tenant_id, "Token authenticated");
        Ok(actor)
    }
}
