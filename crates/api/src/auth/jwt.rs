use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::permissions::{Permissions, Role};
use crate::auth::AuthConfig;
use crate::error::AppError;

/// Typed session claims, validated once at the boundary by the JWT
/// middleware and passed through the call graph from there. The role is
/// captured at sign-in and only refreshed at the next sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (access record ID)
    pub email: String,
    pub role: Role,
    pub iat: i64, // Issued at
    pub exp: i64, // Expiration
}

impl Claims {
    pub fn new(access_id: Uuid, email: String, role: Role, expiration_minutes: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(expiration_minutes as i64);

        Self {
            sub: access_id.to_string(),
            email,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    pub fn permissions(&self) -> Permissions {
        Permissions::for_role(self.role)
    }

    /// The single authorization call site: every handler gates through
    /// this instead of re-deriving the role ad hoc.
    pub fn require(&self, check: impl Fn(&Permissions) -> bool) -> Result<(), AppError> {
        let permissions = self.permissions();
        if check(&permissions) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Insufficient permissions for role '{}'",
                self.role
            )))
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    pub fn access_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| AppError::Unauthorized(format!("Invalid subject in token: {e}")))
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_minutes: u64,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiration_minutes: config.jwt_expiration_minutes,
        }
    }

    pub fn create_token(
        &self,
        access_id: Uuid,
        email: String,
        role: Role,
    ) -> Result<String, AppError> {
        let claims = Claims::new(access_id, email, role, self.expiration_minutes);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        let config = AuthConfig {
            jwt_secret: "test-secret".into(),
            jwt_expiration_minutes: 30,
            google_client_id: String::new(),
            google_client_secret: String::new(),
            redirect_base_url: String::new(),
        };
        JwtService::new(&config)
    }

    #[test]
    fn round_trips_typed_claims() {
        let svc = service();
        let id = Uuid::new_v4();
        let token = svc
            .create_token(id, "captain@club.org".into(), Role::Editor)
            .unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.access_id().unwrap(), id);
        assert_eq!(claims.email, "captain@club.org");
        assert_eq!(claims.role, Role::Editor);
    }

    #[test]
    fn rejects_garbage_tokens() {
        assert!(service().verify_token("not-a-token").is_err());
    }

    #[test]
    fn editor_claims_cannot_delete() {
        let svc = service();
        let token = svc
            .create_token(Uuid::new_v4(), "e@club.org".into(), Role::Editor)
            .unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert!(claims.require(|p| p.can_edit).is_ok());
        assert!(matches!(
            claims.require(|p| p.can_delete),
            Err(AppError::Forbidden(_))
        ));
    }
}
