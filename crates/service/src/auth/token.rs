//! Session token signing and verification.
//!
//! Stateless HS256 JWT carrying the minimal claim set; validity is decided
//! entirely by signature and expiry. The same secret is shared by the
//! credential service (signing) and the access guard (verification).

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::User;
use super::errors::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id.
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub exp: usize,
}

pub fn sign(user: &User, secret: &str, ttl_hours: i64) -> Result<String, AuthError> {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = TokenClaims {
        sub: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        exp,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::Token(e.to_string()))
}

/// Any decode failure (bad signature, expired, malformed) collapses into
/// `Unauthorized`; the caller does not need to distinguish.
pub fn verify(token: &str, secret: &str) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<TokenClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::{UserRole, UserStatus};
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$stub".into(),
            status: UserStatus::Active,
            role: UserRole::User,
            recuperation_code: None,
            verification_code: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn sign_then_verify_carries_claims() {
        let user = sample_user();
        let token = sign(&user, "secret", 1).unwrap();
        let claims = verify(&token, "secret").unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.name, "Ada");
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let token = sign(&sample_user(), "secret", 1).unwrap();
        assert!(matches!(verify(&token, "other"), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let token = sign(&sample_user(), "secret", -1).unwrap();
        assert!(matches!(verify(&token, "secret"), Err(AuthError::Unauthorized)));
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        assert!(matches!(verify("not.a.jwt", "secret"), Err(AuthError::Unauthorized)));
    }
}
