//! Authentication utilities

use anyhow::Result;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::ApiError;

const PBKDF2_ITERATIONS: u32 = 100_000;
const HASH_LENGTH: usize = 32;

/// JWT claims; the subject is the user's email
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// hash a password using pbkdf2-sha256 with the server id as salt
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut hash,
    );
    hex::encode(hash)
}

/// verify a password against a hash using constant-time comparison
pub fn verify_password(password: &str, salt: &str, hash: &str) -> bool {
    let computed = hash_password(password, salt);
    computed.as_bytes().ct_eq(hash.as_bytes()).into()
}

/// create a jwt for the given subject email with a ttl in seconds
pub fn create_jwt(email: &str, secret: &str, expires_in: u64) -> Result<String> {
    let expiration = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() + expires_in;

    let claims = Claims {
        sub: email.to_string(),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// verify a jwt, returning its claims
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Extract the credential token from an Authorization header value
///
/// The header must carry exactly a scheme token and a credential token
/// separated by whitespace; anything else fails cleanly instead of being
/// indexed blindly.
pub fn parse_bearer(header: Option<&str>) -> Result<String, ApiError> {
    let header = header.ok_or(ApiError::MissingAuth)?;

    let mut parts = header.split_whitespace();
    let scheme = parts.next();
    let token = parts.next();

    match (scheme, token, parts.next()) {
        (Some(_), Some(token), None) => Ok(token.to_string()),
        _ => Err(ApiError::InvalidToken),
    }
}

/// Resolve a raw Authorization header into the authenticated subject email
///
/// Pure verification: no user lookup happens here, the caller converts an
/// unknown subject into its own not-found error.
pub fn resolve_identity(header: Option<&str>, secret: &str) -> Result<String, ApiError> {
    let token = parse_bearer(header)?;
    let claims = verify_jwt(&token, secret).map_err(|_| ApiError::InvalidToken)?;
    Ok(claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let token = create_jwt("a@x.com", "secret", 3600).unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();
        assert_eq!(claims.sub, "a@x.com");
    }

    #[test]
    fn test_jwt_rejects_wrong_secret() {
        let token = create_jwt("a@x.com", "secret", 3600).unwrap();
        assert!(verify_jwt(&token, "other").is_err());
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(parse_bearer(Some("Token xyz")).unwrap(), "xyz");

        assert!(matches!(parse_bearer(None), Err(ApiError::MissingAuth)));
        assert!(matches!(
            parse_bearer(Some("abc")),
            Err(ApiError::InvalidToken)
        ));
        assert!(matches!(
            parse_bearer(Some("Bearer a b")),
            Err(ApiError::InvalidToken)
        ));
        assert!(matches!(parse_bearer(Some("")), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_resolve_identity() {
        let token = create_jwt("b@x.com", "secret", 3600).unwrap();
        let header = format!("Bearer {}", token);

        let subject = resolve_identity(Some(&header), "secret").unwrap();
        assert_eq!(subject, "b@x.com");

        assert!(matches!(
            resolve_identity(Some("Bearer garbage"), "secret"),
            Err(ApiError::InvalidToken)
        ));
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("hunter2", "salt");
        assert!(verify_password("hunter2", "salt", &hash));
        assert!(!verify_password("hunter3", "salt", &hash));
        assert!(!verify_password("hunter2", "other-salt", &hash));
    }
}
