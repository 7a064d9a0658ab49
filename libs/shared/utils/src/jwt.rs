use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

type HmacSha256 = Hmac<Sha256>;

/// Validate an HS256 token issued by the managed auth platform and extract
/// the signed-in user. Token issuance and refresh happen outside this
/// codebase; only verification lives here.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, String> {
    if jwt_secret.is_empty() {
        return Err("JWT secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(jwt_secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };

    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: JwtClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err("Token expired".to_string());
        }
    }

    let created_at = claims
        .iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let user = User {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        display_name: claims.name,
        created_at,
    };

    debug!("Token validated for user: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestConfig;

    #[test]
    fn minted_tokens_round_trip() {
        let config = TestConfig::default();
        let token = config.mint_token("user-123", "clinician");

        let user = validate_token(&token, &config.jwt_secret).unwrap();

        assert_eq!(user.id, "user-123");
        assert_eq!(user.role.as_deref(), Some("clinician"));
    }

    #[test]
    fn a_different_secret_rejects_the_token() {
        let config = TestConfig::default();
        let token = config.mint_token("user-123", "clinician");

        let result = validate_token(&token, "some-other-secret");

        assert!(result.is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let config = TestConfig::default();

        assert!(validate_token("not-a-jwt", &config.jwt_secret).is_err());
        assert!(validate_token("", &config.jwt_secret).is_err());
    }

    #[test]
    fn an_empty_secret_refuses_validation() {
        let config = TestConfig::default();
        let token = config.mint_token("user-123", "admin");

        assert!(validate_token(&token, "").is_err());
    }
}
