use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;

/// Test fixture building configs pointed at local doubles and minting
/// tokens the auth middleware will accept.
pub struct TestConfig {
    pub jwt_secret: String,
    pub record_store_url: String,
    pub record_store_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            record_store_url: "http://localhost:54321".to_string(),
            record_store_api_key: "test-api-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_store_url(mut self, url: &str) -> Self {
        self.record_store_url = url.to_string();
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            record_store_url: self.record_store_url.clone(),
            record_store_api_key: self.record_store_api_key.clone(),
            record_store_jwt_secret: self.jwt_secret.clone(),
            google_calendar_base_url: "http://localhost:54322".to_string(),
            calendar_sync_enabled: true,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// Mint a signed HS256 token for the given role.
    pub fn mint_token(&self, user_id: &str, role: &str) -> String {
        let header = json!({"alg": "HS256", "typ": "JWT"});
        let claims = json!({
            "sub": user_id,
            "email": format!("{}@test.local", role),
            "role": role,
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });

        let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let mut mac = Hmac::<Sha256>::new_from_slice(self.jwt_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signing_input, signature)
    }
}

pub fn test_uuid() -> Uuid {
    Uuid::new_v4()
}
