// src/api/drive/auth.rs
//! Service-account authentication: a signed JWT assertion is exchanged for
//! a short-lived bearer token, which is cached until shortly before expiry.

use super::types::ServiceAccountKey;
use crate::api::client::HttpExecutor;
use crate::api::parser;
use crate::config::ApiConfig;
use crate::constants::{DRIVE_TIMEOUT_MS, DRIVE_TOKEN_REFRESH_MARGIN_SECS};
use crate::error::{AppError, Service};
use crate::error_recovery::RetryPolicy;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use indexmap::IndexMap;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(DRIVE_TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    executor: HttpExecutor,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn from_key_file(
        path: &Path,
        scopes: &[String],
        retry: RetryPolicy,
    ) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| AppError::file_system(path, e))?;
        let key: ServiceAccountKey = serde_json::from_str(&raw).map_err(|e| {
            AppError::Authentication(format!(
                "Invalid service account key file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::new(key, scopes, retry)
    }

    pub fn new(key: ServiceAccountKey, scopes: &[String], retry: RetryPolicy) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            AppError::Authentication(format!(
                "Invalid private key for {}: {}",
                key.client_email, e
            ))
        })?;
        let api = ApiConfig::new(
            &key.token_uri,
            IndexMap::new(),
            retry,
            Duration::from_millis(DRIVE_TIMEOUT_MS),
        )?;
        Ok(Self {
            encoding_key,
            scope: scopes.join(" "),
            executor: HttpExecutor::new(Service::GoogleDrive, api)?,
            cached: Mutex::new(None),
            key,
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// A bearer token valid for at least the refresh margin.
    pub async fn access_token(&self) -> Result<String, AppError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.access_token.clone());
        }

        log::debug!("Requesting Drive access token for {}", self.key.client_email);
        let response = self.exchange(now).await?;
        let token = CachedToken {
            access_token: response.access_token,
            expires_at: now + ChronoDuration::seconds(response.expires_in),
        };
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, AppError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::Authentication(format!("Failed to sign JWT assertion: {}", e)))
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<TokenResponse, AppError> {
        let assertion = self.assertion(now)?;
        let form = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];
        let token_uri = self.key.token_uri.as_str();

        let response = self
            .executor
            .send("Google Drive token exchange", |client| {
                client.post(token_uri).form(&form)
            })
            .await
            .map_err(|e| match e {
                AppError::HttpStatus { status, body, .. } => AppError::Authentication(format!(
                    "Token exchange rejected with HTTP {}: {}",
                    status, body
                )),
                other => other,
            })?;

        let value = parser::parse_json_body(Service::GoogleDrive, &response)?;
        parser::decode(Service::GoogleDrive, value)
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("client_email", &self.key.client_email)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_token_expires_early() {
        let now = Utc::now();
        let token = CachedToken {
            access_token: "t".into(),
            expires_at: now + ChronoDuration::seconds(DRIVE_TOKEN_REFRESH_MARGIN_SECS + 30),
        };
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + ChronoDuration::seconds(31)));
    }

    #[test]
    fn malformed_private_key_is_an_authentication_error() {
        let key = ServiceAccountKey {
            client_email: "robot@example.iam.gserviceaccount.com".into(),
            private_key: "not a pem".into(),
            private_key_id: None,
            token_uri: "https://oauth2.googleapis.com/token".into(),
        };
        let err = TokenProvider::new(key, &[], RetryPolicy::once()).unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }
}
