//! Google service-account credentials and the OAuth2 JWT-bearer token exchange.
//!
//! Credentials are read once at startup, either from the `GOOGLE_CREDENTIALS`
//! environment variable (a JSON blob, as hosting providers store it) or from a
//! local key file. Access tokens are fetched lazily and cached until shortly
//! before they expire.

use crate::error::{check_response, Error, Result};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::{info, warn};
use rocket::tokio::sync::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, Instant};
use std::{env, fs};

pub const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const CREDENTIALS_VAR: &str = "GOOGLE_CREDENTIALS";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME: i64 = 3600;
const EXPIRY_MARGIN: u64 = 60;

#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut key: ServiceAccountKey = serde_json::from_str(raw)?;

        if key.private_key.is_empty() {
            return Err(Error::Credentials("missing private_key".to_string()));
        }
        if key.client_email.is_empty() {
            return Err(Error::Credentials("missing client_email".to_string()));
        }

        // Environment variables often carry the PEM with literal "\n" sequences.
        key.private_key = key.private_key.replace("\\n", "\n");
        Ok(key)
    }
}

/// Reads the service account from `GOOGLE_CREDENTIALS`, falling back to `file`.
/// Returns `Ok(None)` when neither is present.
pub fn load_credentials(file: &Path) -> Result<Option<ServiceAccountKey>> {
    resolve_credentials(env::var(CREDENTIALS_VAR).ok(), file)
}

fn resolve_credentials(blob: Option<String>, file: &Path) -> Result<Option<ServiceAccountKey>> {
    if let Some(raw) = blob {
        info!("Using Google credentials from {CREDENTIALS_VAR}");
        return ServiceAccountKey::from_json(&raw).map(Some);
    }

    if file.exists() {
        info!("Using Google credentials from {}", file.display());
        let raw = fs::read_to_string(file)?;
        return ServiceAccountKey::from_json(&raw).map(Some);
    }

    warn!(
        "Neither {CREDENTIALS_VAR} nor {} found, Google Sheets requests will fail",
        file.display()
    );
    Ok(None)
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME as u64
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        Ok(TokenProvider {
            key,
            encoding_key,
            http,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn assertion(&self, issued_at: i64) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPE,
            aud: &self.key.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME,
        };

        Ok(jsonwebtoken::encode(&header, &claims, &self.encoding_key)?)
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let assertion = self.assertion(Utc::now().timestamp())?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let body: TokenResponse = check_response(response).await?.json().await?;

        let lifetime = body.expires_in.saturating_sub(EXPIRY_MARGIN);
        Ok(AccessToken {
            value: body.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }
}
