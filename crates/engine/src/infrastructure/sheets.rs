//! Google Sheets client (v4 REST API with service-account auth)
//!
//! Access tokens come from the OAuth2 JWT-bearer grant: a short-lived RS256
//! assertion signed with the service-account key is exchanged for a bearer
//! token, which is cached until shortly before it expires.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::infrastructure::config::SheetsConfig;
use crate::infrastructure::ports::{ClockPort, SheetError, SpreadsheetPort};

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime accepted by Google (one hour max).
const ASSERTION_TTL_SECS: i64 = 3600;
/// Refresh this long before the token actually expires.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

pub struct GoogleSheetsClient {
    client: Client,
    config: SheetsConfig,
    clock: Arc<dyn ClockPort>,
    token: Mutex<Option<AccessToken>>,
}

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl GoogleSheetsClient {
    pub fn new(config: SheetsConfig, clock: Arc<dyn ClockPort>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            config,
            clock,
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, SheetError> {
        let mut cached = self.token.lock().await;
        let now = self.clock.now();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - chrono::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch_token(now).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn fetch_token(&self, now: DateTime<Utc>) -> Result<AccessToken, SheetError> {
        let assertion = sign_assertion(&self.config, now)?;

        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| SheetError::Authorization(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Authorization(format!("{status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SheetError::Authorization(e.to_string()))?;

        tracing::debug!(expires_in = token.expires_in, "Obtained spreadsheet access token");

        Ok(AccessToken {
            value: token.access_token,
            expires_at: now + chrono::Duration::seconds(token.expires_in),
        })
    }
}

#[async_trait]
impl SpreadsheetPort for GoogleSheetsClient {
    async fn append_row(&self, row: Vec<String>) -> Result<(), SheetError> {
        let token = self.access_token().await?;
        let url = append_url(SHEETS_API_BASE, &self.config)?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&AppendBody { values: vec![row] })
            .send()
            .await
            .map_err(|e| SheetError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::RequestFailed(format!("{status}: {body}")));
        }

        Ok(())
    }
}

fn sign_assertion(config: &SheetsConfig, now: DateTime<Utc>) -> Result<String, SheetError> {
    let key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())
        .map_err(|e| SheetError::Authorization(format!("invalid private key: {e}")))?;

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &assertion_claims(config, now), &key)
        .map_err(|e| SheetError::Authorization(e.to_string()))
}

fn assertion_claims(config: &SheetsConfig, now: DateTime<Utc>) -> AssertionClaims {
    let iat = now.timestamp();
    AssertionClaims {
        iss: config.service_account_email.clone(),
        scope: SHEETS_SCOPE.to_string(),
        aud: GOOGLE_TOKEN_URL.to_string(),
        iat,
        exp: iat + ASSERTION_TTL_SECS,
    }
}

/// `{base}/v4/spreadsheets/{id}/values/{sheet}!A1:append?valueInputOption=USER_ENTERED`
fn append_url(base: &str, config: &SheetsConfig) -> Result<Url, SheetError> {
    let mut url = Url::parse(base).map_err(|e| SheetError::RequestFailed(e.to_string()))?;
    let range = format!("{}!A1:append", config.sheet_name);

    url.path_segments_mut()
        .map_err(|_| SheetError::RequestFailed("sheets base url cannot have a path".to_string()))?
        .pop_if_empty()
        .extend([
            "v4",
            "spreadsheets",
            config.spreadsheet_id.as_str(),
            "values",
            range.as_str(),
        ]);
    url.query_pairs_mut()
        .append_pair("valueInputOption", "USER_ENTERED");

    Ok(url)
}

#[derive(Debug, Serialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
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
    ASSERTION_TTL_SECS
}

#[derive(Debug, Serialize)]
struct AppendBody {
    values: Vec<Vec<String>>,
}
