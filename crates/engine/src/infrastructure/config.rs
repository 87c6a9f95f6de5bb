//! Engine configuration read from the environment.
//!
//! Secrets are optional at startup. A missing generation key or sheet secret is
//! reported per request with a fixed message so the service still boots and
//! answers health checks.

use std::net::SocketAddr;

use super::gemini::DEFAULT_GEMINI_BASE_URL;

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// `API_KEY`
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub sheets: Option<SheetsConfig>,
    pub cors_allowed_origins: Option<String>,
}

/// The three spreadsheet secrets plus the target tab.
#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub service_account_email: String,
    pub private_key: String,
    pub sheet_name: String,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("service_account_email", &self.service_account_email)
            .field("private_key", &"<redacted>")
            .field("sheet_name", &self.sheet_name)
            .finish()
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let server_port = get("SERVER_PORT")
            .or_else(|| get("PORT"))
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);

        Self {
            server_host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port,
            gemini_api_key: get("API_KEY"),
            gemini_base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            sheets: SheetsConfig::from_lookup(&get),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server_host, self.server_port).parse()
    }
}

impl SheetsConfig {
    /// `None` unless all three secrets are present.
    fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Option<Self> {
        Some(Self {
            spreadsheet_id: get("GOOGLE_SHEET_ID")?,
            service_account_email: get("GOOGLE_SERVICE_ACCOUNT_EMAIL")?,
            private_key: normalize_private_key(&get("GOOGLE_PRIVATE_KEY")?),
            sheet_name: get("GOOGLE_SHEET_NAME").unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
        })
    }
}

/// Hosting dashboards store PEM keys on one line with literal `\n`.
fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
