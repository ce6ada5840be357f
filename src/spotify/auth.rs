use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{catalog::CatalogError, config::Credentials, spotify::check_status, types::Token};

/// Seconds before expiry at which a token is considered stale.
const EXPIRY_BUFFER_SECS: u64 = 240;

/// Client-credentials access token, fetched lazily and kept in memory for
/// the duration of the run.
pub struct TokenManager {
    credentials: Credentials,
    token_url: String,
    token: Mutex<Option<Token>>,
}

impl TokenManager {
    pub fn new(credentials: Credentials, token_url: String) -> Self {
        TokenManager {
            credentials,
            token_url,
            token: Mutex::new(None),
        }
    }

    /// Returns a usable access token, requesting a new one when none is
    /// cached or the cached one is about to expire.
    pub async fn get_valid_token(&self, client: &Client) -> Result<String, CatalogError> {
        let mut lock = self.token.lock().await;

        if let Some(token) = lock.as_ref() {
            if !is_expired(token, Utc::now().timestamp() as u64) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token(client).await?;
        let access_token = token.access_token.clone();
        *lock = Some(token);
        Ok(access_token)
    }

    async fn request_token(&self, client: &Client) -> Result<Token, CatalogError> {
        let response = client
            .post(&self.token_url)
            .header("Authorization", basic_auth_header(&self.credentials))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let response = match check_status(response) {
            Ok(r) => r,
            Err(CatalogError::Status { status, .. }) if status == 400 || status == 401 => {
                return Err(CatalogError::Auth(format!(
                    "token endpoint rejected the client credentials (HTTP {status})"
                )));
            }
            Err(e) => return Err(e),
        };

        let mut token = response.json::<Token>().await?;
        token.obtained_at = Utc::now().timestamp() as u64;
        Ok(token)
    }
}

pub fn basic_auth_header(credentials: &Credentials) -> String {
    let raw = format!("{}:{}", credentials.client_id, credentials.client_secret);
    format!("Basic {}", STANDARD.encode(raw))
}

pub fn is_expired(token: &Token, now: u64) -> bool {
    now >= (token.obtained_at + token.expires_in).saturating_sub(EXPIRY_BUFFER_SECS)
}
