//! Configuration management for the artist downloader.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the local data directory (`<data_local_dir>/artistdl/.env`)
//! 3. `.env` in the current working directory
//! 4. Application defaults (where applicable)

use std::{env, fmt, path::PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_DOWNLOADER: &str = "spotdl";

const CLIENT_ID_VARS: [&str; 2] = ["SPOTIFY_API_AUTH_CLIENT_ID", "CLIENT_ID"];
const CLIENT_SECRET_VARS: [&str; 2] = ["SPOTIFY_API_AUTH_CLIENT_SECRET", "CLIENT_SECRET"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => write!(
                f,
                "{name} must be set (in the environment or in a .env file)"
            ),
            ConfigError::Io(e) => write!(f, "cannot prepare config directory: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Client-credentials pair used to obtain catalog access tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads both credentials, failing on the first missing or blank one.
    ///
    /// `SPOTIFY_API_AUTH_CLIENT_ID`/`SPOTIFY_API_AUTH_CLIENT_SECRET` take
    /// precedence over the shorter `CLIENT_ID`/`CLIENT_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |vars: &[&'static str]| {
            vars.iter()
                .filter_map(|v| lookup(*v))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        let client_id =
            first_set(&CLIENT_ID_VARS[..]).ok_or(ConfigError::MissingVar(CLIENT_ID_VARS[0]))?;
        let client_secret = first_set(&CLIENT_SECRET_VARS[..])
            .ok_or(ConfigError::MissingVar(CLIENT_SECRET_VARS[0]))?;

        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

/// Loads environment variables from `.env` files.
///
/// Creates the local data directory if needed so users know where to put
/// their `.env`. A missing `.env` is fine: the credentials may come from
/// the real environment.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Io(e.to_string()))?;
    }

    // dotenv never overrides variables that are already set
    let _ = dotenv::from_path(&path);
    let _ = dotenv::dotenv();
    Ok(())
}

pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("artistdl/.env");
    path
}

/// Returns the Spotify Web API base URL.
///
/// `SPOTIFY_API_URL` overrides the public endpoint, mostly useful for tests
/// and proxies.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns the Spotify OAuth token URL (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn prefers_prefixed_variables() {
        let creds = Credentials::from_lookup(lookup(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "new-id"),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "new-secret"),
            ("CLIENT_ID", "old-id"),
            ("CLIENT_SECRET", "old-secret"),
        ]))
        .unwrap();
        assert_eq!(creds.client_id, "new-id");
        assert_eq!(creds.client_secret, "new-secret");
    }

    #[test]
    fn falls_back_to_short_names() {
        let creds = Credentials::from_lookup(lookup(&[
            ("CLIENT_ID", "old-id"),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "  "),
            ("CLIENT_SECRET", "old-secret"),
        ]))
        .unwrap();
        assert_eq!(creds.client_id, "old-id");
        assert_eq!(creds.client_secret, "old-secret");
    }

    #[test]
    fn missing_credentials_name_the_variable() {
        let err = Credentials::from_lookup(lookup(&[("CLIENT_ID", "id")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVar("SPOTIFY_API_AUTH_CLIENT_SECRET")
        );
        assert!(err.to_string().contains("SPOTIFY_API_AUTH_CLIENT_SECRET"));
    }

    #[test]
    fn debug_output_hides_secret() {
        let creds = Credentials {
            client_id: "id".to_string(),
            client_secret: "hunter2".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
