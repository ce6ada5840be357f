//! # Spotify Integration Module
//!
//! Thin client for the two Spotify Web API endpoints the downloader needs,
//! plus the client-credentials token flow that authorizes them.
//!
//! ## Architecture
//!
//! ```text
//! Orchestrator
//!      ↓
//! catalog::Resolver (retry, backoff)
//!      ↓
//! SpotifyClient (implements catalog::Catalog, one attempt per call)
//!     ├── auth      - client-credentials token, cached in memory
//!     ├── artists   - GET /search?type=artist
//!     └── releases  - GET /artists/{id}/albums
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Error Classification
//!
//! Every call makes exactly one request and maps the outcome onto
//! [`CatalogError`]. Request timeouts and `429 Too Many Requests` are
//! transient; the retry policy lives one layer up in the resolver.
//!
//! ## Usage
//!
//! ```rust
//! let credentials = config::Credentials::from_env()?;
//! let client = SpotifyClient::new(credentials, Duration::from_secs(30))?;
//! let id = client.search_artist("Daft Punk").await?;
//! ```

pub mod artists;
pub mod auth;
pub mod releases;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::{
    catalog::{Catalog, CatalogError},
    config::{self, Credentials},
    types::{AlbumReference, ArtistId},
    utils::ReleaseKinds,
};

use auth::TokenManager;

pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: TokenManager,
}

impl SpotifyClient {
    /// Builds a client against the endpoints configured in the environment.
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self, CatalogError> {
        Self::with_endpoints(
            credentials,
            timeout,
            config::spotify_apiurl(),
            config::spotify_apitoken_url(),
        )
    }

    pub fn with_endpoints(
        credentials: Credentials,
        timeout: Duration,
        api_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let http = Client::builder().timeout(timeout).build()?;
        let api_url = api_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            api_url,
            tokens: TokenManager::new(credentials, token_url.into()),
        })
    }
}

impl Catalog for SpotifyClient {
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistId>, CatalogError> {
        let token = self.tokens.get_valid_token(&self.http).await?;
        let artist = artists::search_artist(&self.http, &self.api_url, &token, name).await?;
        Ok(artist.map(|a| ArtistId(a.id)))
    }

    async fn artist_albums(
        &self,
        id: &ArtistId,
        kinds: &ReleaseKinds,
        limit: u32,
    ) -> Result<Vec<AlbumReference>, CatalogError> {
        let token = self.tokens.get_valid_token(&self.http).await?;
        let albums =
            releases::get_release_for_artist(&self.http, &self.api_url, &id.0, &token, limit, kinds)
                .await?;
        Ok(albums.into_iter().map(AlbumReference::from).collect())
    }
}

/// Turns non-success responses into a [`CatalogError`].
///
/// A 429 carries the `Retry-After` hint along so it can be shown to the user.
pub(crate) fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        return Err(CatalogError::RateLimited { retry_after });
    }

    Err(CatalogError::Status {
        status: status.as_u16(),
        url: response.url().to_string(),
    })
}
