//! Catalog abstraction and the retrying resolver built on it.
//!
//! [`Catalog`] is a single-attempt view of the music service: one search,
//! one album listing, no retries. [`Resolver`] wraps each call in the
//! backoff primitive and collapses terminal failures into absent values,
//! which is all the orchestrator needs to decide whether to skip an artist.

use std::fmt;

use crate::{
    retry::{RetryPolicy, with_backoff},
    types::{AlbumReference, ArtistId, ArtistName},
    utils::ReleaseKinds,
    warning,
};

/// Maximum number of releases requested per artist. Only the first page is
/// fetched.
pub const ALBUM_PAGE_SIZE: u32 = 50;

#[derive(Debug)]
pub enum CatalogError {
    /// The request did not complete in time.
    Timeout(String),
    /// HTTP 429; `retry_after` is the server's hint in seconds.
    RateLimited { retry_after: Option<u64> },
    /// Any other non-success HTTP status.
    Status { status: u16, url: String },
    /// Transport or decoding failure.
    Http(reqwest::Error),
    /// The access token could not be obtained.
    Auth(String),
}

impl CatalogError {
    /// Timeouts and rate limits resolve themselves after waiting.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CatalogError::Timeout(_) | CatalogError::RateLimited { .. }
        )
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Timeout(e) => write!(f, "read timeout: {e}"),
            CatalogError::RateLimited {
                retry_after: Some(secs),
            } => write!(f, "rate limited (server asks to retry after {secs}s)"),
            CatalogError::RateLimited { retry_after: None } => write!(f, "rate limited"),
            CatalogError::Status { status, url } => write!(f, "HTTP {status} from {url}"),
            CatalogError::Http(e) => write!(f, "request failed: {e}"),
            CatalogError::Auth(e) => write!(f, "authentication failed: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout(err.to_string())
        } else {
            CatalogError::Http(err)
        }
    }
}

/// Single-attempt catalog operations.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// First artist matching `name`, if any. Matching is left to the service.
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistId>, CatalogError>;

    /// Releases of the given kinds, in service order, at most `limit` of them.
    async fn artist_albums(
        &self,
        id: &ArtistId,
        kinds: &ReleaseKinds,
        limit: u32,
    ) -> Result<Vec<AlbumReference>, CatalogError>;
}

pub struct Resolver<C> {
    catalog: C,
    policy: RetryPolicy,
    release_kinds: ReleaseKinds,
}

impl<C: Catalog> Resolver<C> {
    pub fn new(catalog: C, policy: RetryPolicy, release_kinds: ReleaseKinds) -> Self {
        Self {
            catalog,
            policy,
            release_kinds,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Resolves an artist name to its identifier.
    ///
    /// Absent when the search has no match or when it keeps failing.
    pub async fn resolve_artist(&self, name: &ArtistName) -> Option<ArtistId> {
        let catalog = &self.catalog;
        let query = name.as_str();
        let label = format!("search {name}");

        match with_backoff(&self.policy, &label, CatalogError::is_transient, move || {
            catalog.search_artist(query)
        })
        .await
        {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                warning!("No artist found matching {name}.");
                None
            }
            Err(_) => None,
        }
    }

    /// Lists the artist's album references, first page only.
    ///
    /// `None` means the listing could not be retrieved; an artist with no
    /// qualifying releases yields `Some(vec![])`.
    pub async fn list_albums(&self, id: &ArtistId) -> Option<Vec<AlbumReference>> {
        let catalog = &self.catalog;
        let kinds = &self.release_kinds;
        let label = format!("get albums for {id}");

        with_backoff(&self.policy, &label, CatalogError::is_transient, move || {
            catalog.artist_albums(id, kinds, ALBUM_PAGE_SIZE)
        })
        .await
        .ok()
    }
}
