use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

/// A normalized, non-empty artist name as read from the input list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtistName(String);

impl ArtistName {
    /// Trims and title-cases a raw line. Blank lines yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(utils::title_case(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the directory the artist's downloads land in.
    pub fn dir_name(&self) -> String {
        utils::sanitize_dir_name(&self.0)
    }
}

impl fmt::Display for ArtistName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque catalog identifier of an artist, valid for one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistId(pub String);

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A downloadable release. `url` is what the downloader receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumReference {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistStatus {
    /// No identifier: either no match or the search kept failing.
    Unresolved,
    /// The album listing could not be retrieved.
    AlbumsUnavailable,
    NoAlbums,
    /// The artist directory could not be created; nothing was downloaded.
    DirectoryFailed,
    Completed,
}

impl fmt::Display for ArtistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArtistStatus::Unresolved => "not found",
            ArtistStatus::AlbumsUnavailable => "albums unavailable",
            ArtistStatus::NoAlbums => "no albums",
            ArtistStatus::DirectoryFailed => "directory error",
            ArtistStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct ArtistReport {
    pub artist: ArtistName,
    pub status: ArtistStatus,
    pub directory: Option<PathBuf>,
    pub albums: usize,
    pub downloaded: usize,
    pub failed: usize,
}

impl ArtistReport {
    pub fn skipped(artist: &ArtistName, status: ArtistStatus) -> Self {
        Self {
            artist: artist.clone(),
            status,
            directory: None,
            albums: 0,
            downloaded: 0,
            failed: 0,
        }
    }

    pub fn has_failures(&self) -> bool {
        matches!(
            self.status,
            ArtistStatus::Unresolved
                | ArtistStatus::AlbumsUnavailable
                | ArtistStatus::DirectoryFailed
        ) || self.failed > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub artists: Vec<ArtistReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.artists.iter().any(ArtistReport::has_failures)
    }

    pub fn table_rows(&self) -> Vec<ArtistTableRow> {
        self.artists
            .iter()
            .map(|r| ArtistTableRow {
                artist: r.artist.to_string(),
                status: r.status.to_string(),
                albums: r.albums,
                downloaded: r.downloaded,
                failed: r.failed,
            })
            .collect()
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub artist: String,
    pub status: String,
    pub albums: usize,
    pub downloaded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArtistsResponse {
    pub artists: ArtistsContainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistsContainer {
    pub items: Vec<Artist>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumResponse {
    pub items: Vec<Album>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub album_type: String,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

impl From<Album> for AlbumReference {
    fn from(album: Album) -> Self {
        AlbumReference {
            name: album.name,
            url: album.external_urls.spotify,
        }
    }
}
