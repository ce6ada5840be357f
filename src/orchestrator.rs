//! Per-artist run loop.
//!
//! Every artist goes through the same steps, strictly one after another:
//!
//! ```text
//! Resolving ──absent──────────────────────────────┐
//!     │                                           │
//! Listing ───unavailable / empty──────────────────┤
//!     │                                           │
//! DirectoryPrep ──cannot create───────────────────┤
//!     │                                           │
//! Downloading (every album, failures skipped) ──> Done
//! ```
//!
//! Nothing carries over from one artist to the next. The artist directory is
//! passed explicitly to the downloader instead of changing the process
//! working directory.

use std::path::PathBuf;

use crate::{
    catalog::{Catalog, Resolver},
    download::{DownloadInvoker, Downloader, prepare_dir},
    info, success,
    types::{ArtistName, ArtistReport, ArtistStatus, DownloadOutcome, RunReport},
    utils, warning,
};

pub struct Orchestrator<C, D> {
    resolver: Resolver<C>,
    invoker: DownloadInvoker<D>,
    base_dir: PathBuf,
}

impl<C: Catalog, D: Downloader> Orchestrator<C, D> {
    pub fn new(resolver: Resolver<C>, invoker: DownloadInvoker<D>, base_dir: PathBuf) -> Self {
        Self {
            resolver,
            invoker,
            base_dir,
        }
    }

    pub fn resolver(&self) -> &Resolver<C> {
        &self.resolver
    }

    pub fn invoker(&self) -> &DownloadInvoker<D> {
        &self.invoker
    }

    /// Processes every artist in order and prints the completion banner.
    pub async fn run(&self, artists: &[ArtistName]) -> RunReport {
        let mut report = RunReport::default();

        for artist in artists {
            report.artists.push(self.process_artist(artist).await);
        }

        success!("All downloads completed.");
        report
    }

    pub async fn process_artist(&self, artist: &ArtistName) -> ArtistReport {
        let pb = utils::spinner(format!("Searching for {artist}..."));
        let artist_id = self.resolver.resolve_artist(artist).await;
        pb.finish_and_clear();

        let Some(artist_id) = artist_id else {
            warning!("Skipping {artist}: could not resolve artist.");
            return ArtistReport::skipped(artist, ArtistStatus::Unresolved);
        };

        let pb = utils::spinner(format!("Fetching albums for {artist}..."));
        let albums = self.resolver.list_albums(&artist_id).await;
        pb.finish_and_clear();

        let albums = match albums {
            Some(albums) if albums.is_empty() => {
                info!("No albums found for {artist}.");
                return ArtistReport::skipped(artist, ArtistStatus::NoAlbums);
            }
            Some(albums) => albums,
            None => {
                warning!("Skipping {artist}: could not get albums.");
                return ArtistReport::skipped(artist, ArtistStatus::AlbumsUnavailable);
            }
        };

        let dir = match prepare_dir(&self.base_dir, &artist.dir_name()).await {
            Ok(dir) => dir,
            Err(e) => {
                warning!("Skipping {artist}: cannot create directory. Err: {e}");
                let mut report = ArtistReport::skipped(artist, ArtistStatus::DirectoryFailed);
                report.albums = albums.len();
                report.failed = albums.len();
                return report;
            }
        };

        info!(
            "Downloading {count} releases of {artist} into {dir}...",
            count = albums.len(),
            dir = dir.display()
        );

        let mut downloaded = 0;
        let mut failed = 0;
        for album in &albums {
            match self.invoker.download(album, &dir).await {
                DownloadOutcome::Success => downloaded += 1,
                DownloadOutcome::Failed => failed += 1,
            }
        }

        ArtistReport {
            artist: artist.clone(),
            status: ArtistStatus::Completed,
            directory: Some(dir),
            albums: albums.len(),
            downloaded,
            failed,
        }
    }
}
