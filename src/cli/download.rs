use std::{path::PathBuf, time::Duration};

use tabled::Table;

use crate::{
    Res, artists,
    catalog::Resolver,
    config::Credentials,
    download::{DownloadInvoker, ExternalDownloader},
    info,
    orchestrator::Orchestrator,
    retry::RetryPolicy,
    spotify::SpotifyClient,
    types::RunReport,
    utils::ReleaseKinds,
    warning,
};

/// Everything a download run needs, as collected from the command line.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub artists_file: PathBuf,
    pub output_dir: PathBuf,
    pub catalog_policy: RetryPolicy,
    pub download_policy: RetryPolicy,
    pub release_kinds: ReleaseKinds,
    pub downloader: String,
    pub request_timeout: Duration,
}

/// Runs the whole download job and returns its report.
///
/// Only setup problems are returned as errors. Credentials are checked
/// before the artist list is read, so a missing variable stops the program
/// before any network call is made. Failures during the run end up in the
/// report instead.
pub async fn download(settings: &RunSettings) -> Res<RunReport> {
    let credentials = Credentials::from_env()?;
    let client = SpotifyClient::new(credentials, settings.request_timeout)?;

    let artists = artists::read_artists(&settings.artists_file).await;
    if artists.is_empty() {
        warning!("No artists to process.");
    } else {
        info!("Processing {} artist(s)...", artists.len());
    }

    let orchestrator = Orchestrator::new(
        Resolver::new(
            client,
            settings.catalog_policy,
            settings.release_kinds.clone(),
        ),
        DownloadInvoker::new(
            ExternalDownloader::spotdl(settings.downloader.clone()),
            settings.download_policy,
        ),
        settings.output_dir.clone(),
    );

    let report = orchestrator.run(&artists).await;

    if !report.artists.is_empty() {
        let table = Table::new(report.table_rows());
        println!("{}", table);
    }

    Ok(report)
}
