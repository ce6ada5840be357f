use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use artistdl::{
    catalog::{Catalog, CatalogError, Resolver},
    download::{DownloadError, DownloadInvoker, Downloader},
    orchestrator::Orchestrator,
    retry::RetryPolicy,
    types::{AlbumReference, ArtistId, ArtistName, ArtistStatus},
    utils::ReleaseKinds,
};
use tempfile::TempDir;
use tokio::time::Instant;

#[derive(Clone, Copy)]
enum FakeError {
    Timeout,
    Forbidden,
}

impl FakeError {
    fn to_error(self) -> CatalogError {
        match self {
            FakeError::Timeout => CatalogError::Timeout("operation timed out".to_string()),
            FakeError::Forbidden => CatalogError::Status {
                status: 403,
                url: "https://api.example/search".to_string(),
            },
        }
    }
}

#[derive(Default)]
struct FakeCatalog {
    ids: HashMap<String, String>,
    albums: HashMap<String, Vec<String>>,
    search_error: Option<FakeError>,
    album_error: Option<FakeError>,
    search_calls: RefCell<Vec<String>>,
    album_calls: Cell<u32>,
}

impl FakeCatalog {
    fn with_artist(mut self, name: &str, id: &str, urls: &[&str]) -> Self {
        self.ids.insert(name.to_string(), id.to_string());
        self.albums.insert(
            id.to_string(),
            urls.iter().map(|u| u.to_string()).collect(),
        );
        self
    }
}

impl Catalog for FakeCatalog {
    async fn search_artist(&self, name: &str) -> Result<Option<ArtistId>, CatalogError> {
        self.search_calls.borrow_mut().push(name.to_string());
        if let Some(err) = self.search_error {
            return Err(err.to_error());
        }
        Ok(self.ids.get(name).cloned().map(ArtistId))
    }

    async fn artist_albums(
        &self,
        id: &ArtistId,
        kinds: &ReleaseKinds,
        limit: u32,
    ) -> Result<Vec<AlbumReference>, CatalogError> {
        assert_eq!(kinds.to_string(), "album,single");
        assert_eq!(limit, 50);

        self.album_calls.set(self.album_calls.get() + 1);
        if let Some(err) = self.album_error {
            return Err(err.to_error());
        }

        Ok(self
            .albums
            .get(&id.0)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|url| AlbumReference {
                name: format!("album at {url}"),
                url,
            })
            .collect())
    }
}

#[derive(Default)]
struct FakeDownloader {
    always_fail: Vec<String>,
    calls: RefCell<Vec<(String, PathBuf)>>,
}

impl Downloader for FakeDownloader {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        self.calls
            .borrow_mut()
            .push((url.to_string(), dest.to_path_buf()));

        // The destination must already exist when the tool runs
        assert!(dest.is_dir(), "{} is not a directory", dest.display());

        if self.always_fail.iter().any(|u| u == url) {
            return Err(exit_failure());
        }
        Ok(())
    }
}

#[cfg(unix)]
fn exit_failure() -> DownloadError {
    use std::os::unix::process::ExitStatusExt;
    DownloadError::Exit(std::process::ExitStatus::from_raw(1 << 8))
}

#[cfg(windows)]
fn exit_failure() -> DownloadError {
    use std::os::windows::process::ExitStatusExt;
    DownloadError::Exit(std::process::ExitStatus::from_raw(1))
}

fn orchestrator(
    catalog: FakeCatalog,
    downloader: FakeDownloader,
    base: &Path,
) -> Orchestrator<FakeCatalog, FakeDownloader> {
    Orchestrator::new(
        Resolver::new(
            catalog,
            RetryPolicy::new(3, Duration::from_secs(10)),
            ReleaseKinds::default(),
        ),
        DownloadInvoker::new(downloader, RetryPolicy::new(3, Duration::from_secs(5))),
        base.to_path_buf(),
    )
}

fn artists(names: &[&str]) -> Vec<ArtistName> {
    names.iter().filter_map(|n| ArtistName::parse(n)).collect()
}

#[tokio::test(start_paused = true)]
async fn test_downloads_every_album_in_order_into_artist_dir() {
    let tmp = TempDir::new().unwrap();
    let catalog = FakeCatalog::default().with_artist("Daft Punk", "X", &["url1", "url2"]);
    let orch = orchestrator(catalog, FakeDownloader::default(), tmp.path());

    let report = orch.run(&artists(&["daft punk"])).await;

    let artist_dir = tmp.path().join("Daft Punk");
    assert!(artist_dir.is_dir());

    let calls = orch_downloads(&orch);
    assert_eq!(
        calls,
        vec![
            ("url1".to_string(), artist_dir.clone()),
            ("url2".to_string(), artist_dir.clone()),
        ]
    );

    assert_eq!(report.artists.len(), 1);
    let artist = &report.artists[0];
    assert_eq!(artist.status, ArtistStatus::Completed);
    assert_eq!(artist.albums, 2);
    assert_eq!(artist.downloaded, 2);
    assert_eq!(artist.failed, 0);
    assert_eq!(artist.directory.as_deref(), Some(artist_dir.as_path()));
    assert!(!report.has_failures());
}

#[tokio::test(start_paused = true)]
async fn test_unresolved_artist_is_skipped_without_directory() {
    let tmp = TempDir::new().unwrap();
    let catalog = FakeCatalog::default().with_artist("Justice", "J", &["url-j"]);
    let orch = orchestrator(catalog, FakeDownloader::default(), tmp.path());

    let report = orch.run(&artists(&["nobody known", "justice"])).await;

    assert!(!tmp.path().join("Nobody Known").exists());
    assert!(tmp.path().join("Justice").is_dir());

    let calls = orch_downloads(&orch);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "url-j");

    assert_eq!(report.artists[0].status, ArtistStatus::Unresolved);
    assert_eq!(report.artists[1].status, ArtistStatus::Completed);
    assert!(report.has_failures());
}

#[tokio::test(start_paused = true)]
async fn test_album_listing_timeouts_skip_artist_after_backoff() {
    let tmp = TempDir::new().unwrap();
    let mut catalog = FakeCatalog::default().with_artist("Air", "A", &["url-a"]);
    catalog.album_error = Some(FakeError::Timeout);
    let orch = orchestrator(catalog, FakeDownloader::default(), tmp.path());

    let start = Instant::now();
    let report = orch.run(&artists(&["air"])).await;
    let elapsed = start.elapsed();

    // three attempts, two waits of 10s and 20s
    assert_eq!(orch_catalog(&orch).album_calls.get(), 3);
    assert!(elapsed >= Duration::from_secs(30) && elapsed < Duration::from_secs(31));

    assert_eq!(report.artists[0].status, ArtistStatus::AlbumsUnavailable);
    assert!(!tmp.path().join("Air").exists());
    assert!(orch_downloads(&orch).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_permanent_search_error_is_not_retried() {
    let tmp = TempDir::new().unwrap();
    let mut catalog = FakeCatalog::default().with_artist("Air", "A", &["url-a"]);
    catalog.search_error = Some(FakeError::Forbidden);
    let orch = orchestrator(catalog, FakeDownloader::default(), tmp.path());

    let report = orch.run(&artists(&["air"])).await;

    assert_eq!(orch_catalog(&orch).search_calls.borrow().len(), 1);
    assert_eq!(report.artists[0].status, ArtistStatus::Unresolved);
}

#[tokio::test(start_paused = true)]
async fn test_empty_album_list_is_not_a_failure() {
    let tmp = TempDir::new().unwrap();
    let catalog = FakeCatalog::default().with_artist("Air", "A", &[]);
    let orch = orchestrator(catalog, FakeDownloader::default(), tmp.path());

    let report = orch.run(&artists(&["air"])).await;

    assert_eq!(report.artists[0].status, ArtistStatus::NoAlbums);
    assert!(!tmp.path().join("Air").exists());
    assert!(!report.has_failures());
}

#[tokio::test(start_paused = true)]
async fn test_failing_download_is_retried_then_skipped() {
    let tmp = TempDir::new().unwrap();
    let catalog = FakeCatalog::default().with_artist("Daft Punk", "X", &["bad", "good"]);
    let downloader = FakeDownloader {
        always_fail: vec!["bad".to_string()],
        ..Default::default()
    };
    let orch = orchestrator(catalog, downloader, tmp.path());

    let report = orch.run(&artists(&["daft punk"])).await;

    let urls: Vec<String> = orch_downloads(&orch).into_iter().map(|(u, _)| u).collect();
    assert_eq!(urls, vec!["bad", "bad", "bad", "good"]);

    let artist = &report.artists[0];
    assert_eq!(artist.status, ArtistStatus::Completed);
    assert_eq!(artist.downloaded, 1);
    assert_eq!(artist.failed, 1);
    assert!(report.has_failures());
}

#[tokio::test(start_paused = true)]
async fn test_directory_prep_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("Daft Punk")).unwrap();

    let catalog = FakeCatalog::default().with_artist("Daft Punk", "X", &["url1"]);
    let orch = orchestrator(catalog, FakeDownloader::default(), tmp.path());

    let first = orch.run(&artists(&["daft punk"])).await;
    let second = orch.run(&artists(&["daft punk"])).await;

    assert_eq!(first.artists[0].status, ArtistStatus::Completed);
    assert_eq!(second.artists[0].status, ArtistStatus::Completed);
    assert_eq!(second.artists[0].downloaded, 1);
    assert_eq!(orch_downloads(&orch).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_artist_directories_do_not_nest() {
    let tmp = TempDir::new().unwrap();
    let catalog = FakeCatalog::default()
        .with_artist("Air", "A", &["url-a"])
        .with_artist("Phoenix", "P", &["url-p"]);
    let orch = orchestrator(catalog, FakeDownloader::default(), tmp.path());

    orch.run(&artists(&["air", "phoenix"])).await;

    let calls = orch_downloads(&orch);
    assert_eq!(calls[0].1, tmp.path().join("Air"));
    assert_eq!(calls[1].1, tmp.path().join("Phoenix"));
    assert!(!tmp.path().join("Air").join("Phoenix").exists());
}

#[tokio::test(start_paused = true)]
async fn test_empty_artist_list_completes() {
    let tmp = TempDir::new().unwrap();
    let orch = orchestrator(FakeCatalog::default(), FakeDownloader::default(), tmp.path());

    let report = orch.run(&[]).await;

    assert!(report.artists.is_empty());
    assert!(!report.has_failures());
}

fn orch_downloads(orch: &Orchestrator<FakeCatalog, FakeDownloader>) -> Vec<(String, PathBuf)> {
    orch.invoker().downloader().calls.borrow().clone()
}

fn orch_catalog(orch: &Orchestrator<FakeCatalog, FakeDownloader>) -> &FakeCatalog {
    orch.resolver().catalog()
}
