//! External downloader invocation.
//!
//! The actual audio download is delegated to a command-line tool (`spotdl`
//! by default), run once per album with the artist directory as its working
//! directory. The process-wide working directory is never changed.

use std::{
    fmt, io,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
};

use tokio::process::Command;

use crate::{
    retry::{RetryPolicy, with_backoff},
    success,
    types::{AlbumReference, DownloadOutcome},
    warning,
};

#[derive(Debug)]
pub enum DownloadError {
    /// The tool could not be started at all (missing binary, permissions).
    Spawn { program: String, source: io::Error },
    /// The tool ran and exited unsuccessfully.
    Exit(ExitStatus),
}

impl DownloadError {
    /// A failed run may succeed on the next try; a tool that cannot be
    /// started will not.
    pub fn is_transient(&self) -> bool {
        matches!(self, DownloadError::Exit(_))
    }
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Spawn { program, source } => {
                write!(f, "cannot run {program}: {source}")
            }
            DownloadError::Exit(status) => match status.code() {
                Some(code) => write!(f, "downloader exited with code {code}"),
                None => write!(f, "downloader was terminated by a signal"),
            },
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DownloadError::Spawn { source, .. } => Some(source),
            DownloadError::Exit(_) => None,
        }
    }
}

/// Single-attempt download of one album into `dest`.
#[allow(async_fn_in_trait)]
pub trait Downloader {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Runs `<program> <args...> <url>` inside the destination directory.
#[derive(Debug, Clone)]
pub struct ExternalDownloader {
    program: String,
    args: Vec<String>,
}

impl ExternalDownloader {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `spotdl download <url>`
    pub fn spotdl(program: impl Into<String>) -> Self {
        Self::new(program, vec!["download".to_string()])
    }
}

impl Downloader for ExternalDownloader {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .current_dir(dest)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| DownloadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DownloadError::Exit(status))
        }
    }
}

/// Downloads albums one at a time, retrying failed runs with backoff.
pub struct DownloadInvoker<D> {
    downloader: D,
    policy: RetryPolicy,
}

impl<D: Downloader> DownloadInvoker<D> {
    pub fn new(downloader: D, policy: RetryPolicy) -> Self {
        Self { downloader, policy }
    }

    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    /// Downloads `album` into `dest`. Never fails the caller: exhausted
    /// retries are reported and turned into [`DownloadOutcome::Failed`].
    pub async fn download(&self, album: &AlbumReference, dest: &Path) -> DownloadOutcome {
        let downloader = &self.downloader;
        let url = album.url.as_str();
        let label = format!("download {}", album.url);

        match with_backoff(&self.policy, &label, DownloadError::is_transient, move || {
            downloader.fetch(url, dest)
        })
        .await
        {
            Ok(()) => {
                success!("Downloaded {} ({})", album.name, album.url);
                DownloadOutcome::Success
            }
            Err(_) => {
                warning!("Skipping {} ({}).", album.name, album.url);
                DownloadOutcome::Failed
            }
        }
    }
}

/// Ensures `base/<dir_name>` exists and returns it. Safe to call when the
/// directory is already there.
pub async fn prepare_dir(base: &Path, dir_name: &str) -> io::Result<PathBuf> {
    let dir = base.join(dir_name);
    async_fs::create_dir_all(&dir).await?;
    Ok(dir)
}
