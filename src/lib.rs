//! Artist Discography Downloader Library
//!
//! This library resolves a list of artist names against the Spotify Web API,
//! enumerates each artist's releases and hands every release URL to an
//! external command-line downloader, one directory per artist.
//!
//! # Modules
//!
//! - `artists` - Loading and normalizing the input list of artist names
//! - `catalog` - Catalog abstraction and the retrying artist/album resolver
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `download` - External downloader invocation with retry
//! - `orchestrator` - Per-artist resolve, list, prepare and download loop
//! - `retry` - Bounded exponential-backoff retry primitive
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use artistdl::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> artistdl::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod artists;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod download;
pub mod orchestrator;
pub mod retry;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the application boundary where the concrete error type does not
/// matter any more, only its message. Keeps the Send + Sync bounds so it can
/// cross await points freely.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Resolving {} artists...", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Downloaded {}", album_name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for fatal errors before the run starts (bad configuration,
/// missing credentials). Failures inside a run are reported with
/// [`warning!`] and the run continues.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for every recoverable failure: retries, skipped artists and albums
/// that could not be downloaded.
///
/// # Example
///
/// ```
/// warning!("Read timeout. Retrying in {}s...", secs);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
