//! # CLI Module
//!
//! User-facing commands. Each command wires configuration, the Spotify
//! client and the external downloader together, runs, and reports.
//!
//! ## Commands
//!
//! - [`download`] - Resolves every artist in the list and downloads their
//!   releases, one directory per artist
//!
//! ## Usage
//!
//! ```bash
//! artistdl download                                # reads ./artists.txt
//! artistdl download --artists bands.txt --output ~/Music
//! artistdl download --type album --retries 5 --lenient
//! ```

mod download;

pub use download::RunSettings;
pub use download::download;
