use std::{io::ErrorKind, path::Path};

use crate::{types::ArtistName, warning};

/// Reads artist names from a plain-text file, one per line.
///
/// Lines are trimmed and title-cased; blank lines are skipped and the file
/// order is kept. A missing file is reported and treated as an empty list so
/// the run can still finish normally.
pub async fn read_artists(path: &Path) -> Vec<ArtistName> {
    match async_fs::read_to_string(path).await {
        Ok(content) => parse_artists(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warning!(
                "File '{}' not found. Create one and populate it with artist names.",
                path.display()
            );
            Vec::new()
        }
        Err(e) => {
            warning!("Cannot read '{}': {}", path.display(), e);
            Vec::new()
        }
    }
}

pub fn parse_artists(content: &str) -> Vec<ArtistName> {
    content.lines().filter_map(ArtistName::parse).collect()
}
