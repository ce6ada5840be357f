use reqwest::Client;

use crate::{
    catalog::CatalogError,
    spotify::check_status,
    types::{Album, AlbumResponse},
    utils,
};

/// Retrieves releases for a specific artist from the Spotify Web API.
///
/// Fetches a single page of albums filtered by `release_types`, in the
/// order Spotify returns them. The `next` link of the page is ignored:
/// artists with more than `limit` qualifying releases are truncated.
///
/// # Arguments
///
/// * `client` - Shared HTTP client (carries the request timeout)
/// * `api_url` - Base URL of the Web API, without trailing slash
/// * `artist_id` - Spotify ID of the artist
/// * `token` - Valid access token
/// * `limit` - Maximum number of albums to return (1-50)
/// * `release_types` - Release groups to include (album, single, ...)
///
/// # API Endpoint
///
/// `GET /artists/{id}/albums?include_groups={release_types}&limit={limit}`
///
/// # Example
///
/// ```
/// let albums = get_release_for_artist(
///     &client,
///     "https://api.spotify.com/v1",
///     "4tZwfgrHOc3mvqYlEYSvVi",
///     &token,
///     50,
///     &utils::ReleaseKinds::default(),
/// ).await?;
///
/// println!("Found {} releases", albums.len());
/// ```
pub async fn get_release_for_artist(
    client: &Client,
    api_url: &str,
    artist_id: &str,
    token: &str,
    limit: u32,
    release_types: &utils::ReleaseKinds,
) -> Result<Vec<Album>, CatalogError> {
    let api_url = format!(
        "{uri}/artists/{id}/albums",
        uri = api_url,
        id = artist_id,
    );

    let response = client
        .get(&api_url)
        .bearer_auth(token)
        .query(&[
            ("include_groups", release_types.to_string()),
            ("limit", limit.to_string()),
        ])
        .send()
        .await?;

    let json = check_status(response)?.json::<AlbumResponse>().await?;

    Ok(json.items)
}
