use reqwest::Client;

use crate::{
    catalog::CatalogError,
    spotify::check_status,
    types::{Artist, SearchArtistsResponse},
};

/// Searches the catalog for an artist and returns the first match.
///
/// The query is scoped with the `artist:` field filter, so only artists
/// are considered. How names are matched (case, accents, partial words) is
/// entirely up to Spotify; no local filtering is applied to the result.
///
/// # Arguments
///
/// * `client` - Shared HTTP client (carries the request timeout)
/// * `api_url` - Base URL of the Web API, without trailing slash
/// * `token` - Valid access token
/// * `name` - Artist name to search for
///
/// # Returns
///
/// - `Ok(Some(Artist))` - The first search hit
/// - `Ok(None)` - The search returned no artists
/// - `Err(CatalogError)` - Timeout, rate limit, HTTP or decoding error
///
/// # Example
///
/// ```
/// let artist = search_artist(&client, "https://api.spotify.com/v1", &token, "Daft Punk").await?;
/// if let Some(a) = artist {
///     println!("{} -> {}", a.name, a.id);
/// }
/// ```
pub async fn search_artist(
    client: &Client,
    api_url: &str,
    token: &str,
    name: &str,
) -> Result<Option<Artist>, CatalogError> {
    let api_url = format!("{uri}/search", uri = api_url);
    let query = format!("artist:{name}");

    let response = client
        .get(&api_url)
        .bearer_auth(token)
        .query(&[("q", query.as_str()), ("type", "artist"), ("limit", "1")])
        .send()
        .await?;

    let res = check_status(response)?
        .json::<SearchArtistsResponse>()
        .await?;

    Ok(res.artists.items.into_iter().next())
}
