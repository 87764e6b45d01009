//! Robots.txt handling module
//!
//! The crawl stays on one site, so robots.txt is fetched once, from the
//! homepage's origin, before the first page is visited. Any failure to fetch it
//! is treated as "everything allowed".

mod policy;

pub use policy::RobotsPolicy;

use reqwest::Client;
use url::Url;

/// Fetches and parses robots.txt for the homepage's origin
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `homepage` - Any URL on the site; only its origin is used
///
/// # Returns
///
/// The parsed policy, or `RobotsPolicy::allow_all()` when the file is missing,
/// unreachable, or returns a non-2xx status.
pub async fn fetch_robots(client: &Client, homepage: &Url) -> RobotsPolicy {
    let robots_url = match homepage.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL from {}: {}", homepage, e);
            return RobotsPolicy::allow_all();
        }
    };

    tracing::debug!("Fetching {}", robots_url);
    match client.get(robots_url.clone()).send().await {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => RobotsPolicy::from_content(&body),
            Err(e) => {
                tracing::debug!("Failed to read {}: {}", robots_url, e);
                RobotsPolicy::allow_all()
            }
        },
        Ok(response) => {
            tracing::debug!(
                "{} returned {}, allowing all paths",
                robots_url,
                response.status()
            );
            RobotsPolicy::allow_all()
        }
        Err(e) => {
            tracing::debug!("Failed to fetch {}: {}", robots_url, e);
            RobotsPolicy::allow_all()
        }
    }
}
