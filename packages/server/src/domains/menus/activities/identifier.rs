//! Venue name recovery from shared map links.
//!
//! Map links usually end up at `/maps/place/<Venue+Name>/@lat,lng,...` once
//! redirects are followed; search-style links carry the venue in `?q=`.
//! Both are heuristics, so every failure collapses to `None`.

use tracing::{debug, warn};
use url::Url;

use crate::kernel::BaseUrlResolver;

/// Path segment that precedes the venue name
const PLACE_MARKER: &str = "place";

/// Query parameter used by search-style links
const QUERY_PARAM: &str = "q";

/// Follow redirects on `url` and recover the venue name from where it lands.
///
/// Best-effort: resolution failures and unrecognised URL shapes both yield
/// `None` and never block the pipeline.
pub async fn recover_venue_name(resolver: &dyn BaseUrlResolver, url: &str) -> Option<String> {
    let resolved = match resolver.resolve(url).await {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!(url = %url, error = %e, "Could not resolve map link");
            return None;
        }
    };

    let name = venue_name_from_url(&resolved);
    debug!(resolved = %resolved, name = ?name, "Venue name recovery");
    name
}

/// Recover a venue name from an already-resolved URL.
pub fn venue_name_from_url(resolved: &str) -> Option<String> {
    let url = Url::parse(resolved).ok()?;

    if let Some(mut segments) = url.path_segments() {
        while let Some(segment) = segments.next() {
            if segment == PLACE_MARKER {
                if let Some(name) = segments.next().and_then(decode_segment) {
                    return Some(name);
                }
                break;
            }
        }
    }

    // query_pairs already percent-decodes and maps '+' to ' '
    url.query_pairs()
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn decode_segment(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment).ok()?;
    let name = decoded.replace('+', " ").trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
