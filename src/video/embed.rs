//! Video link canonicalization.
//!
//! Only full `http(s)` links are accepted. Short links (`youtu.be/<id>`),
//! watch links (`?v=<id>`) and path forms (`/embed/<id>`, `/shorts/<id>`,
//! privacy-enhanced `youtube-nocookie.com`) all map to a single embed URL.

use reqwest::Url;
use tracing::debug;

use crate::domain::{EmbedLink, Series};

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const SHORT_HOST: &str = "youtu.be";
const VIDEO_DOMAINS: [&str; 2] = ["youtube.com", "youtube-nocookie.com"];

/// Canonical embed link for a raw video reference, if it has one.
pub fn canonical_embed(raw: &str) -> Option<EmbedLink> {
    let s = raw.trim();
    if s.is_empty() || !has_http_scheme(s) {
        return None;
    }

    let url = Url::parse(s).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();

    let id = if host == SHORT_HOST {
        first_path_segment(&url)?
    } else if is_video_domain(&host) {
        query_video_id(&url).or_else(|| last_path_segment(&url))?
    } else {
        return None;
    };

    Some(EmbedLink {
        canonical_url: format!("{EMBED_BASE}{id}"),
    })
}

/// Embed link for the newest point in `series` that carries a video reference.
///
/// Only that one reference is considered: if it cannot be canonicalized the
/// result is `None` rather than an older link.
pub fn latest_embed(series: &Series) -> Option<EmbedLink> {
    let raw = series.latest_video_ref()?;
    let link = canonical_embed(raw);
    if link.is_none() {
        debug!(raw, "latest video reference is not an embeddable link");
    }
    link
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn is_video_domain(host: &str) -> bool {
    VIDEO_DOMAINS.iter().any(|domain| {
        host == *domain
            || host
                .strip_suffix(domain)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

fn first_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .next()
        .filter(|seg| !seg.is_empty())
        .map(str::to_string)
}

fn last_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|seg| !seg.is_empty())
        .last()
        .map(str::to_string)
}

fn query_video_id(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == "v")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
