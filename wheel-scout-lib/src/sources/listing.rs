//! Directory-index pages and the hyperlinks they contain.

use super::Fetcher;
use crate::artifacts::{Artifact, ArtifactRecord, Provenance};
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;
use url::Url;

const LOG_TARGET: &str = "   listing";

/// The `href` attribute of every anchor tag, quoted or not.
static ANCHOR_HREF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s(?:[^>]*?\s)?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).expect("invalid regex")
});

static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("&(#[0-9]+|#[xX][0-9a-fA-F]+|amp|lt|gt|quot|apos);").expect("invalid regex"));

/// Extract every anchor `href` value from a (possibly malformed) markup document, in
/// document order.
///
/// Only anchors are considered; all other markup is ignored. Because matching is purely
/// lexical, broken markup elsewhere on the page never prevents links from being found,
/// and a page with no recognizable anchors simply yields no links.
#[must_use]
pub fn extract_links(body: &str) -> Vec<String> {
    ANCHOR_HREF_REGEX
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| decode_entities(m.as_str()).into_owned())
        .collect()
}

fn decode_entities(s: &str) -> Cow<'_, str> {
    ENTITY_REGEX.replace_all(s, |caps: &Captures<'_>| {
        let entity = &caps[1];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .map_or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()), |hex| u32::from_str_radix(hex, 16).ok())
                .and_then(char::from_u32),
        };
        decoded.map_or_else(|| caps[0].to_string(), String::from)
    })
}

/// The path portion of a link, without query string or fragment.
fn link_path(link: &str) -> &str {
    let link = link.split('#').next().unwrap_or(link);
    link.split('?').next().unwrap_or(link)
}

/// What a single hyperlink on a listing page points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// A file, named by the final (percent-decoded) path segment.
    File { filename: String, url: Url },

    /// A subdirectory (trailing slash), other than `.` and `..`.
    Directory { name: String, url: Url },
}

impl Link {
    /// Classify `href` as found on `page_url`, resolving it to an absolute URL.
    ///
    /// Returns `None` for links that name nothing useful: empty targets, `.`, `..`,
    /// the site root, and links that cannot be resolved.
    #[must_use]
    pub fn classify(page_url: &Url, href: &str) -> Option<Self> {
        let path = link_path(href.trim());
        if path.is_empty() {
            return None;
        }

        let (is_dir, trimmed) = path.strip_suffix('/').map_or((false, path), |p| (true, p));
        let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
        let name = percent_decode_str(last).decode_utf8_lossy().into_owned();
        if name.is_empty() || name == "." || name == ".." {
            return None;
        }

        let url = match page_url.join(href.trim()) {
            Ok(url) => url,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Ignoring unresolvable link '{href}' on {page_url}: {e}");
                return None;
            }
        };

        Some(if is_dir {
            Self::Directory { name, url }
        } else {
            Self::File { filename: name, url }
        })
    }
}

/// The artifacts and subdirectories found on one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub files: Vec<(Artifact, Url)>,
    pub directories: Vec<Url>,
}

impl Listing {
    /// Parse a listing page body.
    ///
    /// Wheel links become wheel (or unknown) artifacts, source archives become source
    /// artifacts, and any other file links are ignored.
    #[must_use]
    pub fn parse(page_url: &Url, body: &str) -> Self {
        let mut listing = Self::default();
        for href in extract_links(body) {
            match Link::classify(page_url, &href) {
                Some(Link::File { filename, url }) => {
                    if let Some(artifact) = Artifact::from_listing_filename(&filename) {
                        listing.files.push((artifact, url));
                    }
                }
                Some(Link::Directory { url, .. }) => listing.directories.push(url),
                None => {}
            }
        }
        listing
    }

    /// Fetch and parse a listing page. A page that cannot be fetched yields an empty listing.
    pub async fn fetch(fetcher: &Fetcher, page_url: &Url) -> Self {
        match fetcher.get_text(page_url).await {
            Some(body) => Self::parse(page_url, &body),
            None => Self::default(),
        }
    }

    #[must_use]
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Tag every file with `provenance`.
    #[must_use]
    pub fn into_records(self, provenance: &Provenance) -> Vec<ArtifactRecord> {
        self.files
            .into_iter()
            .map(|(artifact, url)| ArtifactRecord::new(artifact, url, provenance.clone()))
            .collect()
    }
}
