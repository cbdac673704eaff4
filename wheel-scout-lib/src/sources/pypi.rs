//! Package registry client

use super::{Fetcher, ProbeSettings, with_trailing_slash};
use core::cmp::Ordering;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::HashMap;
use url::Url;

const LOG_TARGET: &str = "      pypi";

#[derive(Debug, Deserialize)]
struct PackageInfo {
    releases: HashMap<String, IgnoredAny>,
}

#[derive(Debug, Clone)]
pub struct PypiClient {
    fetcher: Fetcher,
    pypi_url: Url,
}

impl PypiClient {
    #[must_use]
    pub fn new(fetcher: Fetcher, settings: &ProbeSettings) -> Self {
        Self {
            fetcher,
            pypi_url: with_trailing_slash(settings.pypi_url.clone()),
        }
    }

    /// Published versions of `package`, newest first, at most `max` of them.
    ///
    /// A failed request yields no versions.
    pub async fn versions(&self, package: &str, max: usize) -> Vec<String> {
        log::info!(target: LOG_TARGET, "Fetching versions of '{package}' from the registry");

        let url = match self.pypi_url.join(&format!("pypi/{package}/json")) {
            Ok(url) => url,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Invalid registry URL for '{package}': {e}");
                return Vec::new();
            }
        };

        let Some(info) = self.fetcher.get_json::<PackageInfo>(&url).await else {
            return Vec::new();
        };

        let versions = newest_first(info.releases.into_keys(), max);
        log::info!(target: LOG_TARGET, "Found {} versions of '{package}'", versions.len());
        versions
    }
}

/// Sort versions newest first and keep the first `max`.
fn newest_first(versions: impl IntoIterator<Item = String>, max: usize) -> Vec<String> {
    let mut versions: Vec<_> = versions.into_iter().collect();
    versions.sort_by(|a, b| natural_cmp(b, a));
    versions.truncate(max);
    versions
}

/// Compare two strings treating runs of ASCII digits as numbers, so `0.10.0` sorts after `0.9.0`.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chunks = Chunks(a);
    let mut b_chunks = Chunks(b);

    loop {
        match (a_chunks.next(), b_chunks.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (is_digits(x), is_digits(y)) {
                    (true, true) => {
                        let x = x.trim_start_matches('0');
                        let y = y.trim_start_matches('0');
                        x.len().cmp(&y.len()).then_with(|| x.cmp(y))
                    }
                    _ => x.cmp(y),
                };

                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Splits a string into alternating runs of digits and non-digits.
struct Chunks<'a>(&'a str);

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.0.bytes().next()?;
        let digits = first.is_ascii_digit();
        let end = self.0.bytes().position(|b| b.is_ascii_digit() != digits).unwrap_or(self.0.len());
        let (chunk, rest) = self.0.split_at(end);
        self.0 = rest;
        Some(chunk)
    }
}
