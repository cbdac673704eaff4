use super::common;
use crate::Result;
use crate::artifacts::{Catalog, Provenance, SourceType};
use ohno::IntoAppError;
use serde::Serialize;
use std::io::Write;

const HEADER: [&str; 13] = [
    "filename",
    "source_type",
    "source_info",
    "version",
    "python_tag",
    "abi_tag",
    "platform_tag",
    "url",
    "install_command",
    "commit",
    "release_tag",
    "size",
    "scraped_at",
];

#[derive(Debug, Serialize)]
struct Row<'a> {
    filename: String,
    source_type: &'static str,
    source_info: &'a str,
    version: &'a str,
    python_tag: &'a str,
    abi_tag: &'a str,
    platform_tag: &'a str,
    url: &'a str,
    install_command: String,
    commit: &'a str,
    release_tag: &'a str,
    size: Option<u64>,
    scraped_at: &'a str,
}

/// Write one CSV row per wheel in `catalog`, returning the number of rows.
///
/// The header row is always written, even when there are no wheels.
pub fn generate<W: Write>(catalog: &Catalog, writer: W) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(HEADER).into_app_err("writing CSV header")?;

    let scraped_at = catalog.scrape_time.to_rfc3339();
    let mut rows = 0;

    for (key, records) in catalog.results.iter() {
        let source_type = SourceType::from_key(key);

        for record in records {
            let Some(wheel) = record.wheel() else {
                continue;
            };

            let (commit, release_tag) = match &record.provenance {
                Provenance::Commit(hash) => (hash.as_str(), ""),
                Provenance::GithubRelease(tag) => ("", tag.as_str()),
                _ => ("", ""),
            };

            csv_writer
                .serialize(Row {
                    filename: record.filename(),
                    source_type: source_type.into(),
                    source_info: SourceType::source_info(key),
                    version: &wheel.version,
                    python_tag: &wheel.python_tag,
                    abi_tag: &wheel.abi_tag,
                    platform_tag: &wheel.platform_tag,
                    url: record.url.as_str(),
                    install_command: common::install_command(&catalog.base_url, key, record),
                    commit,
                    release_tag,
                    size: record.size,
                    scraped_at: &scraped_at,
                })
                .into_app_err_with(|| format!("writing CSV row for '{}'", record.filename()))?;

            rows += 1;
        }
    }

    csv_writer.flush().into_app_err("flushing CSV output")?;
    Ok(rows)
}
