use super::common;
use crate::Result;
use crate::artifacts::{ArtifactRecord, Catalog, Provenance, SourceType};
use crate::sources::natural_cmp;
use core::fmt::Write;
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

const RULE: &str = "==================================================";
const UNKNOWN_VERSION: &str = "unknown";

/// What the console summary shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOptions {
    /// Show each file's URL, and the size of release assets.
    pub verbose: bool,

    /// Show only the newest version of each package.
    pub latest_only: bool,

    pub use_colors: bool,
}

/// Write a human-readable summary of `catalog`: every source and its files, totals,
/// and an example installation command per source type.
pub fn generate<W: Write>(catalog: &Catalog, options: &ConsoleOptions, writer: &mut W) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{RULE}")?;
    heading(writer, "RESULTS SUMMARY", options)?;
    writeln!(writer, "{RULE}")?;

    let mut packages = 0;
    for (key, records) in catalog.results.iter() {
        writeln!(writer)?;

        if records.iter().any(|r| matches!(r.provenance, Provenance::Package(_))) {
            packages += 1;
            write_package(writer, key, records, options)?;
            continue;
        }

        let source_type = SourceType::from_key(key);
        let info = SourceType::source_info(key);
        match source_type {
            SourceType::Commit => heading(writer, &format!("Commit: {info}"), options)?,
            SourceType::GithubRelease => heading(writer, &format!("GitHub Release: {info}"), options)?,
            SourceType::ReleaseVersion => heading(writer, &format!("Release Version: {info}"), options)?,
            SourceType::Nightly => heading(writer, "Nightly Wheels:", options)?,
        }

        for record in records {
            writeln!(writer, "  {}", common::describe(record))?;
            if options.verbose {
                writeln!(writer, "    URL: {}", record.url)?;
                if source_type == SourceType::GithubRelease {
                    let size = record.size.map_or_else(|| "N/A".to_string(), |s| s.to_string());
                    writeln!(writer, "    Size: {size} bytes")?;
                }
            }
        }
    }

    write_totals(writer, catalog, packages, options)?;
    write_install_examples(writer, catalog, options)
}

fn heading<W: Write>(writer: &mut W, text: &str, options: &ConsoleOptions) -> Result<()> {
    if options.use_colors {
        writeln!(writer, "{}", text.bold())?;
    } else {
        writeln!(writer, "{text}")?;
    }
    Ok(())
}

/// Files of a legacy package grouped by version, newest version first.
fn write_package<W: Write>(writer: &mut W, package: &str, records: &[ArtifactRecord], options: &ConsoleOptions) -> Result<()> {
    heading(writer, &format!("Package: {package}"), options)?;

    let mut by_version: BTreeMap<&str, Vec<&ArtifactRecord>> = BTreeMap::new();
    for record in records {
        let version = record.wheel().map_or(UNKNOWN_VERSION, |w| w.version.as_str());
        by_version.entry(version).or_default().push(record);
    }

    let mut versions: Vec<_> = by_version.into_iter().collect();
    versions.sort_by(|(a, _), (b, _)| (*a == UNKNOWN_VERSION).cmp(&(*b == UNKNOWN_VERSION)).then_with(|| natural_cmp(b, a)));
    if options.latest_only {
        versions.truncate(1);
    }

    for (version, records) in versions {
        writeln!(writer, "  Version {version}:")?;
        for record in records {
            writeln!(writer, "    {}", common::describe(record))?;
            if options.verbose {
                writeln!(writer, "      URL: {}", record.url)?;
            }
        }
    }

    Ok(())
}

fn write_totals<W: Write>(writer: &mut W, catalog: &Catalog, packages: usize, options: &ConsoleOptions) -> Result<()> {
    writeln!(writer)?;
    heading(writer, "Summary:", options)?;

    if packages > 0 {
        writeln!(writer, "  Packages: {packages}")?;
    } else {
        for source_type in SourceType::iter() {
            let count = catalog.sources.get(source_type);
            if count > 0 {
                writeln!(writer, "  {}: {count}", plural_label(source_type))?;
            }
        }
    }

    let total = catalog.results.total_files();
    let wheels = catalog.results.total_wheels();
    writeln!(writer, "  Total files: {total}")?;
    writeln!(writer, "  Wheel files: {wheels}")?;
    writeln!(writer, "  Source files: {}", total - wheels)?;
    Ok(())
}

const fn plural_label(source_type: SourceType) -> &'static str {
    match source_type {
        SourceType::Commit => "Commits",
        SourceType::GithubRelease => "GitHub Releases",
        SourceType::ReleaseVersion => "Release Versions",
        SourceType::Nightly => "Nightly Wheels",
    }
}

/// One installation command per source type, taken from the first source of that type
/// that has a wheel.
fn write_install_examples<W: Write>(writer: &mut W, catalog: &Catalog, options: &ConsoleOptions) -> Result<()> {
    let mut examples = Vec::new();

    for source_type in [SourceType::Nightly, SourceType::GithubRelease, SourceType::ReleaseVersion, SourceType::Commit] {
        // Package keys classify as commits, so skip them while looking for an example.
        let Some((key, record)) = catalog
            .results
            .iter()
            .filter(|(key, _)| SourceType::from_key(key) == source_type)
            .find_map(|(key, records)| {
                records
                    .iter()
                    .find(|r| r.is_wheel() && !matches!(r.provenance, Provenance::Package(_)))
                    .map(|record| (key, record))
            })
        else {
            continue;
        };

        let label = match source_type {
            SourceType::Nightly => "nightly wheel".to_string(),
            SourceType::GithubRelease => format!("GitHub release wheel ({})", SourceType::source_info(key)),
            SourceType::ReleaseVersion => format!("release version wheel ({})", SourceType::source_info(key)),
            SourceType::Commit => format!("commit wheel ({})", key.get(..8).unwrap_or(key)),
        };

        examples.push((label, common::install_command(&catalog.base_url, key, record)));
    }

    if examples.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    heading(writer, "Installation Examples:", options)?;
    for (label, command) in examples {
        writeln!(writer, "  # Install {label}:")?;
        writeln!(writer, "  {command}")?;
    }

    Ok(())
}
