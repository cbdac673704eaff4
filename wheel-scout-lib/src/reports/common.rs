use crate::artifacts::{ArtifactRecord, SourceType};

const TORCH_BACKEND: &str = "--torch-backend auto";

/// The `uv` command that installs `record`, which was found under `key` in a catalog of `base_url`.
pub fn install_command(base_url: &str, key: &str, record: &ArtifactRecord) -> String {
    let base = base_url.trim_end_matches('/');
    let package = record.wheel().map_or_else(|| record.filename(), |wheel| wheel.name.clone());
    let info = SourceType::source_info(key);

    match SourceType::from_key(key) {
        SourceType::GithubRelease => format!("uv pip install {} {TORCH_BACKEND}", record.url),
        SourceType::ReleaseVersion => format!("uv pip install -U {package}=={info} --extra-index-url {base}/{info} {TORCH_BACKEND}"),
        SourceType::Nightly => format!("uv pip install {package} --extra-index-url {base}/nightly {TORCH_BACKEND}"),
        SourceType::Commit => format!("uv pip install {package} --extra-index-url {base}/{info} {TORCH_BACKEND}"),
    }
}

/// `filename (python-abi-platform)` for wheels, `filename (kind)` for anything else.
pub fn describe(record: &ArtifactRecord) -> String {
    record.wheel().map_or_else(
        || format!("{} ({})", record.filename(), record.kind()),
        |wheel| format!("{} ({})", record.filename(), wheel.compatibility()),
    )
}
