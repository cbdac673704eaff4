//! Integration tests for source discovery against a mock index server.
//!
//! A single `wiremock` server stands in for the wheel index, the GitHub API, and the
//! package registry. Requests that no mock answers get a 404, which the probes treat
//! as an empty location.

use core::time::Duration;
use std::collections::BTreeSet;
use url::Url;
use wheel_scout_lib::artifacts::ArtifactKind;
use wheel_scout_lib::sources::{Aggregator, ProbeSettings, ScanPlan};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMMIT_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const COMMIT_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const COMMIT_C: &str = "cccccccccccccccccccccccccccccccccccccccc";

fn index_page(links: &[&str]) -> String {
    let anchors: String = links.iter().map(|link| format!("<a href=\"{link}\">{link}</a><br>\n")).collect();
    format!("<html><body>\n{anchors}</body></html>\n")
}

fn settings(server: &MockServer) -> ProbeSettings {
    let url = Url::parse(&server.uri()).unwrap();
    let mut settings = ProbeSettings::new(url.clone(), url.clone(), url);
    settings.probe_delay = Duration::ZERO;
    settings.request_timeout = Duration::from_secs(5);
    settings
}

async fn mount_page(server: &MockServer, route: &str, links: &[&str], expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_page(links)))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_missing(server: &MockServer, route: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(404))
        .expect(expected)
        .mount(server)
        .await;
}

/// Paths of every request the server has received, in arrival order.
async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

/// The version a path belongs to, for `{version}/...` and `v{version}/...` layouts.
fn version_of(path: &str) -> Option<&str> {
    let first = path.trim_start_matches('/').split('/').next()?;
    let version = first.strip_prefix('v').unwrap_or(first);
    version.starts_with("0.").then_some(version)
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_commit_discovery_with_github_fallback() {
    let server = MockServer::start().await;

    let a = format!("{COMMIT_A}/");
    let b = format!("{COMMIT_B}/");
    mount_page(&server, "/", &["../", &a, &b, "nightly/", "?C=M;O=A"], 1).await;

    // The nested layout is linked from the commit directory too, but is only listed once.
    mount_page(
        &server,
        &format!("/{COMMIT_A}/"),
        &["../", "vllm-0.6.0+cu121-cp38-abi3-manylinux1_x86_64.whl", "vllm/"],
        1,
    )
    .await;
    mount_page(
        &server,
        &format!("/{COMMIT_A}/vllm/"),
        &["vllm-0.6.0+cu124-cp38-abi3-manylinux1_x86_64.whl", "vllm-0.6.0.tar.gz"],
        1,
    )
    .await;
    mount_page(
        &server,
        &format!("/{COMMIT_B}/vllm/"),
        &["vllm-0.6.1-cp38-abi3-manylinux1_x86_64.whl"],
        1,
    )
    .await;

    // Two listed commits is under the fallback threshold, so GitHub is asked as well.
    // The already known commit is not probed again; the unknown one has no files.
    mount_json(
        &server,
        "/repos/vllm-project/vllm/commits",
        serde_json::json!([{ "sha": COMMIT_A }, { "sha": COMMIT_C }]),
    )
    .await;
    mount_missing(&server, &format!("/{COMMIT_C}/"), 1).await;
    mount_missing(&server, &format!("/{COMMIT_C}/vllm/"), 1).await;

    let aggregator = Aggregator::new(settings(&server), None).unwrap();
    let results = aggregator.run(&ScanPlan::default()).await.unwrap();

    let keys: Vec<_> = results.keys().collect();
    assert_eq!(keys.len(), 2);
    assert!(results.contains_key(COMMIT_A));
    assert!(results.contains_key(COMMIT_B));
    assert!(!results.contains_key(COMMIT_C));

    let a_records = results.get(COMMIT_A).unwrap();
    assert_eq!(a_records.len(), 3);
    assert_eq!(a_records.iter().filter(|r| r.is_wheel()).count(), 2);
    assert!(a_records.iter().any(|r| r.kind() == ArtifactKind::Source));

    let b_records = results.get(COMMIT_B).unwrap();
    assert_eq!(b_records.len(), 1);
    assert_eq!(
        b_records[0].url.as_str(),
        format!("{}/{COMMIT_B}/vllm/vllm-0.6.1-cp38-abi3-manylinux1_x86_64.whl", server.uri())
    );
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_commit_cap_and_wheels_only() {
    let server = MockServer::start().await;

    let a = format!("{COMMIT_A}/");
    let b = format!("{COMMIT_B}/");
    mount_page(&server, "/", &[&a, &b], 1).await;
    mount_page(
        &server,
        &format!("/{COMMIT_A}/"),
        &["vllm-0.6.0-cp38-abi3-manylinux1_x86_64.whl", "vllm-0.6.0.tar.gz"],
        1,
    )
    .await;
    mount_missing(&server, &format!("/{COMMIT_B}/"), 0).await;

    let mut settings = settings(&server);
    settings.commit_fallback_threshold = 1;

    let plan = ScanPlan {
        max_commits: 1,
        wheels_only: true,
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings, None).unwrap();
    let results = aggregator.run(&plan).await.unwrap();

    assert_eq!(results.len(), 1);
    let records = results.get(COMMIT_A).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_wheel());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_commit_cap_bounds_github_fallback() {
    let server = MockServer::start().await;

    let commits: Vec<String> = (1..=6).map(|i| format!("{i:040x}")).collect();
    for (i, commit) in commits.iter().enumerate() {
        let expected = u64::from(i == 0);
        mount_page(&server, &format!("/{commit}/"), &["vllm-0.6.0-cp38-abi3-manylinux1_x86_64.whl"], expected).await;
    }

    let listed: Vec<_> = commits.iter().map(|sha| serde_json::json!({ "sha": sha })).collect();
    mount_json(&server, "/repos/vllm-project/vllm/commits", serde_json::Value::Array(listed)).await;

    let plan = ScanPlan {
        max_commits: 1,
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings(&server), None).unwrap();
    let results = aggregator.run(&plan).await.unwrap();

    assert_eq!(results.keys().collect::<Vec<_>>(), [commits[0].as_str()]);

    // The first commit is confirmed through both of its layouts and its files are reused.
    let commit_fetches: Vec<_> = requested_paths(&server)
        .await
        .into_iter()
        .filter(|p| commits.iter().any(|c| p.starts_with(&format!("/{c}/"))))
        .collect();
    assert_eq!(commit_fetches, [format!("/{}/", commits[0]), format!("/{}/vllm/", commits[0])]);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_zero_commit_cap_makes_no_requests() {
    let server = MockServer::start().await;

    let plan = ScanPlan {
        max_commits: 0,
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings(&server), None).unwrap();
    let results = aggregator.run(&plan).await.unwrap();

    assert!(results.is_empty());
    assert!(requested_paths(&server).await.is_empty());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_undecodable_layout_does_not_hide_nested_files() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{COMMIT_A}/")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0xfd]))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        &format!("/{COMMIT_A}/vllm/"),
        &["vllm-0.6.0-cp38-abi3-manylinux1_x86_64.whl"],
        1,
    )
    .await;

    let plan = ScanPlan {
        commit: Some(COMMIT_A.to_string()),
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings(&server), None).unwrap();
    let results = aggregator.run(&plan).await.unwrap();

    let records = results.get(COMMIT_A).unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_wheel());
    assert_eq!(
        records[0].url.as_str(),
        format!("{}/{COMMIT_A}/vllm/vllm-0.6.0-cp38-abi3-manylinux1_x86_64.whl", server.uri())
    );
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_single_commit_skips_discovery() {
    let server = MockServer::start().await;

    mount_missing(&server, "/", 0).await;
    mount_page(
        &server,
        &format!("/{COMMIT_B}/"),
        &["vllm-0.6.1-cp38-abi3-manylinux1_x86_64.whl"],
        1,
    )
    .await;

    let plan = ScanPlan {
        commit: Some(COMMIT_B.to_string()),
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings(&server), None).unwrap();
    let results = aggregator.run(&plan).await.unwrap();

    assert_eq!(results.keys().collect::<Vec<_>>(), [COMMIT_B]);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_version_probe_stops_at_first_layout_and_respects_cap() {
    let server = MockServer::start().await;

    let releases: serde_json::Map<String, serde_json::Value> =
        (1..=20).map(|minor| (format!("0.{minor}.0"), serde_json::json!([]))).collect();
    mount_json(&server, "/pypi/vllm/json", serde_json::json!({ "releases": releases })).await;

    // Newest first by natural ordering: 0.20.0 .. 0.16.0 are probed, 0.15.0 is not.
    mount_page(&server, "/0.20.0/", &["vllm-0.20.0-cp38-abi3-manylinux1_x86_64.whl"], 1).await;
    mount_missing(&server, "/v0.20.0/", 0).await;
    mount_page(&server, "/v0.19.0/", &["vllm-0.19.0-cp38-abi3-manylinux1_x86_64.whl"], 1).await;
    mount_missing(&server, "/v0.19.0/vllm/", 0).await;
    mount_missing(&server, "/0.15.0/", 0).await;

    // Commit discovery also runs, but neither the index root nor GitHub answers.
    let plan = ScanPlan {
        release_versions: true,
        max_versions: 5,
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings(&server), None).unwrap();
    let results = aggregator.run(&plan).await.unwrap();

    assert!(results.contains_key("version_0.20.0"));
    assert!(results.contains_key("version_0.19.0"));
    assert!(!results.contains_key("version_0.15.0"));
    assert_eq!(results.len(), 2);

    let paths = requested_paths(&server).await;
    let probed: BTreeSet<&str> = paths.iter().filter_map(|p| version_of(p)).collect();
    assert_eq!(probed, BTreeSet::from(["0.16.0", "0.17.0", "0.18.0", "0.19.0", "0.20.0"]));

    // One listing for 0.20.0, three for 0.19.0, all four layouts for the other three.
    let version_fetches = paths.iter().filter(|p| version_of(p).is_some()).count();
    assert_eq!(version_fetches, 1 + 3 + 3 * 4);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_nightly_stops_at_first_layout() {
    let server = MockServer::start().await;

    mount_page(&server, "/nightly/", &["vllm-0.6.1.dev5-cp38-abi3-manylinux1_x86_64.whl"], 1).await;
    mount_missing(&server, "/nightly/vllm/", 0).await;
    mount_missing(&server, "/nightly/simple/vllm/", 0).await;

    let plan = ScanPlan {
        nightly: true,
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings(&server), None).unwrap();
    let results = aggregator.run(&plan).await.unwrap();

    assert_eq!(results.keys().collect::<Vec<_>>(), ["nightly"]);
    assert_eq!(results.total_wheels(), 1);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_release_assets_keep_only_wheels() {
    let server = MockServer::start().await;
    let download = |name: &str| format!("{}/download/v0.6.0/{name}", server.uri());

    mount_json(
        &server,
        "/repos/vllm-project/vllm/releases",
        serde_json::json!([
            {
                "tag_name": "v0.6.0",
                "name": "vLLM 0.6.0",
                "published_at": "2024-09-04T12:00:00Z",
                "prerelease": false,
                "assets": [
                    {
                        "name": "vllm-0.6.0+cu118-cp38-abi3-manylinux1_x86_64.whl",
                        "browser_download_url": download("vllm-0.6.0+cu118-cp38-abi3-manylinux1_x86_64.whl"),
                        "size": 123_456,
                        "created_at": "2024-09-04T11:00:00Z"
                    },
                    {
                        "name": "vllm-0.6.0.tar.gz",
                        "browser_download_url": download("vllm-0.6.0.tar.gz"),
                        "size": 1000
                    },
                    {
                        "name": "broken.whl",
                        "browser_download_url": download("broken.whl")
                    }
                ]
            },
            {
                "tag_name": "v0.5.5",
                "assets": []
            }
        ]),
    )
    .await;

    let plan = ScanPlan {
        github_releases: true,
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings(&server), Some("secret")).unwrap();
    let results = aggregator.run(&plan).await.unwrap();

    assert_eq!(results.keys().collect::<Vec<_>>(), ["release_v0.6.0"]);
    let records = results.get("release_v0.6.0").unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_wheel());
    assert_eq!(records[0].size, Some(123_456));
    assert!(records[0].created_at.is_some());
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_legacy_discovery() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["../", "vllm/", "?C=N;O=D"], 1).await;
    mount_page(&server, "/simple/", &["vllm/", "torch/"], 1).await;
    mount_page(
        &server,
        "/vllm/",
        &["vllm-0.4.0-cp38-abi3-manylinux1_x86_64.whl", "vllm-0.4.0.tar.gz"],
        1,
    )
    .await;
    mount_page(&server, "/simple/torch/", &["torch-2.4.0-cp311-cp311-linux_x86_64.whl"], 1).await;
    mount_missing(&server, "/nightly/torch/", 0).await;

    let plan = ScanPlan {
        legacy_mode: true,
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings(&server), None).unwrap();
    let results = aggregator.run(&plan).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results.get("vllm").unwrap().len(), 2);
    assert_eq!(results.get("torch").unwrap().len(), 1);
    assert_eq!(results.total_wheels(), 2);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_legacy_discovery_without_packages_fails() {
    let server = MockServer::start().await;

    mount_page(&server, "/", &["../", "vllm-0.4.0.tar.gz"], 1).await;

    let plan = ScanPlan {
        legacy_mode: true,
        ..ScanPlan::default()
    };

    let aggregator = Aggregator::new(settings(&server), None).unwrap();
    let result = aggregator.run(&plan).await;
    assert!(result.is_err());
}
