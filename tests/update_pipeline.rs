use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use invoice_lottery::error::{AppError, Result};
use invoice_lottery::models::{FeedEntry, FeedSnapshot};
use invoice_lottery::pipeline::{UpdateOptions, UpdateOutcome, run_update};
use invoice_lottery::services::FeedSource;
use invoice_lottery::storage::LocalStorage;
use tempfile::TempDir;

/// Feed that replays a fixed snapshot and records the tokens it was asked with.
struct StubFeed {
    snapshot: Option<FeedSnapshot>,
    calls: Mutex<Vec<Option<String>>>,
}

impl StubFeed {
    fn new(modified: &str, entries: Vec<FeedEntry>) -> Self {
        Self::with_snapshot(FeedSnapshot {
            modified: Some(modified.to_string()),
            entries,
            not_modified: false,
        })
    }

    fn with_snapshot(snapshot: FeedSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn unavailable() -> Self {
        Self {
            snapshot: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for StubFeed {
    async fn fetch(&self, since: Option<&str>) -> Result<FeedSnapshot> {
        self.calls.lock().unwrap().push(since.map(str::to_string));
        self.snapshot
            .clone()
            .ok_or_else(|| AppError::feed("stub://invoice.xml", "connection refused"))
    }
}

fn entry(title: &str, summary: &str) -> FeedEntry {
    FeedEntry {
        title: title.to_string(),
        summary: summary.to_string(),
    }
}

fn write_db(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("lottery.json");
    std::fs::write(&path, contents).unwrap();
    path
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

const OLD_DB: &str = r#"{"modified": "T0", "drawings": []}"#;

#[tokio::test]
async fn unchanged_token_leaves_database_untouched() {
    let tmp = TempDir::new().unwrap();
    let original = r#"{"modified": "T1", "drawings": []}"#;
    let path = write_db(&tmp, original);
    let feed = StubFeed::new("T1", vec![entry("101年09月、10", "<p>特獎：11661657</p>")]);

    let outcome = run_update(&feed, &LocalStorage::new(&path), UpdateOptions::default())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        UpdateOutcome::Unchanged {
            modified: Some("T1".to_string())
        }
    );
    assert_eq!(read(&path), original);
    assert_eq!(feed.calls(), vec![Some("T1".to_string())]);
}

#[tokio::test]
async fn not_modified_response_leaves_database_untouched() {
    let tmp = TempDir::new().unwrap();
    let original = r#"{"modified": "T1", "drawings": []}"#;
    let path = write_db(&tmp, original);
    let feed = StubFeed::with_snapshot(FeedSnapshot::not_modified(Some("T1".to_string())));

    let outcome = run_update(&feed, &LocalStorage::new(&path), UpdateOptions::default())
        .await
        .unwrap();

    assert!(matches!(outcome, UpdateOutcome::Unchanged { .. }));
    assert_eq!(read(&path), original);
}

#[tokio::test]
async fn new_token_rewrites_database() {
    let tmp = TempDir::new().unwrap();
    let path = write_db(&tmp, OLD_DB);
    let feed = StubFeed::new("T1", vec![entry("101年09月、10", "<p>特獎：11661657</p>")]);

    let outcome = run_update(&feed, &LocalStorage::new(&path), UpdateOptions::default())
        .await
        .unwrap();

    assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
    assert_eq!(
        read(&path),
        r#"{"modified":"T1","drawings":[{"start":"2012-09-01","end":"2012-11-01","grand":["11661657"]}]}"#
    );
    assert_eq!(feed.calls(), vec![Some("T0".to_string())]);
}

#[tokio::test]
async fn missing_database_is_created() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("lottery.json");
    let feed = StubFeed::new(
        "Sun, 25 Nov 2012 13:12:14 GMT",
        vec![
            entry(
                "101年09月、10",
                "<p>特別獎：15719324</p><p>特獎：11661657</p>\
                 <p>頭獎：64718986、49313179、29736314</p><p>增開六獎：843、927</p>",
            ),
            entry("101年11月、12", "<p>特獎：00000001</p>"),
        ],
    );

    let outcome = run_update(&feed, &LocalStorage::new(&path), UpdateOptions::default())
        .await
        .unwrap();

    let UpdateOutcome::Updated { document } = outcome else {
        panic!("expected an update");
    };
    assert_eq!(document.drawings.len(), 2);
    assert_eq!(feed.calls(), vec![None]);

    let saved: serde_json::Value = serde_json::from_str(&read(&path)).unwrap();
    assert_eq!(saved["modified"], "Sun, 25 Nov 2012 13:12:14 GMT");
    assert_eq!(saved["drawings"][0]["regular"][2], "29736314");
    assert_eq!(saved["drawings"][0]["additional"][0], "843");
    assert_eq!(saved["drawings"][1]["end"], "2013-01-01");
    assert_eq!(saved["drawings"][1]["grand"][0], "00000001");
}

#[tokio::test]
async fn bad_entry_aborts_without_writing() {
    let tmp = TempDir::new().unwrap();
    let path = write_db(&tmp, OLD_DB);
    let feed = StubFeed::new(
        "T1",
        vec![
            entry("101年09月、10", "<p>特獎：11661657</p>"),
            entry("101年07月、08", "<p>二獎：12345678</p>"),
        ],
    );

    let err = run_update(&feed, &LocalStorage::new(&path), UpdateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Entry { index: 1, .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(read(&path), OLD_DB);
}

#[tokio::test]
async fn malformed_label_aborts_without_writing() {
    let tmp = TempDir::new().unwrap();
    let path = write_db(&tmp, OLD_DB);
    let feed = StubFeed::new("T1", vec![entry("2012-09", "<p>特獎：11661657</p>")]);

    let err = run_update(&feed, &LocalStorage::new(&path), UpdateOptions::default())
        .await
        .unwrap_err();

    match err {
        AppError::Entry { source, .. } => {
            assert!(matches!(*source, AppError::MalformedLabel { .. }))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(read(&path), OLD_DB);
}

#[tokio::test]
async fn corrupt_database_stops_before_fetch() {
    let tmp = TempDir::new().unwrap();
    let path = write_db(&tmp, "{not json");
    let feed = StubFeed::new("T1", Vec::new());

    let err = run_update(&feed, &LocalStorage::new(&path), UpdateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CacheCorrupt { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(feed.calls().is_empty());
    assert_eq!(read(&path), "{not json");
}

#[tokio::test]
async fn feed_failure_leaves_database_untouched() {
    let tmp = TempDir::new().unwrap();
    let path = write_db(&tmp, OLD_DB);
    let feed = StubFeed::unavailable();

    let err = run_update(&feed, &LocalStorage::new(&path), UpdateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::FeedUnavailable { .. }));
    assert_eq!(read(&path), OLD_DB);
}

#[tokio::test]
async fn force_ignores_cached_token() {
    let tmp = TempDir::new().unwrap();
    let path = write_db(&tmp, r#"{"modified": "T1", "drawings": []}"#);
    let feed = StubFeed::new("T1", vec![entry("101年09月、10", "<p>特獎：11661657</p>")]);
    let options = UpdateOptions {
        force: true,
        ..UpdateOptions::default()
    };

    let outcome = run_update(&feed, &LocalStorage::new(&path), options)
        .await
        .unwrap();

    assert!(matches!(outcome, UpdateOutcome::Updated { .. }));
    assert_eq!(feed.calls(), vec![None]);
    assert!(read(&path).contains("11661657"));
}

#[tokio::test]
async fn dry_run_does_not_write() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("lottery.json");
    let feed = StubFeed::new("T1", vec![entry("101年09月、10", "<p>特獎：11661657</p>")]);
    let options = UpdateOptions {
        dry_run: true,
        ..UpdateOptions::default()
    };

    let outcome = run_update(&feed, &LocalStorage::new(&path), options)
        .await
        .unwrap();

    let UpdateOutcome::DryRun { document } = outcome else {
        panic!("expected a dry run");
    };
    assert_eq!(document.modified.as_deref(), Some("T1"));
    assert_eq!(document.drawings.len(), 1);
    assert!(!path.exists());
}
