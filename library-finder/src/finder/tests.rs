//! Unit tests for the resolution pipeline.

use super::*;
use crate::domain::Coordinate;
use crate::postcodes::GeocodeError;
use crate::wikidata::{SourceError, SourceLibrary};
use async_trait::async_trait;
use chrono::Days;
use std::sync::atomic::{AtomicUsize, Ordering};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

fn names(libraries: &[Library]) -> Vec<&str> {
    libraries.iter().map(|l| l.name.as_str()).collect()
}

/// Source that serves a fixed list, or fails, and counts fetches.
struct FakeSource {
    libraries: Vec<SourceLibrary>,
    fail: bool,
    fetches: AtomicUsize,
}

impl FakeSource {
    fn serving(libraries: Vec<SourceLibrary>) -> Arc<Self> {
        Arc::new(Self {
            libraries,
            fail: false,
            fetches: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            libraries: Vec::new(),
            fail: true,
            fetches: AtomicUsize::new(0),
        })
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LibrarySource for FakeSource {
    async fn fetch_libraries(&self) -> Result<Vec<SourceLibrary>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::Api {
                status: 502,
                message: "Bad Gateway".into(),
            });
        }
        Ok(self.libraries.clone())
    }
}

/// Geocoder that knows a single postcode and counts every call.
#[derive(Default)]
struct FakeGeocoder {
    calls: AtomicUsize,
    unreachable: bool,
}

impl FakeGeocoder {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn is_valid(&self, postcode: &Postcode) -> Result<bool, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(GeocodeError::Json {
                message: "unexpected end of input".into(),
            });
        }
        Ok(postcode.compact() == "SW1A1AA")
    }

    async fn locate(&self, postcode: &Postcode) -> Result<Coordinate, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if postcode.compact() == "SW1A1AA" {
            Ok(at(51.501, -0.141))
        } else {
            Err(GeocodeError::Rejected { status: 404 })
        }
    }
}

fn sample_source() -> Vec<SourceLibrary> {
    vec![
        SourceLibrary::new("A", at(51.5, -0.1)),
        SourceLibrary::new("B", at(51.6, -0.2)),
        SourceLibrary::new("C", at(52.0, 0.0)),
        SourceLibrary::new("Closed", at(51.5, -0.1)).time_bounded(),
        SourceLibrary::new("Nowhere", Coordinate::UNKNOWN),
    ]
}

fn finder_with(source: Arc<FakeSource>, geocoder: Arc<FakeGeocoder>) -> LibraryFinder {
    LibraryFinder::new(
        LibraryStore::open_in_memory().unwrap(),
        source,
        geocoder,
        FinderConfig::default(),
    )
}

#[tokio::test]
async fn first_request_fills_cache_and_ranks() {
    let source = FakeSource::serving(sample_source());
    let finder = finder_with(source.clone(), Arc::default());

    let result = finder
        .resolve_nearest_on(at(51.5, -0.1), 2, date(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(names(&result), vec!["A", "B"]);
    assert_eq!(source.fetches(), 1);
}

#[tokio::test]
async fn fresh_cache_is_not_refetched() {
    let source = FakeSource::serving(sample_source());
    let finder = finder_with(source.clone(), Arc::default());
    let day = date(2024, 3, 15);

    finder.resolve_nearest_on(at(51.5, -0.1), 1, day).await.unwrap();
    finder
        .resolve_nearest_on(at(51.5, -0.1), 1, day + Days::new(180))
        .await
        .unwrap();

    assert_eq!(source.fetches(), 1);
}

#[tokio::test]
async fn stale_cache_is_refetched() {
    let source = FakeSource::serving(sample_source());
    let finder = finder_with(source.clone(), Arc::default());
    let day = date(2024, 3, 15);

    finder.resolve_nearest_on(at(51.5, -0.1), 1, day).await.unwrap();
    finder
        .resolve_nearest_on(at(51.5, -0.1), 1, day + Days::new(181))
        .await
        .unwrap();

    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn failed_refresh_serves_stale_data() {
    let store = LibraryStore::open_in_memory().unwrap();
    store
        .replace_all(
            &[
                Library::new("Old A", at(51.5, -0.1)),
                Library::new("Old B", at(53.0, -2.0)),
            ],
            date(2020, 1, 1),
        )
        .unwrap();

    let source = FakeSource::failing();
    let finder = LibraryFinder::new(
        store,
        source.clone(),
        Arc::new(FakeGeocoder::default()),
        FinderConfig::default(),
    );

    let result = finder
        .resolve_nearest_on(at(51.5, -0.1), 1, date(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(names(&result), vec!["Old A"]);
    assert_eq!(source.fetches(), 1);

    // The stamp is untouched, so the cache is still stale
    let status = finder.status_on(date(2024, 3, 15)).unwrap();
    assert_eq!(status.last_refreshed_on, Some(date(2020, 1, 1)));
    assert!(status.stale);
}

#[tokio::test]
async fn failed_refresh_with_empty_cache_is_no_data() {
    let finder = finder_with(FakeSource::failing(), Arc::default());

    let result = finder
        .resolve_nearest_on(at(51.5, -0.1), 3, date(2024, 3, 15))
        .await;

    assert!(matches!(result, Err(FindError::NoData(RefreshError::Source(_)))));
}

#[tokio::test]
async fn empty_source_gives_empty_result() {
    let finder = finder_with(FakeSource::serving(Vec::new()), Arc::default());

    let result = finder
        .resolve_nearest_on(at(51.5, -0.1), 3, date(2024, 3, 15))
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn zero_count_is_empty() {
    let finder = finder_with(FakeSource::serving(sample_source()), Arc::default());

    let result = finder
        .resolve_nearest_on(at(51.5, -0.1), 0, date(2024, 3, 15))
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn refresh_if_stale_reports_outcome() {
    let finder = finder_with(FakeSource::serving(sample_source()), Arc::default());
    let day = date(2024, 3, 15);

    match finder.refresh_if_stale_on(day).await.unwrap() {
        Freshness::Refreshed(report) => {
            assert_eq!(report.fetched, 5);
            assert_eq!(report.stored, 3);
        }
        other => panic!("expected a refresh, got {other:?}"),
    }

    assert!(matches!(
        finder.refresh_if_stale_on(day).await.unwrap(),
        Freshness::Fresh
    ));
}

#[tokio::test]
async fn refresh_if_stale_degrades_on_failure() {
    let finder = finder_with(FakeSource::failing(), Arc::default());

    assert!(matches!(
        finder.refresh_if_stale_on(date(2024, 3, 15)).await.unwrap(),
        Freshness::Degraded(_)
    ));
}

#[tokio::test]
async fn force_refresh_ignores_age() {
    let source = FakeSource::serving(sample_source());
    let finder = finder_with(source.clone(), Arc::default());
    let day = date(2024, 3, 15);

    finder.force_refresh_on(day).await.unwrap();
    finder.force_refresh_on(day).await.unwrap();

    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn concurrent_requests_refresh_once() {
    let source = FakeSource::serving(sample_source());
    let finder = Arc::new(finder_with(source.clone(), Arc::default()));
    let day = date(2024, 3, 15);

    let (a, b) = tokio::join!(
        finder.resolve_nearest_on(at(51.5, -0.1), 1, day),
        finder.resolve_nearest_on(at(52.0, 0.0), 1, day),
    );

    assert_eq!(names(&a.unwrap()), vec!["A"]);
    assert_eq!(names(&b.unwrap()), vec!["C"]);
    assert_eq!(source.fetches(), 1);
}

#[tokio::test]
async fn status_reports_cache_state() {
    let finder = finder_with(FakeSource::serving(sample_source()), Arc::default());
    let day = date(2024, 3, 15);

    let before = finder.status_on(day).unwrap();
    assert_eq!(
        before,
        CacheStatus {
            library_count: 0,
            last_refreshed_on: None,
            stale: true,
        }
    );

    finder.force_refresh_on(day).await.unwrap();

    let after = finder.status_on(day).unwrap();
    assert_eq!(
        after,
        CacheStatus {
            library_count: 3,
            last_refreshed_on: Some(day),
            stale: false,
        }
    );
}

#[tokio::test]
async fn resolve_postcode_end_to_end() {
    let geocoder = Arc::new(FakeGeocoder::default());
    let finder = finder_with(FakeSource::serving(sample_source()), geocoder.clone());

    let found = finder
        .resolve_postcode_on("sw1a 1aa", 2, date(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(found.postcode.as_str(), "SW1A 1AA");
    assert_eq!(found.location, at(51.501, -0.141));
    assert_eq!(names(&found.libraries), vec!["A", "B"]);
    assert_eq!(geocoder.calls(), 2);
}

#[tokio::test]
async fn malformed_postcode_never_reaches_geocoder() {
    let geocoder = Arc::new(FakeGeocoder::default());
    let source = FakeSource::serving(sample_source());
    let finder = finder_with(source.clone(), geocoder.clone());

    let result = finder.resolve_postcode_on("ZZ", 2, date(2024, 3, 15)).await;

    assert!(matches!(result, Err(FindError::InvalidInput(_))));
    assert_eq!(geocoder.calls(), 0);
    assert_eq!(source.fetches(), 0);
}

#[tokio::test]
async fn unknown_postcode_is_invalid_input() {
    let geocoder = Arc::new(FakeGeocoder::default());
    let finder = finder_with(FakeSource::serving(sample_source()), geocoder.clone());

    let result = finder.resolve_postcode_on("M1 1AE", 2, date(2024, 3, 15)).await;

    match result {
        Err(FindError::InvalidInput(message)) => assert_eq!(message, "Invalid postcode: M1 1AE"),
        other => panic!("expected invalid input, got {other:?}"),
    }
    // Validation failed, so no lookup was attempted
    assert_eq!(geocoder.calls(), 1);
}

#[tokio::test]
async fn geocoder_failure_is_surfaced() {
    let geocoder = Arc::new(FakeGeocoder {
        unreachable: true,
        ..Default::default()
    });
    let finder = finder_with(FakeSource::serving(sample_source()), geocoder);

    let result = finder
        .resolve_postcode_on("SW1A 1AA", 2, date(2024, 3, 15))
        .await;

    assert!(matches!(result, Err(FindError::Geocode(_))));
}

#[tokio::test]
async fn unreadable_refresh_date_triggers_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let config = crate::store::StoreConfig::new(dir.path().join("library.db"));
    let store = LibraryStore::open(&config).unwrap();
    store
        .replace_all(&[Library::new("Old", at(53.0, -2.0))], date(2024, 3, 1))
        .unwrap();

    // Corrupt the stamp behind the store's back
    let conn = rusqlite::Connection::open(&config.path).unwrap();
    conn.execute(
        "UPDATE cache_metadata SET value = 'garbage' WHERE key = 'last_refreshed_on'",
        [],
    )
    .unwrap();
    drop(conn);

    let source = FakeSource::serving(sample_source());
    let finder = LibraryFinder::new(
        store,
        source.clone(),
        Arc::new(FakeGeocoder::default()),
        FinderConfig::default(),
    );
    let day = date(2024, 3, 15);

    assert!(finder.status_on(day).unwrap().stale);

    let result = finder.resolve_nearest_on(at(51.5, -0.1), 1, day).await.unwrap();

    assert_eq!(names(&result), vec!["A"]);
    assert_eq!(source.fetches(), 1);
    assert_eq!(finder.status_on(day).unwrap().last_refreshed_on, Some(day));
}
