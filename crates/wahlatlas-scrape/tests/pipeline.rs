// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use wahlatlas_model::{DistrictKey, StateKey, ABSENT_CELL};
use wahlatlas_scrape::{
    AcquireError, AcquireRequest, FetchError, PageFetcher, Pipeline, PipelineConfig,
};
use wahlatlas_store::ResultCache;

/// A Landtag-style result page carrying every widget the extractors know.
const FULL_PAGE: &str = "\
    <html><body>\
    <table class=\"tablesaw table-stimmen\"><tbody>\
      <tr><th>SPD</th><td>Erika Musterfrau</td><td>23.456</td><td>34,2 %</td>\
      <td></td><td></td><td>21.987</td><td>32,1 %</td></tr>\
      <tr><th>CDU</th><td>Max Muster</td><td>19.321</td><td>28,9 %</td>\
      <td></td><td></td><td>20.114</td><td>29,5 %</td></tr>\
    </tbody></table>\
    <table class=\"tablesaw\"><tbody>\
      <tr><td>Wahlberechtigte</td><td>231.456</td></tr>\
      <tr><td>Wahlbeteiligung</td><td>65,3 %</td></tr>\
    </tbody></table>\
    <div class=\"erststimmen-chart\" data-chartdata='{\"values\":[34.2,28.9]}'>\
      <svg><rect></rect></svg></div>\
    <div class=\"gewaehlter-direktbewerber\">\
      <span class=\"gewaehlter-direktbewerber__name\">Erika Musterfrau</span>\
      <span class=\"gewaehlter-direktbewerber__partei\">\
        <abbr title=\"Sozialdemokratische Partei Deutschlands\">SPD</abbr></span>\
      <span class=\"gewaehlter-direktbewerber__value\">34,2 %</span>\
      <span class=\"partei__farbe\" style=\"color: #E3000F\"></span>\
    </div>\
    <div class=\"erstunterlegener\">\
      <span class=\"erstunterlegener__name\">Max Muster</span>\
      <span class=\"erstunterlegener__partei\">\
        <abbr title=\"Christlich Demokratische Union\">CDU</abbr></span>\
      <span class=\"erstunterlegener__value\">28,9 %</span>\
      <span class=\"partei__farbe\" style=\"color: #000000\"></span>\
    </div>\
    <div class=\"js-d3chart\" data-chartdata='[60.1,65.3]'><svg><circle></circle></svg></div>\
    </body></html>";

/// Vote and statistics tables only; no charts, no candidate cards.
const SPARSE_PAGE: &str = "\
    <html><body>\
    <table class=\"tablesaw table-stimmen\"><tbody>\
      <tr><th>SPD</th><td>Erika Musterfrau</td><td>23.456</td><td>34,2 %</td>\
      <td></td><td></td><td>21.987</td><td>32,1 %</td></tr>\
    </tbody></table>\
    </body></html>";

const NRW_PAGE: &str = "\
    <html><body>\
    <h2 id=\"dieserWahlkreis\">Wahlkreis 15 - Duisburg I</h2>\
    <table><tbody>\
      <tr id=\"parteienErststimmeTable2\">\
        <td>35,1</td><td>28,4</td><td>5,2</td><td>8,1</td>\
        <td>14,9</td><td>2,7</td><td>5,6</td></tr>\
      <tr id=\"prozentWerteZweitstimmeTable\">\
        <td>Zweitstimmen</td>\
        <td>33,0</td><td>27,5</td><td>5,9</td><td>7,8</td>\
        <td>16,1</td><td>2,9</td><td>6,8</td></tr>\
    </tbody></table>\
    </body></html>";

const RLP_ASSET: &str =
    r#"{"wahlkreisName":"Wahlkreis 26 - Neuwied","CDU":"28,6","SPD":"35,0"}"#;

struct FixtureFetcher {
    body: String,
    fetches: AtomicUsize,
}

impl FixtureFetcher {
    fn new(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: body.to_string(),
            fetches: AtomicUsize::new(0),
        })
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

struct FailingFetcher {
    fetches: AtomicUsize,
}

#[async_trait]
impl PageFetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::with_status(503, format!("GET {url}")))
    }
}

fn pipeline_with(cache_dir: std::path::PathBuf, fetcher: Arc<dyn PageFetcher>) -> Pipeline {
    let config = PipelineConfig {
        cache_dir,
        poll_interval: Duration::from_millis(250),
    };
    Pipeline::new(config, fetcher)
}

fn request(state: StateKey, district: &str) -> AcquireRequest {
    AcquireRequest {
        state,
        district: district.to_string(),
        state_number: None,
        name: Some("Testkreis".to_string()),
    }
}

#[tokio::test]
async fn full_page_scrape_populates_every_field() {
    let dir = tempdir().expect("tempdir");
    let fetcher = FixtureFetcher::new(FULL_PAGE);
    let pipeline = pipeline_with(dir.path().to_path_buf(), fetcher.clone());

    let result = pipeline
        .acquire(&request(StateKey::Sh, "5"))
        .await
        .expect("acquire");

    assert_eq!(result.name.as_deref(), Some("Testkreis"));
    assert_eq!(result.table_data.len(), 2);
    assert_eq!(result.table_data[0].party, "SPD");
    assert_eq!(result.table_data[0].first_votes, "23.456");
    assert!(result
        .statistics_data
        .iter()
        .any(|item| item.label == "Wahlbeteiligung"));
    assert_eq!(result.voter_turnout.as_deref(), Some("65,3 %"));
    let elected = result.elected_data.expect("elected data");
    assert_eq!(
        elected.elected_person.expect("elected person").name,
        "Erika Musterfrau"
    );
    assert!(result.svg_data.expect("svg data").len() >= 1);
    assert!(result.svg_data_charts.expect("chart data").len() >= 2);
    assert!(result.voter_turnout_chart.is_some());
}

#[tokio::test]
async fn second_acquisition_hits_the_cache_without_a_new_session() {
    let dir = tempdir().expect("tempdir");
    let fetcher = FixtureFetcher::new(FULL_PAGE);
    let pipeline = pipeline_with(dir.path().to_path_buf(), fetcher.clone());
    let req = request(StateKey::Brandenburg, "21");

    let first = pipeline.acquire(&req).await.expect("first acquire");
    assert_eq!(fetcher.fetch_count(), 1);

    let second = pipeline.acquire(&req).await.expect("second acquire");
    assert_eq!(fetcher.fetch_count(), 1, "cache hit must not open a session");
    assert_eq!(first, second);

    let cache = ResultCache::new(dir.path());
    let key = DistrictKey::new(StateKey::Brandenburg, "21");
    assert!(cache.entry_path(&key).exists());
}

#[tokio::test(start_paused = true)]
async fn missing_widgets_do_not_fail_the_other_extractors() {
    let dir = tempdir().expect("tempdir");
    let fetcher = FixtureFetcher::new(SPARSE_PAGE);
    let pipeline = pipeline_with(dir.path().to_path_buf(), fetcher.clone());

    let result = pipeline
        .acquire(&request(StateKey::Sh, "7"))
        .await
        .expect("acquire");

    assert_eq!(result.table_data.len(), 1);
    assert_eq!(result.table_data[0].candidate, "Erika Musterfrau");
    assert!(!result.statistics_data.is_empty());
    assert_eq!(result.elected_data, None);
    assert_eq!(result.svg_data, None);
    assert_eq!(result.svg_data_charts, None);
    assert_eq!(result.voter_turnout_chart, None);
}

#[tokio::test]
async fn missing_state_number_fails_before_any_navigation() {
    let dir = tempdir().expect("tempdir");
    let fetcher = FixtureFetcher::new(FULL_PAGE);
    let pipeline = pipeline_with(dir.path().to_path_buf(), fetcher.clone());

    let err = pipeline
        .acquire(&request(StateKey::Bundestag, "61"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AcquireError::Resolve(_)));
    assert_eq!(fetcher.fetch_count(), 0, "no session may be opened");
}

#[tokio::test]
async fn navigation_failure_is_fatal_for_the_request() {
    let dir = tempdir().expect("tempdir");
    let fetcher = Arc::new(FailingFetcher {
        fetches: AtomicUsize::new(0),
    });
    let pipeline = pipeline_with(dir.path().to_path_buf(), fetcher.clone());

    let err = pipeline
        .acquire(&request(StateKey::Berlin, "3"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AcquireError::Navigation(_)));
    assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 1);

    let cache = ResultCache::new(dir.path());
    let key = DistrictKey::new(StateKey::Berlin, "3");
    assert!(!cache.entry_path(&key).exists(), "failures are never cached");
}

#[tokio::test]
async fn corrupt_cache_entry_surfaces_instead_of_rescraping() {
    let dir = tempdir().expect("tempdir");
    let fetcher = FixtureFetcher::new(FULL_PAGE);
    let pipeline = pipeline_with(dir.path().to_path_buf(), fetcher.clone());

    let key = DistrictKey::new(StateKey::Sh, "9");
    let cache = ResultCache::new(dir.path());
    std::fs::write(cache.entry_path(&key), b"{ not json").expect("seed corrupt entry");

    let err = pipeline
        .acquire(&request(StateKey::Sh, "9"))
        .await
        .expect_err("must fail");
    assert!(matches!(err, AcquireError::Cache(_)));
    assert_eq!(fetcher.fetch_count(), 0, "corruption must not trigger a scrape");
}

#[tokio::test]
async fn cache_write_failure_still_serves_the_fresh_result() {
    let dir = tempdir().expect("tempdir");
    let blocker = dir.path().join("occupied");
    std::fs::write(&blocker, b"file, not a directory").expect("seed blocker");

    let fetcher = FixtureFetcher::new(FULL_PAGE);
    let pipeline = pipeline_with(blocker, fetcher.clone());

    let result = pipeline
        .acquire(&request(StateKey::Sh, "5"))
        .await
        .expect("acquire despite unwritable cache");
    assert_eq!(result.table_data.len(), 2);
}

#[tokio::test]
async fn concurrent_identical_requests_share_one_scrape() {
    let dir = tempdir().expect("tempdir");
    let fetcher = FixtureFetcher::new(FULL_PAGE);
    let pipeline = Arc::new(pipeline_with(dir.path().to_path_buf(), fetcher.clone()));
    let req = request(StateKey::Sh, "5");

    let (a, b) = tokio::join!(pipeline.acquire(&req), pipeline.acquire(&req));
    assert_eq!(a.expect("first"), b.expect("second"));
    assert_eq!(fetcher.fetch_count(), 1, "duplicate scrapes must coalesce");
}

#[tokio::test]
async fn nrw_requests_bypass_the_cache_and_map_shares_to_rows() {
    let dir = tempdir().expect("tempdir");
    let fetcher = FixtureFetcher::new(NRW_PAGE);
    let pipeline = pipeline_with(dir.path().to_path_buf(), fetcher.clone());
    let req = AcquireRequest {
        state: StateKey::Nrw,
        district: "015".to_string(),
        state_number: None,
        name: None,
    };

    let result = pipeline.acquire(&req).await.expect("acquire");
    assert_eq!(result.name.as_deref(), Some("Wahlkreis 15 - Duisburg I"));
    assert_eq!(result.table_data.len(), 7);
    assert_eq!(result.table_data[0].party, "CDU");
    assert_eq!(result.table_data[0].first_vote_percentage, "35,1");
    assert_eq!(result.table_data[0].second_vote_percentage, "33,0");
    assert_eq!(result.table_data[0].candidate, ABSENT_CELL);

    pipeline.acquire(&req).await.expect("second acquire");
    assert_eq!(fetcher.fetch_count(), 2, "live page is never cached");

    let cache = ResultCache::new(dir.path());
    let key = DistrictKey::new(StateKey::Nrw, "015");
    assert!(!cache.entry_path(&key).exists());
}

#[tokio::test]
async fn rlp_asset_flattens_into_statistics() {
    let dir = tempdir().expect("tempdir");
    let fetcher = FixtureFetcher::new(RLP_ASSET);
    let pipeline = pipeline_with(dir.path().to_path_buf(), fetcher.clone());
    let req = AcquireRequest {
        state: StateKey::Rlp,
        district: "26".to_string(),
        state_number: None,
        name: None,
    };

    let result = pipeline.acquire(&req).await.expect("acquire");
    assert_eq!(result.name.as_deref(), Some("Wahlkreis 26 - Neuwied"));
    assert_eq!(result.statistics_data.len(), 2);
    assert!(result.table_data.is_empty());
    assert_eq!(result.elected_data, None);
}
