//! Integration tests for the scraper
//!
//! These tests use wiremock to stand in for the portal and run the full
//! listing → detail → cache cycle end-to-end.

use bolig_scrape::config::{CacheConfig, Config, HttpConfig, SiteConfig};
use bolig_scrape::crawler::{HttpFetcher, Scraper};
use bolig_scrape::ScrapeError;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders a listing page using the portal's markup
fn listing_html(hrefs: &[&str], pages: &[&str]) -> String {
    let cards: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<a class="AdCardSrp__Link css-1jlpfr4" href="{}">Lejlighed</a>"#,
                href
            )
        })
        .collect();
    let pager: String = pages
        .iter()
        .map(|p| format!(r#"<span class="css-176v3d">{}</span>"#, p))
        .collect();
    format!(
        "<html><body><div>{}</div><nav>{}</nav></body></html>",
        cards, pager
    )
}

/// Renders a detail page using the portal's markup
fn detail_html(pairs: &[(&str, &str)]) -> String {
    let rows: String = pairs
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<div><span class="css-1td16zm">{}</span><span class="css-1f8murc">{}</span></div>"#,
                label, value
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", rows)
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            city: "aarhus".to_string(),
            ..SiteConfig::default()
        },
        http: HttpConfig {
            request_timeout_secs: 5,
            backoff_base_ms: 10, // Very short for testing
            ..HttpConfig::default()
        },
        cache: CacheConfig {
            links_path: dir.path().join("data").join("apartment_links.json"),
            details_path: dir.path().join("data").join("apartmentdetails.json"),
        },
        ..Config::default()
    }
}

fn create_scraper(config: Config) -> Scraper<HttpFetcher> {
    Scraper::from_config(config).expect("Failed to create scraper")
}

/// Mounts a two-page listing for aarhus with four distinct apartments
///
/// Apartment 4 always answers 500.
async fn mount_portal(mock_server: &MockServer) {
    // Offset pages first so they win over the bare listing path
    Mock::given(method("GET"))
        .and(path("/lejligheder/aarhus/"))
        .and(query_param("offset", "18"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(
            &["/lejlighed/aarhus/3", "/lejlighed/aarhus/1", "/lejlighed/aarhus/4"],
            &["1", "2", "Næste"],
        )))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lejligheder/aarhus/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(
            &["/lejlighed/aarhus/1", "/lejlighed/aarhus/2"],
            &["1", "2", "Næste"],
        )))
        .mount(mock_server)
        .await;

    for (id, rent) in [("1", "7.500 kr."), ("2", "9.250 kr."), ("3", "11.000 kr.")] {
        Mock::given(method("GET"))
            .and(path(format!("/lejlighed/aarhus/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_html(&[
                ("Månedlig leje", rent),
                ("Størrelse", "72 m²"),
                ("Værelser", "3"),
            ])))
            .mount(mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/lejlighed/aarhus/4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(mock_server)
        .await;
}

async fn request_count(mock_server: &MockServer) -> usize {
    mock_server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .len()
}

#[tokio::test]
async fn test_full_scrape_writes_both_caches() {
    let mock_server = MockServer::start().await;
    mount_portal(&mock_server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &dir);
    let links_path = config.cache.links_path.clone();
    let details_path = config.cache.details_path.clone();
    let scraper = create_scraper(config);

    let records = scraper
        .apartment_details(true, true)
        .await
        .expect("Scrape failed");

    // Four unique links, one of which fails every attempt
    assert_eq!(records.len(), 3);
    let urls: Vec<String> = records
        .iter()
        .map(|r| r.url().expect("Record has url").to_string())
        .collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/lejlighed/aarhus/1", mock_server.uri()),
            format!("{}/lejlighed/aarhus/2", mock_server.uri()),
            format!("{}/lejlighed/aarhus/3", mock_server.uri()),
        ]
    );
    assert_eq!(records[1].get("Månedlig leje"), Some("9.250 kr."));

    // Link cache keeps page order and duplicates
    let links: Vec<String> =
        serde_json::from_str(&std::fs::read_to_string(&links_path).expect("No link cache"))
            .expect("Link cache is not JSON");
    assert_eq!(links.len(), 5);

    // Detail cache is pretty-printed UTF-8
    let details = std::fs::read_to_string(&details_path).expect("No detail cache");
    assert!(details.starts_with("[\n  {\n    \"Månedlig leje\""));
    assert!(details.contains("72 m²"));

    // Each unique detail page once, except the failing one which is retried
    let requests = mock_server.received_requests().await.expect("Recording");
    let detail_hits = |suffix: &str| {
        requests
            .iter()
            .filter(|r| r.url.path() == format!("/lejlighed/aarhus/{}", suffix))
            .count()
    };
    assert_eq!(detail_hits("1"), 1);
    assert_eq!(detail_hits("4"), 3);
}

#[tokio::test]
async fn test_cached_scrape_performs_no_requests() {
    let mock_server = MockServer::start().await;
    mount_portal(&mock_server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &dir);
    let details_path = config.cache.details_path.clone();
    let scraper = create_scraper(config);

    let first = scraper
        .apartment_details(false, false)
        .await
        .expect("First scrape failed");
    let bytes_after_first = std::fs::read(&details_path).expect("No detail cache");
    let requests_after_first = request_count(&mock_server).await;

    let second = scraper
        .apartment_details(false, false)
        .await
        .expect("Cached read failed");

    assert_eq!(first, second);
    assert_eq!(
        std::fs::read(&details_path).expect("No detail cache"),
        bytes_after_first
    );
    assert_eq!(request_count(&mock_server).await, requests_after_first);
}

#[tokio::test]
async fn test_refresh_overwrites_detail_cache() {
    let mock_server = MockServer::start().await;
    mount_portal(&mock_server).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &dir);
    let details_path = config.cache.details_path.clone();

    std::fs::create_dir_all(details_path.parent().unwrap()).unwrap();
    std::fs::write(&details_path, r#"[{"url": "https://stale.example/1"}]"#).unwrap();

    let scraper = create_scraper(config);

    // Without refresh the stale cache is returned as-is
    let stale = scraper
        .apartment_details(false, false)
        .await
        .expect("Cached read failed");
    assert_eq!(stale.len(), 1);
    assert_eq!(request_count(&mock_server).await, 0);

    let fresh = scraper
        .apartment_details(true, false)
        .await
        .expect("Refresh failed");
    assert_eq!(fresh.len(), 3);

    let content = std::fs::read_to_string(&details_path).unwrap();
    assert!(!content.contains("stale.example"));
}

#[tokio::test]
async fn test_single_page_listing_has_no_offset_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lejligheder/aarhus/"))
        .and(query_param("offset", "18"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lejligheder/aarhus/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_html(&["/lejlighed/aarhus/9"], &["1"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let scraper = create_scraper(create_test_config(&mock_server.uri(), &dir));

    let links = scraper
        .collect_links("aarhus", "2-værelser")
        .await
        .expect("Link collection failed");

    assert_eq!(
        links,
        vec![format!("{}/lejlighed/aarhus/9", mock_server.uri())]
    );
}

#[tokio::test]
async fn test_missing_pager_aborts_without_writing_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lejligheder/aarhus/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_html(&["/lejlighed/aarhus/1"], &[])),
        )
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = create_test_config(&mock_server.uri(), &dir);
    let links_path = config.cache.links_path.clone();
    let details_path = config.cache.details_path.clone();
    let scraper = create_scraper(config);

    let result = scraper.apartment_details(true, true).await;

    assert!(matches!(result, Err(ScrapeError::Pagination { .. })));
    assert!(!links_path.exists());
    assert!(!details_path.exists());
}

#[tokio::test]
async fn test_unreachable_first_page_aborts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let scraper = create_scraper(create_test_config(&mock_server.uri(), &dir));

    let result = scraper.apartment_links(true).await;

    assert!(matches!(result, Err(ScrapeError::Fetch(_))));
    // Three attempts at the first page, nothing else
    assert_eq!(request_count(&mock_server).await, 3);
}
