//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and run full
//! discovery, enrichment and CSV output end-to-end.

use listing_harvester::config::Config;
use listing_harvester::crawler::{harvest, Coordinator, HttpFetcher, NoDelay};
use listing_harvester::output::save_csv;
use listing_harvester::HarvestError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration without delays between requests
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.crawler.index_delay_ms = 0;
    config.crawler.detail_delay_ms = 0;
    config
}

fn index_body(base_url: &str, ids: &[u32]) -> String {
    let entries: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<div class="listing"><a href="{}/cars/{}.html"><h3>Toyota Camry #{}</h3></a></div>"#,
                base_url, id, id
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", entries)
}

fn detail_body(id: u32, rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(k, v)| format!("<tr><th>{}</th><td>{}</td></tr>", k, v))
        .collect();
    format!(
        r#"<html><body>
        <h1><span>Продажа Toyota Camry #{}</span></h1>
        <div class="wb9m8q0">{}&nbsp;000&nbsp;₽</div>
        <table>{}</table>
        <div class="css-pxeubi evnwjo70">Опубликовано: 0{}.03.2021 в Москве</div>
        </body></html>"#,
        id, id, rows, id
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_two_index_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/cars/page1/", index_body(&base_url, &[1, 2])).await;
    mount_html(&mock_server, "/cars/page2/", index_body(&base_url, &[])).await;
    mount_html(
        &mock_server,
        "/cars/1.html",
        detail_body(1, &[("Двигатель", "бензин,&nbsp;2.5&nbsp;л"), ("Пробег", "54 000 км")]),
    )
    .await;
    mount_html(
        &mock_server,
        "/cars/2.html",
        detail_body(2, &[("Двигатель", "гибрид"), ("Цвет", "белый")]),
    )
    .await;

    let config = create_test_config();
    let (records, stats) = harvest(&config, &format!("{}/cars", base_url))
        .await
        .expect("Harvest failed");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("title"), Some("Toyota Camry #1"));
    assert_eq!(records[0].get("Двигатель"), Some("бензин, 2.5 л"));
    assert_eq!(records[0].get("price"), Some("1 000 ₽"));
    assert_eq!(records[0].get("publication_date"), Some("01.03.2021"));
    assert_eq!(records[1].get("Цвет"), Some("белый"));
    assert_eq!(records[1].get("Пробег"), None);
    assert_eq!(stats.index_pages_fetched, 2);
    assert_eq!(stats.detail_pages_fetched, 2);

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let save_file = dir.path().join("cars.csv");
    save_csv(&save_file, &config.output, &records).expect("Failed to write CSV");

    let mut reader = csv::Reader::from_path(&save_file).expect("Failed to open output");
    let header: Vec<String> = reader
        .headers()
        .expect("Missing header")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(
        header,
        vec![
            "",
            "title",
            "link",
            "Двигатель",
            "Пробег",
            "page_title",
            "price",
            "publication_date",
            "Цвет"
        ]
    );

    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.expect("Bad row").iter().map(str::to_string).collect())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "0");
    assert_eq!(rows[1][0], "1");
    assert_eq!(rows[1][4], "", "missing key should be an empty cell");
    assert_eq!(rows[0][8], "");
}

#[tokio::test]
async fn test_page_bound_is_exclusive() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/cars/page1/", index_body(&base_url, &[1])).await;
    mount_html(&mock_server, "/cars/page2/", index_body(&base_url, &[2])).await;
    Mock::given(method("GET"))
        .and(path("/cars/page3/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_body(&base_url, &[3])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)
        .expect("Failed to build fetcher");
    let mut coordinator =
        Coordinator::new(fetcher, &config, NoDelay, NoDelay).expect("Failed to create coordinator");

    let stubs = coordinator
        .discover_all(&format!("{}/cars/", base_url), 3)
        .await
        .expect("Discovery failed");

    assert_eq!(stubs.len(), 2);
    assert_eq!(stubs[0].link, format!("{}/cars/1.html", base_url));
    assert_eq!(stubs[1].link, format!("{}/cars/2.html", base_url));
}

#[tokio::test]
async fn test_broken_detail_link_aborts_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/cars/page1/", index_body(&base_url, &[1, 2])).await;
    mount_html(&mock_server, "/cars/page2/", index_body(&base_url, &[])).await;
    mount_html(&mock_server, "/cars/1.html", detail_body(1, &[("Цвет", "белый")])).await;
    Mock::given(method("GET"))
        .and(path("/cars/2.html"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let result = harvest(&config, &format!("{}/cars", base_url)).await;

    match result {
        Err(HarvestError::Fetch { url, status }) => {
            assert_eq!(status, 410);
            assert!(url.ends_with("/cars/2.html"));
        }
        other => panic!("Expected fetch error, got {:?}", other.map(|(r, _)| r.len())),
    }
}

#[tokio::test]
async fn test_index_server_error_aborts_discovery() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cars/page1/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let result = harvest(&config, &format!("{}/cars", mock_server.uri())).await;

    assert!(matches!(
        result,
        Err(HarvestError::Fetch { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_empty_first_page_yields_no_records() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/cars/page1/", index_body(&base_url, &[])).await;

    let config = create_test_config();
    let (records, stats) = harvest(&config, &format!("{}/cars", base_url))
        .await
        .expect("Harvest failed");

    assert!(records.is_empty());
    assert_eq!(stats.index_pages_fetched, 1);
    assert_eq!(stats.detail_pages_fetched, 0);
}
