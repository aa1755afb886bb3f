//! Integration tests for the harvester against mocked catalog and archive APIs.

use std::time::Duration;

use proceedings_core::harvest::{HarvestOptions, harvest};
use proceedings_core::{ArchiveClient, CatalogClient, HttpTimeouts, ProceedingsStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::start_mock_server_or_skip;

fn clients(server: &MockServer) -> (CatalogClient, ArchiveClient) {
    let catalog =
        CatalogClient::with_base_url(server.uri(), "ismir", HttpTimeouts::api_default()).unwrap();
    let archive = ArchiveClient::with_base_url(server.uri(), HttpTimeouts::api_default()).unwrap();
    (catalog, archive)
}

fn no_delay(years: std::ops::RangeInclusive<i32>) -> HarvestOptions {
    HarvestOptions {
        years,
        delay: Duration::ZERO,
    }
}

async fn mount_catalog_year(server: &MockServer, year: i32, hits: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/search/publ/api"))
        .and(query_param("q", format!("toc:db/conf/ismir/ismir{year}.bht:")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"hits": {"hit": hits}}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_harvest_writes_year_file_with_archival_fields() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    mount_catalog_year(
        &server,
        2020,
        json!([
            {"info": {
                "title": "Neural Music Generation with Transformers.",
                "authors": {"author": {"@pid": "1", "text": "Solo Author"}},
                "year": "2020",
                "ee": "https://doi.org/10.5281/zenodo.4245",
                "key": "conf/ismir/Solo20"
            }},
            {"info": {
                "title": "A Survey of Rhythm Perception.",
                "authors": {"author": [
                    {"@pid": "2", "text": "First Writer"},
                    {"@pid": "3", "text": "Second Writer"}
                ]},
                "year": "2020",
                "ee": ["https://example.org/a", "https://example.org/b"]
            }}
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/api/records"))
        .and(query_param("q", "Neural Music Generation with Transformers."))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": {"hits": [{
                "id": 4245,
                "doi": "10.5281/zenodo.4245",
                "metadata": {
                    "title": "Neural Music Generation with Transformers",
                    "description": "<p>We generate music.</p>"
                }
            }]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/records"))
        .and(query_param("q", "A Survey of Rhythm Perception."))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": {"hits": []}})))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let store = ProceedingsStore::new(temp.path().join("proceedings"));
    let (catalog, archive) = clients(&server);

    let report = harvest(&catalog, &archive, &store, &no_delay(2020..=2020))
        .await
        .unwrap();
    assert_eq!(report.years_written, vec![2020]);
    assert_eq!(report.records, 2);
    assert_eq!(report.archive_matches, 1);

    let records = store.load(2020).unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.author, vec!["Solo Author".to_string()]);
    assert_eq!(first.year, Some(2020));
    assert_eq!(first.doi.as_deref(), Some("10.5281/zenodo.4245"));
    assert_eq!(first.url.as_deref(), Some("https://doi.org/10.5281/zenodo.4245"));
    assert_eq!(first.zenodo_id.as_deref(), Some("4245"));
    assert_eq!(first.abstract_text(), "<p>We generate music.</p>");
    assert_eq!(first.dblp_key.as_deref(), Some("conf/ismir/Solo20"));

    let second = &records[1];
    assert_eq!(
        second.author,
        vec!["First Writer".to_string(), "Second Writer".to_string()]
    );
    assert_eq!(second.ee.as_deref(), Some("https://example.org/a"));
    assert!(second.doi.is_none());
    assert!(second.url.is_none());
    assert!(second.zenodo_id.is_none());
    assert!(second.r#abstract.is_none());
    assert!(second.dblp_key.is_none());

    let raw = std::fs::read_to_string(store.year_path(2020)).unwrap();
    assert!(raw.contains("\"zenodo_id\": null"), "absent values are written as null");
    assert!(raw.contains("\"dblp_key\": null"), "a hit without a key is written as null");
}

#[tokio::test]
async fn test_harvest_skips_year_when_catalog_fails() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/search/publ/api"))
        .and(query_param("q", "toc:db/conf/ismir/ismir2001.bht:"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_catalog_year(
        &server,
        2002,
        json!([{"info": {"title": "Only Paper", "year": "2002", "key": "k"}}]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/records"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": {"hits": []}})))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let store = ProceedingsStore::new(temp.path());
    let (catalog, archive) = clients(&server);

    let report = harvest(&catalog, &archive, &store, &no_delay(2001..=2002))
        .await
        .unwrap();
    assert_eq!(report.years_failed, vec![2001]);
    assert_eq!(report.years_written, vec![2002]);
    assert!(!store.year_path(2001).exists());
    assert_eq!(store.load(2002).unwrap()[0].title, "Only Paper");
}

#[tokio::test]
async fn test_harvest_archive_error_is_treated_as_no_match() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    mount_catalog_year(
        &server,
        2010,
        json!([{"info": {"title": "Unlucky Paper", "year": 2010, "key": "k"}}]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/records"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let store = ProceedingsStore::new(temp.path());
    let (catalog, archive) = clients(&server);

    let report = harvest(&catalog, &archive, &store, &no_delay(2010..=2010))
        .await
        .unwrap();
    assert_eq!(report.archive_failures, 1);
    assert_eq!(report.archive_matches, 0);

    let record = &store.load(2010).unwrap()[0];
    assert!(record.doi.is_none());
    assert!(record.zenodo_id.is_none());
    assert!(record.r#abstract.is_none());
    assert!(record.author.is_empty());
}

#[tokio::test]
async fn test_harvest_overwrites_existing_year_file() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    mount_catalog_year(&server, 2015, json!([])).await;

    let temp = TempDir::new().unwrap();
    let store = ProceedingsStore::new(temp.path());
    store
        .save(2015, &[support::record("Stale", None)])
        .unwrap();
    let (catalog, archive) = clients(&server);

    harvest(&catalog, &archive, &store, &no_delay(2015..=2015))
        .await
        .unwrap();
    assert!(store.load(2015).unwrap().is_empty());
}
