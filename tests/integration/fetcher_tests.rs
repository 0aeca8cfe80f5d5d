//! Request-layer tests: endpoint routing, retries and anti-bot handling

use crate::common::{quick_policy, registry_config, test_fetcher};
use dapo_harvest::crawler::{Backoff, Fetcher, RegistryQuery, RetryPolicy};
use dapo_harvest::HarvestError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_html_body_is_retried_until_json_arrives() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rekap/dataSekolah"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<!DOCTYPE html><html>Checking your browser</html>"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rekap/dataSekolah"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"nama": "Prov. Bali"}])))
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server);
    let payload = fetcher.fetch_structured(&RegistryQuery::root()).await.unwrap();

    assert_eq!(payload[0]["nama"], "Prov. Bali");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rekap/sekolahDetail"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rekap/sekolahDetail"))
        .and(query_param("sekolah_id", "QUJD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"rombel": 6}])))
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server);
    let payload = fetcher
        .fetch_structured(&RegistryQuery::school_detail("QUJD"))
        .await
        .unwrap();

    assert_eq!(payload[0]["rombel"], 6);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_bounded_policy_gives_up() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server);
    let result = fetcher.fetch_structured(&RegistryQuery::root()).await;

    match result {
        Err(HarvestError::RetriesExhausted {
            attempts,
            last_error,
            ..
        }) => {
            assert_eq!(attempts, 3);
            assert!(last_error.starts_with("invalid JSON"));
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_single_attempt_policy_does_not_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let policy = RetryPolicy::bounded(1, Backoff::Fixed(Duration::from_millis(1)));
    let fetcher = Fetcher::new(&registry_config(&server), policy).unwrap();

    assert!(fetcher.fetch_structured(&RegistryQuery::root()).await.is_err());
}

#[tokio::test]
async fn test_district_query_uses_progress_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rekap/progresSP"))
        .and(query_param("id_level_wilayah", "3"))
        .and(query_param("kode_wilayah", "026001"))
        .and(query_param("semester_id", "20251"))
        .and(query_param("bentuk_pendidikan_id", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server);
    let payload = fetcher
        .fetch_structured(&RegistryQuery::new(3, "026001", None))
        .await
        .unwrap();

    assert_eq!(payload, json!([]));
}

#[tokio::test]
async fn test_documents_are_returned_verbatim() {
    let server = MockServer::start().await;
    let page = "<!DOCTYPE html><html><div id=\"profil\"></div></html>";

    Mock::given(method("GET"))
        .and(path("/sekolah/QUJD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&registry_config(&server), quick_policy()).unwrap();
    let url = format!("{}/sekolah/QUJD", server.uri());

    assert_eq!(fetcher.fetch_document(&url).await.unwrap(), page);
}
