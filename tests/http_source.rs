//! `HttpSource` against a mocked `/suppliers/{framework}` endpoint.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ccs_supplier_view::{DetailValue, HttpSource, SupplierSource, ViewError};

fn source(server: &MockServer) -> HttpSource {
    HttpSource::new(&server.uri(), Duration::from_secs(2)).expect("valid base url")
}

#[tokio::test]
async fn fetches_and_decodes_suppliers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/suppliers/RM6187"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Acme Ltd", "color": "green", "details": {"Buyer name": "Home Office", "Contract value": 1000}},
            {"name": "Beta plc", "color": "amber", "details": {}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let suppliers = source(&server).fetch("RM6187").await.unwrap();

    assert_eq!(suppliers.len(), 2);
    assert_eq!(suppliers[0].name, "Acme Ltd");
    assert_eq!(suppliers[0].details["Contract value"], DetailValue::Number(1000.0));
    assert_eq!(suppliers[1].color, "amber");
}

#[tokio::test]
async fn framework_is_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/suppliers/RM%206187%2FLot%202"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let suppliers = source(&server).fetch("RM 6187/Lot 2").await.unwrap();
    assert!(suppliers.is_empty());
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/suppliers/RM6187"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = source(&server).fetch("RM6187").await.unwrap_err();

    match err {
        ViewError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/suppliers/RM6187"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/suppliers/RM6187"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = source(&server).fetch("RM6187").await.unwrap_err();
    assert!(matches!(err, ViewError::Decode(_)));
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/suppliers/RM6187"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let source = HttpSource::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let err = source.fetch("RM6187").await.unwrap_err();

    assert!(matches!(err, ViewError::Http(e) if e.is_timeout()));
}
