use super::*;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode as AxumStatus, routing::post, Json, Router};
use shared::{
    domain::DistrictNumber,
    error::{ADDRESS_NOT_FOUND_MESSAGE, EMPTY_ADDRESS_MESSAGE, TRANSPORT_FAILURE_MESSAGE},
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct LookupServerState {
    status: AxumStatus,
    body: String,
    requests: Arc<Mutex<Vec<LookupRequest>>>,
}

async fn handle_lookup(
    State(state): State<LookupServerState>,
    Json(request): Json<LookupRequest>,
) -> (AxumStatus, String) {
    state.requests.lock().await.push(request);
    (state.status, state.body.clone())
}

async fn spawn_lookup_server(
    status: AxumStatus,
    body: &str,
) -> anyhow::Result<(String, Arc<Mutex<Vec<LookupRequest>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = LookupServerState {
        status,
        body: body.to_string(),
        requests: Arc::clone(&requests),
    };
    let app = Router::new()
        .route("/api/reps/lookup/", post(handle_lookup))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), requests))
}

const BROAD_ST_RESPONSE: &str = r#"{
    "success": true,
    "data": {
        "district": {"number": 7, "name": "District 7"},
        "representatives": [{"name": "Jane Doe", "role": "Councilmember"}]
    }
}"#;

#[tokio::test]
async fn successful_lookup_returns_district_and_representatives() {
    let (server_url, requests) = spawn_lookup_server(AxumStatus::OK, BROAD_ST_RESPONSE)
        .await
        .expect("spawn server");
    let client = LookupClient::new(&server_url).expect("client");

    let data = client
        .lookup("  400 Broad St, Seattle, WA  ")
        .await
        .expect("lookup succeeds");

    assert_eq!(data.district.number, DistrictNumber::Integer(7));
    assert_eq!(data.district.name, "District 7");
    assert_eq!(data.representatives.len(), 1);
    assert_eq!(data.representatives[0].name, "Jane Doe");

    let requests = requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].address, "400 Broad St, Seattle, WA");
}

#[tokio::test]
async fn blank_address_never_reaches_the_server() {
    let (server_url, requests) = spawn_lookup_server(AxumStatus::OK, BROAD_ST_RESPONSE)
        .await
        .expect("spawn server");
    let client = LookupClient::new(&server_url).expect("client");

    for address in ["", "   ", "\t\n"] {
        let err = client.lookup(address).await.expect_err("blank address");
        assert_eq!(err, LookupError::EmptyAddress);
        assert_eq!(err.to_string(), EMPTY_ADDRESS_MESSAGE);
    }

    assert!(requests.lock().await.is_empty());
}

#[tokio::test]
async fn failure_envelope_without_message_falls_back_to_not_found() {
    let (server_url, _) = spawn_lookup_server(AxumStatus::OK, r#"{"success":false}"#)
        .await
        .expect("spawn server");
    let client = LookupClient::new(&server_url).expect("client");

    let err = client.lookup("1 Nowhere Rd").await.expect_err("rejected");
    assert_eq!(err.to_string(), ADDRESS_NOT_FOUND_MESSAGE);
    assert_eq!(err.kind(), LookupErrorKind::NotFound);
}

#[tokio::test]
async fn not_found_status_surfaces_server_message_verbatim() {
    let (server_url, _) = spawn_lookup_server(
        AxumStatus::NOT_FOUND,
        r#"{"success":false,"error":"Address not found or not in Seattle"}"#,
    )
    .await
    .expect("spawn server");
    let client = LookupClient::new(&server_url).expect("client");

    let err = client.lookup("1 Main St, Portland, OR").await.expect_err("rejected");
    assert_eq!(err, LookupError::Rejected("Address not found or not in Seattle".to_string()));
}

#[tokio::test]
async fn non_json_response_is_a_transport_failure() {
    let (server_url, _) = spawn_lookup_server(
        AxumStatus::INTERNAL_SERVER_ERROR,
        "<html><body>Server Error (500)</body></html>",
    )
    .await
    .expect("spawn server");
    let client = LookupClient::new(&server_url).expect("client");

    let err = client.lookup("400 Broad St").await.expect_err("transport");
    assert_eq!(err.kind(), LookupErrorKind::Transport);
    assert_eq!(err.to_string(), TRANSPORT_FAILURE_MESSAGE);
    assert!(err.diagnostic().unwrap_or_default().contains("500"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = LookupClient::new(&format!("http://{addr}")).expect("client");
    let err = client.lookup("400 Broad St").await.expect_err("transport");
    assert_eq!(err.to_string(), TRANSPORT_FAILURE_MESSAGE);
}

#[tokio::test]
async fn string_district_numbers_from_the_backend_are_accepted() {
    let (server_url, _) = spawn_lookup_server(
        AxumStatus::OK,
        r#"{"success":true,"data":{"district":{"number":"3","name":"District 3"},"representatives":[]}}"#,
    )
    .await
    .expect("spawn server");
    let client = LookupClient::new(&server_url).expect("client");

    let data = client.lookup("1 Pike St").await.expect("lookup succeeds");
    assert_eq!(data.district.number, DistrictNumber::Text("3".to_string()));
    assert_eq!(data.district.number.to_string(), "3");
    assert!(data.representatives.is_empty());
}

#[test]
fn success_envelope_without_data_is_a_transport_failure() {
    let err = interpret_response(StatusCode::OK, br#"{"success":true}"#).expect_err("no data");
    assert_eq!(err.kind(), LookupErrorKind::Transport);
}

#[test]
fn empty_server_message_uses_fallback() {
    let err = interpret_response(StatusCode::BAD_REQUEST, br#"{"success":false,"error":""}"#)
        .expect_err("rejected");
    assert_eq!(err.to_string(), ADDRESS_NOT_FOUND_MESSAGE);
}

#[test]
fn resolves_endpoint_against_root_and_nested_base_urls() {
    assert_eq!(
        resolve_endpoint("http://127.0.0.1:8000").expect("root").as_str(),
        "http://127.0.0.1:8000/api/reps/lookup/"
    );
    assert_eq!(
        resolve_endpoint("https://civic.example.org/seattle?debug=1")
            .expect("nested")
            .as_str(),
        "https://civic.example.org/seattle/api/reps/lookup/"
    );
}

#[test]
fn rejects_non_http_server_urls() {
    assert!(matches!(
        resolve_endpoint("ftp://example.org"),
        Err(EndpointError::UnsupportedScheme { .. })
    ));
    assert!(matches!(
        resolve_endpoint("not a url"),
        Err(EndpointError::Parse { .. })
    ));
}
