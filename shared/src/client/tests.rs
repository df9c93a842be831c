use super::mock::MockHttpClient;
use super::*;
use crate::error::ApiErrorKind;
use crate::models::{DeliveryStatus, VerificationStatus};
use crate::protocol::{
    AssignBillsRequest, DeleteMessengerRequest, DeliveryHistoryRequest, ListBillsRequest,
    MessengerRoutesRequest, UploadProofRequest, VerifyDeliveryRequest,
};
use serde_json::json;

const BASE: &str = "http://localhost:5000/api";

fn client(mock: MockHttpClient) -> ApiClient<MockHttpClient> {
    ApiClient::new(mock, "http://localhost:5000/api/").with_token(Some("tok-123".to_string()))
}

// =========================================================
// 请求构建
// =========================================================

#[tokio::test]
async fn test_get_attaches_bearer_and_no_body() {
    let mock = MockHttpClient::new();
    mock.mock_response("GET", &format!("{}/coordinator/bills", BASE), 200, json!([]));
    let api = client(mock);

    let bills = api.send(&ListBillsRequest).await.unwrap();
    assert!(bills.is_empty());

    let req = api.client.last_request().unwrap();
    assert_eq!(req.header("Authorization"), Some("Bearer tok-123"));
    assert_eq!(req.body, None);
    assert_eq!(req.header("Content-Type"), None);
}

#[tokio::test]
async fn test_post_serializes_body() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        "POST",
        &format!("{}/coordinator/assign-bills", BASE),
        200,
        json!({ "message": "ok" }),
    );
    let api = client(mock);

    api.send(&AssignBillsRequest {
        bill_ids: vec!["b1".to_string(), "b3".to_string()],
        messenger_id: "m2".to_string(),
    })
    .await
    .unwrap();

    let req = api.client.last_request().unwrap();
    assert_eq!(req.header("Content-Type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "billIds": ["b1", "b3"], "messengerId": "m2" }));
}

#[tokio::test]
async fn test_path_id_and_query_in_url() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        "GET",
        &format!("{}/messenger/deliveries?status=delivered", BASE),
        200,
        json!([]),
    );
    mock.mock_response(
        "POST",
        &format!("{}/messenger/deliveries/d9/proof", BASE),
        201,
        json!({ "status": "delivered" }),
    );
    let api = client(mock);

    api.send(&DeliveryHistoryRequest {
        status: Some(DeliveryStatus::Delivered),
    })
    .await
    .unwrap();

    api.send(&UploadProofRequest {
        delivery_id: "d9".to_string(),
        image_data: "data:image/jpeg;base64,AAAA".to_string(),
    })
    .await
    .unwrap();

    let requests = api.client.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].url, format!("{}/messenger/deliveries/d9/proof", BASE));
    let body: serde_json::Value = serde_json::from_str(requests[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "imageData": "data:image/jpeg;base64,AAAA" }));
}

#[tokio::test]
async fn test_no_token_means_no_authorization_header() {
    let mock = MockHttpClient::new();
    mock.mock_response("GET", &format!("{}/messenger/routes", BASE), 200, json!({}));
    let api = ApiClient::new(mock, BASE).with_token(Some(String::new()));

    let board = api.send(&MessengerRoutesRequest).await.unwrap();
    assert!(board.deliveries.is_empty());
    assert!(board.stats.is_none());
    assert_eq!(api.client.last_request().unwrap().header("Authorization"), None);
}

// =========================================================
// 响应处理
// =========================================================

#[tokio::test]
async fn test_empty_body_accepted_for_ack() {
    let mock = MockHttpClient::new();
    mock.mock_raw("DELETE", &format!("{}/coordinator/messengers/3", BASE), 204, "");
    let api = client(mock);

    let ack = api
        .send(&DeleteMessengerRequest {
            id: "3".to_string(),
        })
        .await
        .unwrap();
    assert!(ack.is_null());
    assert_eq!(api.client.last_request().unwrap().body, None);
}

#[tokio::test]
async fn test_error_body_is_surfaced() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        "PUT",
        &format!("{}/coordinator/deliveries/d1/verify", BASE),
        403,
        json!({ "error": "Coordinator access required" }),
    );
    let api = client(mock);

    let err = api
        .send(&VerifyDeliveryRequest {
            delivery_id: "d1".to_string(),
            verification_status: VerificationStatus::Verified,
            verification_notes: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Forbidden);
    assert_eq!(err.user_message(), "Coordinator access required");
}

#[tokio::test]
async fn test_unexpected_body_is_decode_error() {
    let mock = MockHttpClient::new();
    mock.mock_response("GET", &format!("{}/coordinator/bills", BASE), 200, json!({ "bills": 3 }));
    let api = client(mock);

    let err = api.send(&ListBillsRequest).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
}

#[tokio::test]
async fn test_network_failure_propagates() {
    let api = client(MockHttpClient::offline());
    let err = api.send(&ListBillsRequest).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Network);
    assert_eq!(err.user_message(), "Network Error");
}
