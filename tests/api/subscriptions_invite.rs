use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, ADA};

#[tokio::test]
async fn invite_sends_an_opt_in_card() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/send/rcs"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.rcs_server)
        .await;

    let response = test_app.post_invite(ADA).await;

    assert_eq!(200, response.status().as_u16());

    let received_requests = test_app.rcs_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received_requests[0].body).unwrap();

    assert_eq!(body["to"], ADA);
    assert_eq!(body["quickReplies"][0]["payload"], "OPT_IN");
}

#[tokio::test]
async fn invite_does_not_require_a_registration() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.rcs_server)
        .await;

    let response = test_app.post_invite(ADA).await;

    assert_eq!(200, response.status().as_u16());
    assert!(test_app.store.is_empty().unwrap());
}

#[tokio::test]
async fn invite_returns_502_when_delivery_fails() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.rcs_server)
        .await;

    let response = test_app.post_invite(ADA).await;

    assert_eq!(502, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn invite_returns_400_for_invalid_numbers() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.rcs_server)
        .await;

    let response = test_app.post_invite("555-123-4567").await;

    assert_eq!(400, response.status().as_u16());
}
