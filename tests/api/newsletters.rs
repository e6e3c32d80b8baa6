use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, ADA};

const GRACE: &str = "+15557654321";

fn newsletter_body() -> serde_json::Value {
    serde_json::json!({
      "cards": [{
        "title": "Attention Is All You Need",
        "subtitle": "The Transformer, a model architecture based solely on attention.",
        "media_url": "https://arxiv.org/abs/1706.03762"
      }]
    })
}

#[tokio::test]
async fn newsletters_are_not_delivered_to_unsubscribed_numbers() {
    let test_app = TestApp::spawn_app().await;

    test_app.register("Ada", ADA).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.rcs_server)
        .await;

    let response = test_app.post_newsletter(newsletter_body()).await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn newsletters_are_delivered_to_subscribed_numbers() {
    let test_app = TestApp::spawn_app().await;

    test_app.register("Ada", ADA).await;
    test_app.register("Grace", GRACE).await;

    // When executing a mock with the method mount_as_scoped, the mock will stop to listen the /send/rcs endpoint when it
    // goes out of scope (so, when the opt-in below has been processed).
    {
        let _mock_guard = Mock::given(path("/send/rcs"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .named("Confirm opt-in")
            .expect(1)
            .mount_as_scoped(&test_app.rcs_server)
            .await;

        test_app.press_button("OPT_IN", ADA).await;
    }

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .named("Deliver newsletter")
        .expect(1)
        .mount(&test_app.rcs_server)
        .await;

    let response = test_app.post_newsletter(newsletter_body()).await;

    assert_eq!(response.status().as_u16(), 200);

    let report: serde_json::Value = response.json().await.unwrap();

    assert_eq!(report["delivered"], 1);
    assert_eq!(report["failed"], 0);

    let received_requests = test_app.rcs_server.received_requests().await.unwrap();
    let body: serde_json::Value =
        serde_json::from_slice(&received_requests.last().unwrap().body).unwrap();

    assert_eq!(body["to"], ADA);
    assert_eq!(body["cards"][0]["title"], "Attention Is All You Need");
    assert_eq!(
        body["cards"][0]["mediaUrl"],
        "https://arxiv.org/abs/1706.03762"
    );
}

#[tokio::test]
async fn failed_deliveries_are_counted() {
    let test_app = TestApp::spawn_app().await;

    test_app.register("Ada", ADA).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&test_app.rcs_server)
        .await;

    test_app.press_button("OPT_IN", ADA).await;

    let response = test_app.post_newsletter(newsletter_body()).await;
    let report: serde_json::Value = response.json().await.unwrap();

    assert_eq!(report["delivered"], 0);
    assert_eq!(report["failed"], 1);
}

#[tokio::test]
async fn newsletters_returns_400_when_body_is_invalid() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (serde_json::json!({}), "missing cards"),
        (serde_json::json!({ "cards": [] }), "empty cards"),
        (
            serde_json::json!({ "cards": [{ "subtitle": "No title" }] }),
            "card without title",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_newsletter(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn newsletters_returns_500_when_subscribers_cannot_be_listed() {
    let test_app = TestApp::spawn_app_with_broken_store().await;

    let response = test_app.post_newsletter(newsletter_body()).await;

    assert_eq!(response.status().as_u16(), 500);
}
