use claim::{assert_none, assert_some};
use rcs_newsletter::domain::variant::Variant;
use std::collections::HashMap;
use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{TestApp, ADA};

#[tokio::test]
async fn subscribe_returns_200_when_form_is_valid() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.register("Ada", ADA).await;

    assert_eq!(200, response.status().as_u16());

    let state: serde_json::Value = response.json().await.unwrap();

    assert_eq!(state["isRegistered"], true);
    assert_eq!(state["message"], ADA);
    assert!(state["error"].is_null());
}

#[tokio::test]
async fn subscribe_persists_an_unsubscribed_record() {
    let test_app = TestApp::spawn_app().await;

    test_app.register("Ada", ADA).await;

    let subscriber = assert_some!(test_app.find(ADA).await);

    assert_eq!(subscriber.phone_number.as_ref(), ADA);
    assert_eq!(subscriber.name.unwrap().as_ref(), "Ada");
    assert!(!subscriber.subscribed);
}

#[tokio::test]
async fn subscribe_does_not_send_any_message() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.rcs_server)
        .await;

    test_app.register("Ada", ADA).await;
}

#[tokio::test]
async fn subscribe_returns_400_when_form_field_is_missing() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases: Vec<(HashMap<&str, &str>, &str, &str)> = vec![
        (
            HashMap::from([]),
            "missing form fields",
            "Validation error: Name is required, Phone number must be in the format +12345678901",
        ),
        (
            HashMap::from([("name", "Ada")]),
            "missing number field",
            "Validation error: Phone number must be in the format +12345678901",
        ),
        (
            HashMap::from([("number", ADA)]),
            "missing name field",
            "Validation error: Name is required",
        ),
    ];

    for (invalid_body, error_message, expected_error) in test_cases {
        let response = test_app.post_subscription(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );

        let state: serde_json::Value = response.json().await.unwrap();

        assert_eq!(state["isRegistered"], false);
        assert!(state["message"].is_null());
        assert_eq!(state["error"][0], expected_error);
    }

    assert!(test_app.store.is_empty().unwrap());
}

#[tokio::test]
async fn subscribe_returns_400_when_fields_are_present_but_not_valid() {
    let test_app = TestApp::spawn_app().await;
    let test_cases: Vec<(&str, &str, &str)> = vec![
        ("", ADA, "empty name"),
        ("   ", ADA, "blank name"),
        ("Ada", "5551234567", "number without country code"),
        ("Ada", "+1 (555) 123-4567", "masked number"),
        ("Ada", "+1555123456", "short number"),
        ("Ada", "+445551234567", "foreign number"),
    ];

    for (name, number, error_message) in test_cases {
        let response = test_app.register(name, number).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload had {}",
            error_message
        );
    }

    assert!(test_app.store.is_empty().unwrap());
}

#[tokio::test]
async fn subscribe_reports_every_violation() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.register("", "123").await;
    let state: serde_json::Value = response.json().await.unwrap();

    assert_eq!(state["isRegistered"], false);
    assert_eq!(
        state["error"][0],
        "Validation error: Name is required, Phone number must be in the format +12345678901"
    );
}

#[tokio::test]
async fn subscribe_returns_409_when_number_is_already_registered() {
    let test_app = TestApp::spawn_app().await;

    test_app.register("Ada", ADA).await;
    let response = test_app.register("Grace", ADA).await;

    assert_eq!(409, response.status().as_u16());

    let state: serde_json::Value = response.json().await.unwrap();

    assert_eq!(
        state["error"][0],
        format!("User with phone number {} is already registered", ADA)
    );
    assert_eq!(test_app.store.len().unwrap(), 1);
}

#[tokio::test]
async fn subscribe_returns_500_with_a_generic_message_when_the_store_fails() {
    let test_app = TestApp::spawn_app_with_broken_store().await;

    let response = test_app.register("Ada", ADA).await;

    assert_eq!(500, response.status().as_u16());

    let state: serde_json::Value = response.json().await.unwrap();

    assert_eq!(state["error"][0], "Failed to register user.");
}

#[tokio::test]
async fn fun_facts_registration_twice_resubscribes() {
    let test_app = TestApp::spawn_app_with(Variant::FunFacts).await;

    let first = test_app.register("Ada", ADA).await;
    let second = test_app.register("Ada", ADA).await;

    assert_eq!(200, first.status().as_u16());
    assert_eq!(200, second.status().as_u16());

    let state: serde_json::Value = second.json().await.unwrap();

    assert_eq!(state["message"], format!("Message sent to {}", ADA));

    let subscriber = assert_some!(test_app.find(ADA).await);

    assert!(subscriber.subscribed);
    assert_eq!(test_app.store.len().unwrap(), 1);
}

#[tokio::test]
async fn rejected_registration_leaves_no_record() {
    let test_app = TestApp::spawn_app().await;

    test_app.register("Ada", "+1555").await;

    assert_none!(test_app.find(ADA).await);
}
