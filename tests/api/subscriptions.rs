use reqwest::StatusCode;

use crate::helpers::App;

#[tokio::test]
async fn subscribe_returns_200_for_a_valid_email() {
    let app = App::new().await;
    let body = serde_json::json!({ "email": "arine@daily-diction.com" });

    let response = app.post_subscriptions(&body).await;

    assert_eq!(response.status(), StatusCode::OK);

    let payload: serde_json::Value = response.json().await.unwrap();
    assert!(payload["message"]
        .as_str()
        .unwrap()
        .contains("arine@daily-diction.com"));
    assert_eq!(
        app.persisted_subscribers(),
        vec!["arine@daily-diction.com".to_string()]
    );
}

#[tokio::test]
async fn subscribe_returns_422_when_the_email_attribute_is_missing() {
    let app = App::new().await;
    let body = serde_json::json!({ "name": "arine" });

    let response = app.post_subscriptions(&body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn subscribe_returns_400_for_a_malformed_email() {
    let app = App::new().await;
    let test_cases = [
        serde_json::json!({ "email": "" }),
        serde_json::json!({ "email": "definitely-not-an-email" }),
        serde_json::json!({ "email": "@daily-diction.com" }),
    ];

    for body in test_cases {
        let response = app.post_subscriptions(&body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let payload: serde_json::Value = response.json().await.unwrap();
        assert!(payload["error"].is_string());
    }
}

#[tokio::test]
async fn subscribing_twice_returns_409() {
    let app = App::new().await;
    let body = serde_json::json!({ "email": "arine@daily-diction.com" });

    let first = app.post_subscriptions(&body).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.post_subscriptions(&body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    assert_eq!(app.persisted_subscribers().len(), 1);
}

#[tokio::test]
async fn duplicate_detection_ignores_case_and_whitespace() {
    let app = App::new().await;

    let first = app
        .post_subscriptions(&serde_json::json!({ "email": "arine@daily-diction.com" }))
        .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .post_subscriptions(&serde_json::json!({ "email": "  ARINE@Daily-Diction.com " }))
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}
