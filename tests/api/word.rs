use reqwest::StatusCode;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::App;

#[tokio::test]
async fn word_of_the_day_proxies_the_provider_payload() {
    let app = App::new().await;

    Mock::given(method("GET"))
        .and(path("/word-of-the-day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "word": "eloquent",
            "synonyms": ["articulate"],
            "antonyms": ["inarticulate"],
        })))
        .expect(1)
        .mount(&app.word_server)
        .await;

    let response = app.get_word_of_the_day().await;

    assert_eq!(response.status(), StatusCode::OK);

    let payload: serde_json::Value = response.json().await.unwrap();
    assert_eq!(payload["word"], "eloquent");
    assert_eq!(payload["synonyms"][0], "articulate");
    assert!(payload["example"].is_null());
}

#[tokio::test]
async fn word_of_the_day_returns_502_when_the_provider_is_down() {
    let app = App::new().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.word_server)
        .await;

    let response = app.get_word_of_the_day().await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
