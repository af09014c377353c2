use reqwest::StatusCode;

use crate::helpers::App;

#[tokio::test]
async fn health_check_works() {
    let app = App::new().await;

    let response = app.get_health_check().await;

    assert_eq!(response.status(), StatusCode::OK);
}
