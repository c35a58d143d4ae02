use crate::utils::{spawn_app, spawn_app_with, TRACKING_ID};
use http::{header::CONTENT_TYPE, StatusCode};

#[tokio::test]
async fn tracking_snippet_loads_the_configured_tag() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .api_client()
        .get(app.at_url("/analytics/tag"))
        .send()
        .await
        .expect("Request failed");

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|x| x.to_str().ok()),
        Some("text/html; charset=utf-8")
    );
    let snippet = response.text().await.expect("Snippet is not text");
    assert!(snippet.contains(&format!("gtag/js?id={TRACKING_ID}")));
    assert!(snippet.contains(&format!("gtag('config', '{TRACKING_ID}')")));
}

#[tokio::test]
async fn tracking_snippet_is_not_found_without_a_tag() {
    // Arrange
    let app = spawn_app_with(|c| c.analytics.tracking_id = None).await;

    // Act
    let response = app
        .api_client()
        .get(app.at_url("/analytics/tag"))
        .send()
        .await
        .expect("Request failed");

    // Assert
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
