use crate::utils::{spawn_app, valid_submission};
use serde_json::json;

#[tokio::test]
async fn metrics_count_submissions_by_outcome() {
    // Arrange
    let app = spawn_app().await;
    app.mock_send_email_endpoint_to_ok(2).await;

    // Act
    app.post_contact(&valid_submission()).await;
    app.post_contact(&json!({ "name": "John Doe" })).await;
    app.post_contact(&json!({ "name": "John Doe" })).await;

    // Assert
    let metrics = app.get_metrics().await;
    assert!(metrics.contains(r#"contact_submissions_total{outcome="sent"} 1"#));
    assert!(metrics.contains(r#"contact_submissions_total{outcome="rejected"} 2"#));
}
