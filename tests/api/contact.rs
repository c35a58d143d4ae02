use crate::utils::{spawn_app, spawn_app_with, valid_submission, ADMIN, SENDER, SITE_NAME};
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::*;
use serde_json::{json, Value};
use wiremock::{
    matchers::{any, header_exists, method, path},
    Mock, ResponseTemplate,
};

#[tokio::test]
async fn contact_returns_a_200_for_a_valid_submission() {
    // Arrange
    let app = spawn_app().await;
    app.mock_send_email_endpoint_to_ok(2).await;

    // Act
    let response = app.post_contact(&valid_submission()).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Body is not JSON");
    assert_eq!(body, json!({ "message": "Email sent successfully" }));
}

#[tokio::test]
async fn contact_notifies_the_admin_before_acknowledging_the_submitter() {
    // Arrange
    let app = spawn_app().await;
    app.mock_send_email_endpoint_to_ok(2).await;

    // Act
    app.post_contact(&valid_submission()).await;

    // Assert
    let emails = app.sent_emails().await;
    assert_eq!(emails.len(), 2);

    let notification = &emails[0];
    assert_eq!(notification["to"], ADMIN);
    assert_eq!(notification["from"], format!("Frank Lynam <{SENDER}>"));
    assert_eq!(
        notification["subject"],
        format!("New Contact Form Submission from John Doe - {SITE_NAME}")
    );
    let html = notification["html"].as_str().unwrap();
    assert!(html.contains("john@example.com"));
    assert!(html.contains("This is a test message with enough characters"));

    let acknowledgment = &emails[1];
    assert_eq!(acknowledgment["to"], "john@example.com");
    assert_eq!(
        acknowledgment["subject"],
        format!("Thank you for reaching out - {SITE_NAME}")
    );
    assert!(acknowledgment["html"].as_str().unwrap().contains("John Doe"));
}

#[tokio::test]
async fn contact_authenticates_with_the_mail_service() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(app.email_server())
        .await;

    // Act
    let response = app.post_contact(&valid_submission()).await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn contact_trims_the_submitted_values() {
    // Arrange
    let app = spawn_app().await;
    app.mock_send_email_endpoint_to_ok(2).await;

    // Act
    let response = app
        .post_contact(&json!({
            "name": "  John Doe  ",
            "email": "john@example.com",
            "message": "   This is a test message with enough characters   ",
        }))
        .await;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let emails = app.sent_emails().await;
    assert_eq!(
        emails[0]["subject"],
        format!("New Contact Form Submission from John Doe - {SITE_NAME}")
    );
}

#[tokio::test]
async fn contact_renders_message_lines_as_line_breaks() {
    // Arrange
    let app = spawn_app().await;
    app.mock_send_email_endpoint_to_ok(2).await;

    // Act
    app.post_contact(&json!({
        "name": "John Doe",
        "email": "john@example.com",
        "message": "First line\nSecond line",
    }))
    .await;

    // Assert
    let emails = app.sent_emails().await;
    let html = emails[0]["html"].as_str().unwrap();
    assert!(html.contains("First line<br>Second line"));
}

#[tokio::test]
async fn contact_escapes_markup_in_the_submission() {
    // Arrange
    let app = spawn_app().await;
    app.mock_send_email_endpoint_to_ok(2).await;

    // Act
    app.post_contact(&json!({
        "name": "<b>John</b>",
        "email": "john@example.com",
        "message": "<script>alert('hi')</script>",
    }))
    .await;

    // Assert
    let emails = app.sent_emails().await;
    let html = emails[0]["html"].as_str().unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[rstest]
#[case(json!({ "name": "John Doe", "email": "john@example.com" }), "Missing required fields")]
#[case(json!({ "name": "", "email": "john@example.com", "message": "Long enough message" }), "Missing required fields")]
#[case(json!({ "name": "John Doe", "email": "   ", "message": "Long enough message" }), "Missing required fields")]
#[case(json!({ "name": null, "email": "john@example.com", "message": "Long enough message" }), "Missing required fields")]
#[case(json!({}), "Missing required fields")]
#[case(json!({ "name": "John Doe", "email": "invalid-email", "message": "Long enough message" }), "Invalid email format")]
#[case(json!({ "name": "John Doe", "email": "john@example", "message": "Long enough message" }), "Invalid email format")]
#[case(json!({ "name": "J", "email": "john@example.com", "message": "Long enough message" }), "Name must be at least 2 characters")]
#[case(json!({ "name": "John Doe", "email": "john@example.com", "message": "Short" }), "Message must be at least 10 characters")]
#[tokio::test]
async fn contact_returns_a_400_for_invalid_submissions(
    #[case] body: Value,
    #[case] expected_error: &str,
) {
    // Arrange
    let app = spawn_app().await;
    app.mock_send_email_endpoint_to_ok(0).await;

    // Act
    let response = app.post_contact(&body).await;

    // Assert
    assert_eq!(
        response.status(),
        StatusCode::BAD_REQUEST,
        "The API did not fail with 400 Bad Request when the payload was {body}."
    );
    let error: Value = response.json().await.expect("Body is not JSON");
    assert_eq!(error, json!({ "error": expected_error }));
}

#[tokio::test]
async fn email_is_validated_before_name_and_message() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .post_contact(&json!({ "name": "J", "email": "nope", "message": "Short" }))
        .await;

    // Assert
    let error: Value = response.json().await.expect("Body is not JSON");
    assert_eq!(error["error"], "Invalid email format");
}

#[tokio::test]
async fn contact_returns_a_400_for_malformed_json() {
    // Arrange
    let app = spawn_app().await;
    app.mock_send_email_endpoint_to_ok(0).await;

    // Act
    let response = app
        .api_client()
        .post(app.at_url("/contact"))
        .header("Content-Type", "application/json")
        .body(r#"{"name": "John Doe", "email": "#)
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.expect("Body is not JSON");
    assert_eq!(error["error"], "Invalid JSON");
}

#[tokio::test]
async fn contact_returns_a_500_when_mail_is_not_configured() {
    // Arrange
    let app = spawn_app_with(|c| c.email.admin_email = None).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        // No request may reach the mail service.
        .expect(0)
        .mount(app.email_server())
        .await;

    // Act
    let response = app.post_contact(&valid_submission()).await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = response.json().await.expect("Body is not JSON");
    assert_eq!(error, json!({ "error": "Email configuration error" }));
}

#[tokio::test]
async fn contact_returns_a_500_when_the_mail_service_fails() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        // The acknowledgment is never attempted.
        .expect(1)
        .mount(app.email_server())
        .await;

    // Act
    let response = app.post_contact(&valid_submission()).await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = response.json().await.expect("Body is not JSON");
    assert_eq!(error, json!({ "error": "Failed to send email" }));
}

#[tokio::test]
async fn failed_acknowledgment_still_fails_the_request() {
    // Arrange
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .expect(1)
        .mount(app.email_server())
        .await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(app.email_server())
        .await;

    // Act
    let response = app.post_contact(&valid_submission()).await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
