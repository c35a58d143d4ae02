use crate::utils::spawn_app;
use portfolio::client::{ContactApiClient, ContactForm, Field, SubmitStatus};
use url::Url;

fn api_for(address: &str) -> ContactApiClient {
    ContactApiClient::new(Url::parse(address).expect("Invalid app address"))
}

fn filled_form() -> ContactForm {
    let mut form = ContactForm::new();
    form.set_field(Field::Name, "John Doe");
    form.set_field(Field::Email, "john@example.com");
    form.set_field(Field::Message, "This is a test message with enough characters");
    form
}

#[tokio::test]
async fn contact_form_submits_to_the_server() {
    // Arrange
    let app = spawn_app().await;
    app.mock_send_email_endpoint_to_ok(2).await;
    let mut form = filled_form();

    // Act
    let status = form.submit(&api_for(app.address())).await;

    // Assert
    assert_eq!(status, SubmitStatus::Success);
    assert_eq!(form.value(Field::Name), "");
}

#[tokio::test]
async fn contact_form_reports_server_failures() {
    // Arrange
    let app = spawn_app_with_broken_mail().await;
    let mut form = filled_form();

    // Act
    let status = form.submit(&api_for(app.address())).await;

    // Assert
    assert_eq!(status, SubmitStatus::Error);
    assert_eq!(form.value(Field::Name), "John Doe");
}

async fn spawn_app_with_broken_mail() -> crate::utils::TestApp {
    crate::utils::spawn_app_with(|c| c.email.host = None).await
}
