use crate::helpers::{body_of, spawn_app};
use serde_json::json;

#[tokio::test]
async fn contact_requires_name_email_and_message() {
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({"email": "ada@example.com", "message": "Hi"}), "missing the name"),
        (json!({"name": "Ada", "message": "Hi"}), "missing the email"),
        (json!({"name": "Ada", "email": "ada@example.com"}), "missing the message"),
        (
            json!({"name": "  ", "email": "ada@example.com", "message": "Hi"}),
            "blank name",
        ),
    ];

    for (body, description) in test_cases {
        let response = app.post_contact(&body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        assert_eq!(
            body_of(response).await["message"],
            "Name, email, and message are required"
        );
    }
}

#[tokio::test]
async fn contact_rejects_an_invalid_email() {
    let app = spawn_app().await;

    let response = app
        .post_contact(&json!({"name": "Ada", "email": "ada-at-example", "message": "Hi"}))
        .await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        body_of(response).await["message"],
        "Please provide a valid email address"
    );
}

#[tokio::test]
async fn contact_fails_with_500_when_email_is_not_configured() {
    let app = spawn_app().await;

    let response = app
        .post_contact(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "company": "Analytical Engines",
            "message": "Do you ship matcha to London?"
        }))
        .await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        body_of(response).await,
        json!({"success": false, "message": "Failed to send message. Please try again."})
    );
}
